//! # ensm-core
//!
//! The generalisation-network core of the evolutionary norm-synthesis
//! machine (ENSM).
//!
//! This crate maintains a directed acyclic graph of nodes (typically norms)
//! joined by *generalisation* edges, plus the derived views a synthesis loop
//! reads every tick: which nodes are active, inactive, represented and not
//! represented. Alongside it, sliding statistical windows score each node's
//! fitness over time.
//!
//! ## Layers
//!
//! - `graph` - typed edge multigraph keyed by node identity
//! - `state` - per-node `Active` / `Inactive` state
//! - `network` - generalisation DAG, levels and control lists
//! - `window` / `evaluation` - rolling fitness statistics per node
//!
//! ## Architectural Constraints
//!
//! - Single writer: mutators take `&mut self`; observers never fail
//! - No I/O, no async, no logging; every error goes back to the caller
//! - Deterministic iteration: keyed state lives in `BTreeMap`s

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod evaluation;
pub mod graph;
pub mod network;
pub mod primitives;
pub mod state;
pub mod types;
pub mod window;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ActionLabel, AgentAction, EdgeKind, EnsmError, NodeKey, NodeState, NormModality};

// =============================================================================
// RE-EXPORTS: Network and Windows
// =============================================================================

pub use config::{EnsmConfig, NetworkConfig, WindowConfig};
pub use evaluation::NodeEvaluations;
pub use graph::{Edge, GraphStore, TypedGraph};
pub use network::{ControlList, GeneralisationNetwork};
pub use state::NodeStateStore;
pub use window::{SlidingValueWindow, WindowSnapshot};
