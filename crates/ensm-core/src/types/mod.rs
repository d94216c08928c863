//! # Core Type Definitions
//!
//! This module contains the value types shared by every layer of the network:
//! - Edge tags (`EdgeKind`)
//! - Node state (`NodeState`)
//! - Deontic labels (`NormModality`) and opaque agent actions (`AgentAction`)
//! - Error types (`EnsmError`)
//!
//! Node identities themselves are supplied by the caller. The core only needs
//! them to be cloneable, totally ordered and printable for diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// NODE IDENTITY
// =============================================================================

/// Bound satisfied by every node identity the network can store.
///
/// `Ord` keeps all keyed state in `BTreeMap`s so that iteration order never
/// depends on hashing. `Debug` is only used to render error messages.
pub trait NodeKey: Clone + Ord + fmt::Debug {}

impl<T: Clone + Ord + fmt::Debug> NodeKey for T {}

// =============================================================================
// EDGE KIND
// =============================================================================

/// Relationship carried by a directed edge.
///
/// Only `Generalisation` is interpreted by the generalisation network. The
/// other kinds are stored and enumerated by the typed graph without meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Source is strictly more specific than destination.
    Generalisation,
    /// Only one of the two nodes is needed wherever both apply.
    Substitutability,
    /// Both nodes are needed wherever both apply.
    Complementarity,
    Concurrency,
    Regulation,
    Inclusion,
}

impl EdgeKind {
    /// All kinds, in declaration order.
    pub const ALL: [EdgeKind; 6] = [
        EdgeKind::Generalisation,
        EdgeKind::Substitutability,
        EdgeKind::Complementarity,
        EdgeKind::Concurrency,
        EdgeKind::Regulation,
        EdgeKind::Inclusion,
    ];

    /// Get the kind name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            EdgeKind::Generalisation => "generalisation",
            EdgeKind::Substitutability => "substitutability",
            EdgeKind::Complementarity => "complementarity",
            EdgeKind::Concurrency => "concurrency",
            EdgeKind::Regulation => "regulation",
            EdgeKind::Inclusion => "inclusion",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// NODE STATE
// =============================================================================

/// Binary state of a node. Nodes start `Inactive`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum NodeState {
    /// The node participates in the synthesised norm set.
    Active,
    #[default]
    Inactive,
}

impl NodeState {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, NodeState::Active)
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Active => f.write_str("active"),
            NodeState::Inactive => f.write_str("inactive"),
        }
    }
}

// =============================================================================
// NORM MODALITY
// =============================================================================

/// Deontic operator of a norm: `prh(action)` or `obl(action)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NormModality {
    Prohibition,
    Obligation,
}

impl NormModality {
    /// Canonical printable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            NormModality::Prohibition => "prh",
            NormModality::Obligation => "obl",
        }
    }

    /// Render `label(action)`, e.g. `prh(Go forward)`.
    pub fn apply<A: AgentAction + ?Sized>(self, action: &A) -> String {
        format!("{}({})", self.label(), action)
    }
}

impl fmt::Display for NormModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NormModality {
    type Err = EnsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prh" => Ok(NormModality::Prohibition),
            "obl" => Ok(NormModality::Obligation),
            other => Err(EnsmError::Config(format!("unknown norm modality '{}'", other))),
        }
    }
}

// =============================================================================
// AGENT ACTION
// =============================================================================

/// An action available to agents in the host domain.
///
/// The core never interprets actions; it only needs to print them.
pub trait AgentAction: fmt::Display {}

/// Plain named action for callers without a richer action type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionLabel(pub String);

impl ActionLabel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AgentAction for ActionLabel {}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the ENSM system.
///
/// - Every error is returned to the immediate caller; nothing is retried
/// - A failed mutator leaves the network exactly as it was
/// - Node identities are rendered with `Debug` so the enum stays non-generic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnsmError {
    /// A mutating operation named a node that is not registered.
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// An edge endpoint is not registered.
    #[error("Edge endpoint missing: {from} -> {to}")]
    EndpointMissing { from: String, to: String },

    /// An edge of the same kind already joins the ordered pair.
    #[error("Duplicate {kind} edge: {from} -> {to}")]
    DuplicateEdge {
        from: String,
        to: String,
        kind: EdgeKind,
    },

    /// Adding the generalisation would make the network cyclic.
    #[error("Generalisation {child} -> {parent} would create a cycle")]
    CycleDetected { child: String, parent: String },

    /// A sliding window needs room for at least one value.
    #[error("Invalid window capacity: {0}")]
    InvalidCapacity(usize),

    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A scenario script is malformed.
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl EnsmError {
    pub(crate) fn unknown<T: NodeKey>(node: &T) -> Self {
        EnsmError::UnknownNode(format!("{:?}", node))
    }
}

// =============================================================================
// TESTS
// =============================================================================
