//! # Primitives
//!
//! Fixed constants shared by the network, the windows and the driver.

/// Generalisation level assigned to every node on registration.
pub const DEFAULT_GENERALISATION_LEVEL: u32 = 1;

/// Default capacity of a per-node sliding window.
pub const DEFAULT_WINDOW_SIZE: usize = 100;

/// Upper bound on a configured window capacity.
///
/// Each window keeps eight series, four of which are unbounded history, so
/// the tail capacity is capped to keep per-node memory predictable.
pub const MAX_WINDOW_SIZE: usize = 1_000_000;
