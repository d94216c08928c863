//! # Configuration
//!
//! Tunables for the network and the sliding windows.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration. The core only deserialises and validates; reading files is
//! left to the driver.

use crate::EnsmError;
use crate::primitives::{DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE};
use serde::{Deserialize, Serialize};

// =============================================================================
// NETWORK CONFIG
// =============================================================================

/// Behaviour switches of the generalisation network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Lift every ancestor when a generalisation raises a parent's level.
    ///
    /// When `false` only the direct parent is updated, so
    /// `level(parent) >= level(child) + 1` is guaranteed for the edge just
    /// added but may not hold further up the network.
    pub propagate_levels: bool,

    /// Re-examine every descendant whenever a node's state or its
    /// generalisations change.
    ///
    /// When `false` the represented/not-represented lists are only updated
    /// for the node that was touched; use `refresh` or `refresh_all` to
    /// bring the others up to date.
    pub eager_representation: bool,
}

impl NetworkConfig {
    /// Both coherence fixes enabled.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            propagate_levels: true,
            eager_representation: true,
        }
    }
}

// =============================================================================
// WINDOW CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Number of most recent observations kept in the windowed tails.
    pub size: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<(), EnsmError> {
        if self.size == 0 || self.size > MAX_WINDOW_SIZE {
            return Err(EnsmError::InvalidCapacity(self.size));
        }
        Ok(())
    }
}

// =============================================================================
// TOP-LEVEL CONFIG
// =============================================================================

/// Full configuration as read from a `[network]` / `[window]` TOML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsmConfig {
    pub network: NetworkConfig,
    pub window: WindowConfig,
}

impl EnsmConfig {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), EnsmError> {
        self.window.validate()
    }
}
