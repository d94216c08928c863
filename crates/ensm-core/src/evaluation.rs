//! # Node Evaluations
//!
//! One [`SlidingValueWindow`] per node, created lazily on the node's first
//! observation. This is where the synthesis loop feeds fitness samples and
//! where a plotter polls for fresh values.

use crate::window::SlidingValueWindow;
use crate::{EnsmError, NodeKey, WindowConfig};
use std::collections::BTreeMap;

/// Per-node fitness windows sharing a single window configuration.
#[derive(Debug, Clone)]
pub struct NodeEvaluations<T> {
    config: WindowConfig,
    windows: BTreeMap<T, SlidingValueWindow>,
}

impl<T: NodeKey> NodeEvaluations<T> {
    /// Fails with `InvalidCapacity` if the configured size is out of range.
    pub fn new(config: WindowConfig) -> Result<Self, EnsmError> {
        config.validate()?;
        Ok(Self {
            config,
            windows: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Feed one observation to the node's window, creating it if needed.
    pub fn observe(&mut self, node: &T, value: f64) -> Result<(), EnsmError> {
        if let Some(window) = self.windows.get_mut(node) {
            window.add_value(value);
            return Ok(());
        }
        let mut window = SlidingValueWindow::new(self.config.size)?;
        window.add_value(value);
        self.windows.insert(node.clone(), window);
        Ok(())
    }

    #[must_use]
    pub fn window(&self, node: &T) -> Option<&SlidingValueWindow> {
        self.windows.get(node)
    }

    pub fn window_mut(&mut self, node: &T) -> Option<&mut SlidingValueWindow> {
        self.windows.get_mut(node)
    }

    /// Drop a node's window. Returns `true` if it had one.
    pub fn remove(&mut self, node: &T) -> bool {
        self.windows.remove(node).is_some()
    }

    /// Reset every window, keeping the nodes.
    pub fn reset_all(&mut self) {
        for window in self.windows.values_mut() {
            window.reset();
        }
    }

    /// Nodes whose window holds a value not yet consumed, in key order.
    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.windows
            .iter()
            .filter(|(_, w)| w.has_new_value())
            .map(|(n, _)| n)
    }

    /// Clear the new-value flag of a node's window.
    pub fn mark_consumed(&mut self, node: &T) {
        if let Some(window) = self.windows.get_mut(node) {
            window.set_new_value(false);
        }
    }

    /// Windows in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &SlidingValueWindow)> {
        self.windows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
