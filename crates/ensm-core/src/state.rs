//! # Node State Store
//!
//! Per-node binary state. A node that has never been assigned a state reads
//! as `Inactive`.

use crate::{NodeKey, NodeState};
use std::collections::BTreeMap;

/// Sparse map of node states. Only explicit assignments are stored.
#[derive(Debug, Clone)]
pub struct NodeStateStore<T> {
    states: BTreeMap<T, NodeState>,
}

impl<T> Default for NodeStateStore<T> {
    fn default() -> Self {
        Self {
            states: BTreeMap::new(),
        }
    }
}

impl<T: NodeKey> NodeStateStore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a node (`Inactive` if never set).
    #[must_use]
    pub fn state(&self, node: &T) -> NodeState {
        self.states.get(node).copied().unwrap_or_default()
    }

    /// Assign a state. Returns `true` only if the state actually changed,
    /// which lets callers skip recomputation on repeated assignments.
    pub fn set_state(&mut self, node: &T, state: NodeState) -> bool {
        if self.state(node) == state {
            return false;
        }
        self.states.insert(node.clone(), state);
        true
    }

    /// Forget a node.
    pub fn remove(&mut self, node: &T) {
        self.states.remove(node);
    }

    /// Nodes currently `Active`, in key order.
    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.states
            .iter()
            .filter(|(_, s)| s.is_active())
            .map(|(n, _)| n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_node_reads_inactive() {
        let store: NodeStateStore<u32> = NodeStateStore::new();
        assert_eq!(store.state(&7), NodeState::Inactive);
    }

    #[test]
    fn set_state_reports_change_only_once() {
        let mut store = NodeStateStore::new();
        assert!(store.set_state(&1u32, NodeState::Active));
        assert!(!store.set_state(&1u32, NodeState::Active));
        assert_eq!(store.state(&1), NodeState::Active);

        assert!(store.set_state(&1u32, NodeState::Inactive));
        assert!(!store.set_state(&2u32, NodeState::Inactive));
    }

    #[test]
    fn active_lists_only_active_nodes() {
        let mut store = NodeStateStore::new();
        store.set_state(&3u32, NodeState::Active);
        store.set_state(&1u32, NodeState::Active);
        store.set_state(&2u32, NodeState::Active);
        store.set_state(&2u32, NodeState::Inactive);

        let active: Vec<_> = store.active().copied().collect();
        assert_eq!(active, vec![1, 3]);

        store.remove(&3);
        assert_eq!(store.state(&3), NodeState::Inactive);
    }
}
