//! # Generalisation Network
//!
//! A directed acyclic graph of nodes joined by `Generalisation` edges, from a
//! more specific child to a strictly more general parent.
//!
//! On top of the typed graph the network owns:
//! - the node state store (`Active` / `Inactive`)
//! - the generalisation level of every node
//! - four cached control lists: active, inactive, represented, not represented
//!
//! A node is *represented* if it is active or any of its ancestors is active.
//!
//! ## Control-list coherence
//!
//! `is_represented` is always computed on demand and is always exact. The
//! cached represented/not-represented lists are maintained per touched node:
//! every mutator recomputes the membership of the node it names (for
//! generalisation edits, the child). With the default configuration,
//! descendants whose representation changed as a side effect keep their old
//! membership until they are touched themselves or refreshed with
//! [`GeneralisationNetwork::refresh`] / [`GeneralisationNetwork::refresh_all`].
//! Setting [`NetworkConfig::eager_representation`] re-examines every
//! descendant instead.
//!
//! ## Levels
//!
//! Leaves start at level 1. Adding `child -> parent` raises
//! `level(parent)` to at least `level(child) + 1`. Levels are never lowered,
//! not even when the edge that raised them is removed. With
//! [`NetworkConfig::propagate_levels`] the raise is carried up through every
//! ancestor; otherwise only the direct parent moves.

use crate::graph::{GraphStore, TypedGraph};
use crate::primitives::DEFAULT_GENERALISATION_LEVEL;
use crate::state::NodeStateStore;
use crate::{EdgeKind, EnsmError, NetworkConfig, NodeKey, NodeState};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

// =============================================================================
// CONTROL LIST
// =============================================================================

/// Insertion-ordered set: enumeration follows order of first membership.
#[derive(Debug, Clone)]
pub struct ControlList<T> {
    members: Vec<T>,
    index: BTreeSet<T>,
}

impl<T> Default for ControlList<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            index: BTreeSet::new(),
        }
    }
}

impl<T: NodeKey> ControlList<T> {
    /// Append if absent. Returns `true` if the node was added.
    fn insert(&mut self, node: &T) -> bool {
        if !self.index.insert(node.clone()) {
            return false;
        }
        self.members.push(node.clone());
        true
    }

    /// Returns `true` if the node was present.
    fn remove(&mut self, node: &T) -> bool {
        if !self.index.remove(node) {
            return false;
        }
        self.members.retain(|n| n != node);
        true
    }

    #[must_use]
    pub fn contains(&self, node: &T) -> bool {
        self.index.contains(node)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// =============================================================================
// NETWORK
// =============================================================================

/// The generalisation network.
///
/// Single writer: every mutator takes `&mut self`. Observers take `&self`
/// and never fail; asking about an unregistered node yields an empty answer.
#[derive(Debug, Clone)]
pub struct GeneralisationNetwork<T> {
    graph: TypedGraph<T>,
    states: NodeStateStore<T>,
    levels: BTreeMap<T, u32>,

    active: ControlList<T>,
    inactive: ControlList<T>,
    represented: ControlList<T>,
    not_represented: ControlList<T>,

    config: NetworkConfig,
}

impl<T> Default for GeneralisationNetwork<T> {
    fn default() -> Self {
        Self {
            graph: TypedGraph::default(),
            states: NodeStateStore::default(),
            levels: BTreeMap::new(),
            active: ControlList::default(),
            inactive: ControlList::default(),
            represented: ControlList::default(),
            not_represented: ControlList::default(),
            config: NetworkConfig::default(),
        }
    }
}

impl<T: NodeKey> GeneralisationNetwork<T> {
    /// Create an empty network with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: NetworkConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Read-only view of the underlying typed graph.
    #[must_use]
    pub fn graph(&self) -> &TypedGraph<T> {
        &self.graph
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a node at level 1, `Inactive`.
    ///
    /// Registering a node twice is a no-op and returns `false`; its level and
    /// state are kept.
    pub fn add(&mut self, node: T) -> bool {
        if !self.graph.add_node(node.clone()) {
            return false;
        }
        self.levels.insert(node.clone(), DEFAULT_GENERALISATION_LEVEL);
        self.recompute_control_lists(&node);
        true
    }

    /// Unregister a node, dropping every edge that touches it.
    ///
    /// Former children lose a parent, so they are re-examined (and, with
    /// eager representation, so are all their descendants).
    pub fn remove(&mut self, node: &T) -> Result<(), EnsmError> {
        self.ensure_registered(node)?;
        let children = self.children(node);

        self.graph.remove_node(node);
        self.levels.remove(node);
        self.states.remove(node);
        self.active.remove(node);
        self.inactive.remove(node);
        self.represented.remove(node);
        self.not_represented.remove(node);

        for child in &children {
            self.touch(child);
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, node: &T) -> bool {
        self.graph.contains_node(node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.graph.nodes()
    }

    // -------------------------------------------------------------------------
    // Generalisation edges
    // -------------------------------------------------------------------------

    /// Add `child -> parent` and raise the parent's level.
    ///
    /// Fails with `UnknownNode` if either node is unregistered,
    /// `DuplicateEdge` if the generalisation exists, and `CycleDetected` if
    /// `child` is `parent` or already one of its ancestors. Nothing changes on
    /// failure.
    pub fn add_generalisation(&mut self, child: &T, parent: &T) -> Result<(), EnsmError> {
        self.ensure_registered(child)?;
        self.ensure_registered(parent)?;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(EnsmError::CycleDetected {
                child: format!("{:?}", child),
                parent: format!("{:?}", parent),
            });
        }
        self.graph.add_edge(child, parent, EdgeKind::Generalisation)?;

        let child_level = self.level_of(child);
        self.raise_level(parent, child_level.saturating_add(1));
        if self.config.propagate_levels {
            self.propagate_levels_from(parent);
        }

        self.touch(child);
        Ok(())
    }

    /// Remove `child -> parent`. Returns `false` if there was no such edge.
    ///
    /// Levels are left as they are. The child is re-examined; its descendants
    /// only with eager representation.
    pub fn remove_generalisation(&mut self, child: &T, parent: &T) -> Result<bool, EnsmError> {
        self.ensure_registered(child)?;
        self.ensure_registered(parent)?;
        if !self
            .graph
            .remove_edge(child, parent, EdgeKind::Generalisation)
        {
            return Ok(false);
        }
        self.touch(child);
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    /// Current state; unregistered nodes read as `Inactive`.
    #[must_use]
    pub fn state(&self, node: &T) -> NodeState {
        self.states.state(node)
    }

    /// Change a node's state. Re-assigning the current state does nothing.
    pub fn set_state(&mut self, node: &T, state: NodeState) -> Result<(), EnsmError> {
        self.ensure_registered(node)?;
        if self.states.set_state(node, state) {
            self.touch(node);
        }
        Ok(())
    }

    /// Recompute the control-list membership of one node.
    pub fn refresh(&mut self, node: &T) -> Result<(), EnsmError> {
        self.ensure_registered(node)?;
        self.recompute_control_lists(node);
        Ok(())
    }

    /// Recompute the control-list membership of every node.
    pub fn refresh_all(&mut self) {
        let nodes: Vec<T> = self.graph.nodes().cloned().collect();
        for node in &nodes {
            self.recompute_control_lists(node);
        }
    }

    // -------------------------------------------------------------------------
    // Structure queries
    // -------------------------------------------------------------------------

    /// Destinations of the node's outgoing generalisations.
    #[must_use]
    pub fn parents(&self, node: &T) -> Vec<T> {
        self.graph
            .successors(node, EdgeKind::Generalisation)
            .cloned()
            .collect()
    }

    /// Sources of the node's incoming generalisations.
    #[must_use]
    pub fn children(&self, node: &T) -> Vec<T> {
        self.graph
            .predecessors(node, EdgeKind::Generalisation)
            .cloned()
            .collect()
    }

    /// Children of any of the node's parents that sit at the node's level.
    ///
    /// The node itself is excluded and duplicates (siblings through several
    /// parents) appear once, in first-seen order.
    #[must_use]
    pub fn brothers(&self, node: &T) -> Vec<T> {
        let mut brothers = Vec::new();
        for parent in self.graph.successors(node, EdgeKind::Generalisation) {
            self.collect_brothers(node, parent, &mut brothers);
        }
        brothers
    }

    /// Same as [`brothers`](Self::brothers), restricted to one parent.
    #[must_use]
    pub fn brothers_under(&self, node: &T, parent: &T) -> Vec<T> {
        let mut brothers = Vec::new();
        self.collect_brothers(node, parent, &mut brothers);
        brothers
    }

    fn collect_brothers(&self, node: &T, parent: &T, brothers: &mut Vec<T>) {
        let level = self.levels.get(node);
        for child in self.graph.predecessors(parent, EdgeKind::Generalisation) {
            if child != node && !brothers.contains(child) && self.levels.get(child) == level {
                brothers.push(child.clone());
            }
        }
    }

    /// Registered nodes without parents, in registration order.
    #[must_use]
    pub fn top_boundary(&self) -> Vec<T> {
        self.graph
            .nodes()
            .filter(|n| {
                self.graph
                    .successors(n, EdgeKind::Generalisation)
                    .next()
                    .is_none()
            })
            .cloned()
            .collect()
    }

    /// Generalisation level, or `None` for an unregistered node.
    #[must_use]
    pub fn generalisation_level(&self, node: &T) -> Option<u32> {
        self.levels.get(node).copied()
    }

    /// True if the node has no children.
    #[must_use]
    pub fn is_leaf(&self, node: &T) -> bool {
        self.graph
            .predecessors(node, EdgeKind::Generalisation)
            .next()
            .is_none()
    }

    /// True if the node is active or any ancestor is active.
    ///
    /// Depth-first over parents in enumeration order, stopping at the first
    /// active node. Shared ancestors are visited once.
    #[must_use]
    pub fn is_represented(&self, node: &T) -> bool {
        if !self.contains(node) {
            return false;
        }
        let mut visited = BTreeSet::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if self.states.state(current).is_active() {
                return true;
            }
            // Reverse so the first parent is popped first
            let parents: Vec<&T> = self
                .graph
                .successors(current, EdgeKind::Generalisation)
                .collect();
            stack.extend(parents.into_iter().rev());
        }
        false
    }

    /// True if `ancestor` is reachable from `node` by following generalisations.
    ///
    /// Every parent is explored, so an ancestor reachable only through a later
    /// parent is still found. A node is not its own ancestor.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: &T, node: &T) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<&T> = self
            .graph
            .successors(node, EdgeKind::Generalisation)
            .collect();
        stack.reverse();

        while let Some(current) = stack.pop() {
            if current == ancestor {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            let parents: Vec<&T> = self
                .graph
                .successors(current, EdgeKind::Generalisation)
                .collect();
            stack.extend(parents.into_iter().rev());
        }
        false
    }

    /// All ancestors, breadth-first, each once.
    #[must_use]
    pub fn ancestors(&self, node: &T) -> Vec<T> {
        self.breadth_first(node, |n| {
            self.graph.successors(n, EdgeKind::Generalisation).collect()
        })
    }

    /// All descendants, breadth-first, each once.
    #[must_use]
    pub fn descendants(&self, node: &T) -> Vec<T> {
        self.breadth_first(node, |n| {
            self.graph
                .predecessors(n, EdgeKind::Generalisation)
                .collect()
        })
    }

    fn breadth_first<'a, F>(&'a self, start: &'a T, next: F) -> Vec<T>
    where
        F: Fn(&'a T) -> Vec<&'a T>,
    {
        let mut visited: BTreeSet<&T> = BTreeSet::new();
        let mut queue: VecDeque<&T> = VecDeque::new();
        let mut order = Vec::new();

        visited.insert(start);
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            for neighbour in next(current) {
                if visited.insert(neighbour) {
                    order.push(neighbour.clone());
                    queue.push_back(neighbour);
                }
            }
        }
        order
    }

    // -------------------------------------------------------------------------
    // Control lists
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn active_nodes(&self) -> &[T] {
        self.active.as_slice()
    }

    #[must_use]
    pub fn inactive_nodes(&self) -> &[T] {
        self.inactive.as_slice()
    }

    #[must_use]
    pub fn represented_nodes(&self) -> &[T] {
        self.represented.as_slice()
    }

    #[must_use]
    pub fn not_represented_nodes(&self) -> &[T] {
        self.not_represented.as_slice()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn ensure_registered(&self, node: &T) -> Result<(), EnsmError> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(EnsmError::unknown(node))
        }
    }

    fn level_of(&self, node: &T) -> u32 {
        self.levels
            .get(node)
            .copied()
            .unwrap_or(DEFAULT_GENERALISATION_LEVEL)
    }

    /// Returns `true` if the level went up.
    fn raise_level(&mut self, node: &T, at_least: u32) -> bool {
        match self.levels.get_mut(node) {
            Some(level) if *level < at_least => {
                *level = at_least;
                true
            }
            _ => false,
        }
    }

    /// Restore `level(parent) >= level(child) + 1` above a raised node.
    fn propagate_levels_from(&mut self, start: &T) {
        let mut queue = VecDeque::from([start.clone()]);
        while let Some(current) = queue.pop_front() {
            let required = self.level_of(&current).saturating_add(1);
            for parent in self.parents(&current) {
                if self.raise_level(&parent, required) {
                    queue.push_back(parent);
                }
            }
        }
    }

    /// Recompute a touched node and, with eager representation, its descendants.
    fn touch(&mut self, node: &T) {
        self.recompute_control_lists(node);
        if self.config.eager_representation {
            for descendant in self.descendants(node) {
                self.recompute_control_lists(&descendant);
            }
        }
    }

    fn recompute_control_lists(&mut self, node: &T) {
        if self.states.state(node).is_active() {
            self.active.insert(node);
            self.inactive.remove(node);
        } else {
            self.inactive.insert(node);
            self.active.remove(node);
        }

        if self.is_represented(node) {
            self.represented.insert(node);
            self.not_represented.remove(node);
        } else {
            self.not_represented.insert(node);
            self.represented.remove(node);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
