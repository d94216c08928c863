//! # Typed Edge Graph
//!
//! Low-level directed multigraph keyed by node identity.
//!
//! Every edge carries an [`EdgeKind`]. Two nodes may be joined by several
//! edges as long as their kinds differ. Adjacency is stored twice (outgoing
//! and incoming) so both directions enumerate without a scan.
//!
//! Node registration order and per-node edge insertion order are preserved,
//! so enumerations are stable between mutations.

use crate::{EdgeKind, EnsmError, NodeKey};
use std::collections::BTreeMap;

// =============================================================================
// EDGE
// =============================================================================

/// One incident edge seen from a node: its kind and the other endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<T> {
    pub kind: EdgeKind,
    pub endpoint: T,
}

impl<T> Edge<T> {
    #[must_use]
    pub const fn new(kind: EdgeKind, endpoint: T) -> Self {
        Self { kind, endpoint }
    }
}

// =============================================================================
// GRAPHSTORE TRAIT
// =============================================================================

/// The GraphStore trait defines the typed-edge graph operations.
///
/// Queries on unregistered nodes return empty enumerations. Only edge
/// insertion can fail.
pub trait GraphStore<T: NodeKey> {
    /// Register a node. Returns `false` if it was already registered.
    fn add_node(&mut self, node: T) -> bool;

    /// Remove a node and every incident edge. Returns `false` if absent.
    fn remove_node(&mut self, node: &T) -> bool;

    /// Insert the edge `from -> to` of the given kind.
    ///
    /// Fails with `EndpointMissing` if either endpoint is unregistered and
    /// with `DuplicateEdge` if an edge of that kind already joins the pair.
    fn add_edge(&mut self, from: &T, to: &T, kind: EdgeKind) -> Result<(), EnsmError>;

    /// Remove the edge `from -> to` of the given kind. Returns `false` if absent.
    fn remove_edge(&mut self, from: &T, to: &T, kind: EdgeKind) -> bool;

    /// Outgoing edges of a node (kind + destination).
    fn out_edges(&self, node: &T) -> Vec<Edge<T>>;

    /// Incoming edges of a node (kind + source).
    fn in_edges(&self, node: &T) -> Vec<Edge<T>>;

    /// Check if a node is registered.
    fn contains_node(&self, node: &T) -> bool;

    /// Check if an edge of the given kind joins `from -> to`.
    fn contains_edge(&self, from: &T, to: &T, kind: EdgeKind) -> bool;

    /// Get the total number of nodes.
    fn node_count(&self) -> usize;

    /// Get the total number of edges.
    fn edge_count(&self) -> usize;
}

// =============================================================================
// GRAPH IMPLEMENTATION
// =============================================================================

#[derive(Debug, Clone)]
struct Adjacency<T> {
    outgoing: Vec<Edge<T>>,
    incoming: Vec<Edge<T>>,
}

impl<T> Default for Adjacency<T> {
    fn default() -> Self {
        Self {
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }
}

/// The typed edge graph.
///
/// Uses `BTreeMap` for keyed lookup; `Vec` keeps registration and edge order.
#[derive(Debug, Clone)]
pub struct TypedGraph<T> {
    /// Registered nodes in registration order.
    order: Vec<T>,

    /// Adjacency: node -> (outgoing, incoming)
    adjacency: BTreeMap<T, Adjacency<T>>,

    edge_count: usize,
}

impl<T> Default for TypedGraph<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            adjacency: BTreeMap::new(),
            edge_count: 0,
        }
    }
}

impl<T: NodeKey> TypedGraph<T> {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.order.iter()
    }

    /// All edges as `(from, to, kind)`, grouped by source in registration order.
    pub fn edges(&self) -> impl Iterator<Item = (&T, &T, EdgeKind)> + '_ {
        self.order.iter().flat_map(move |from| {
            self.out_iter(from)
                .map(move |edge| (from, &edge.endpoint, edge.kind))
        })
    }

    /// Outgoing edges (iterator version for traversal algorithms).
    pub fn out_iter(&self, node: &T) -> impl Iterator<Item = &Edge<T>> + '_ {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|adj| adj.outgoing.iter())
    }

    /// Incoming edges (iterator version for traversal algorithms).
    pub fn in_iter(&self, node: &T) -> impl Iterator<Item = &Edge<T>> + '_ {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|adj| adj.incoming.iter())
    }

    /// Destinations of outgoing edges of one kind.
    pub fn successors(&self, node: &T, kind: EdgeKind) -> impl Iterator<Item = &T> + '_ {
        self.out_iter(node)
            .filter(move |edge| edge.kind == kind)
            .map(|edge| &edge.endpoint)
    }

    /// Sources of incoming edges of one kind.
    pub fn predecessors(&self, node: &T, kind: EdgeKind) -> impl Iterator<Item = &T> + '_ {
        self.in_iter(node)
            .filter(move |edge| edge.kind == kind)
            .map(|edge| &edge.endpoint)
    }
}

impl<T: NodeKey> GraphStore<T> for TypedGraph<T> {
    fn add_node(&mut self, node: T) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.order.push(node.clone());
        self.adjacency.insert(node, Adjacency::default());
        true
    }

    fn remove_node(&mut self, node: &T) -> bool {
        let Some(adj) = self.adjacency.remove(node) else {
            return false;
        };
        self.order.retain(|n| n != node);

        // Purge the mirrored half of every incident edge
        for edge in &adj.outgoing {
            if let Some(other) = self.adjacency.get_mut(&edge.endpoint) {
                other
                    .incoming
                    .retain(|e| !(e.kind == edge.kind && &e.endpoint == node));
            }
        }
        for edge in &adj.incoming {
            if let Some(other) = self.adjacency.get_mut(&edge.endpoint) {
                other
                    .outgoing
                    .retain(|e| !(e.kind == edge.kind && &e.endpoint == node));
            }
        }

        // A self-loop appears in both lists but is one edge
        let self_loops = adj
            .outgoing
            .iter()
            .filter(|e| &e.endpoint == node)
            .count();
        let removed = (adj.outgoing.len() + adj.incoming.len()).saturating_sub(self_loops);
        self.edge_count = self.edge_count.saturating_sub(removed);
        true
    }

    fn add_edge(&mut self, from: &T, to: &T, kind: EdgeKind) -> Result<(), EnsmError> {
        if !self.adjacency.contains_key(from) || !self.adjacency.contains_key(to) {
            return Err(EnsmError::EndpointMissing {
                from: format!("{:?}", from),
                to: format!("{:?}", to),
            });
        }
        if self.contains_edge(from, to, kind) {
            return Err(EnsmError::DuplicateEdge {
                from: format!("{:?}", from),
                to: format!("{:?}", to),
                kind,
            });
        }

        if let Some(adj) = self.adjacency.get_mut(from) {
            adj.outgoing.push(Edge::new(kind, to.clone()));
        }
        if let Some(adj) = self.adjacency.get_mut(to) {
            adj.incoming.push(Edge::new(kind, from.clone()));
        }
        self.edge_count = self.edge_count.saturating_add(1);
        Ok(())
    }

    fn remove_edge(&mut self, from: &T, to: &T, kind: EdgeKind) -> bool {
        if !self.contains_edge(from, to, kind) {
            return false;
        }
        if let Some(adj) = self.adjacency.get_mut(from) {
            adj.outgoing
                .retain(|e| !(e.kind == kind && &e.endpoint == to));
        }
        if let Some(adj) = self.adjacency.get_mut(to) {
            adj.incoming
                .retain(|e| !(e.kind == kind && &e.endpoint == from));
        }
        self.edge_count = self.edge_count.saturating_sub(1);
        true
    }

    fn out_edges(&self, node: &T) -> Vec<Edge<T>> {
        self.out_iter(node).cloned().collect()
    }

    fn in_edges(&self, node: &T) -> Vec<Edge<T>> {
        self.in_iter(node).cloned().collect()
    }

    fn contains_node(&self, node: &T) -> bool {
        self.adjacency.contains_key(node)
    }

    fn contains_edge(&self, from: &T, to: &T, kind: EdgeKind) -> bool {
        self.out_iter(from)
            .any(|e| e.kind == kind && &e.endpoint == to)
    }

    fn node_count(&self) -> usize {
        self.order.len()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(nodes: &[&'static str]) -> TypedGraph<&'static str> {
        let mut graph = TypedGraph::new();
        for node in nodes {
            graph.add_node(*node);
        }
        graph
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut graph = TypedGraph::new();
        assert!(graph.add_node("a"));
        assert!(!graph.add_node("a"));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn nodes_keep_registration_order() {
        let graph = graph_with(&["c", "a", "b"]);
        let nodes: Vec<_> = graph.nodes().copied().collect();
        assert_eq!(nodes, vec!["c", "a", "b"]);
    }

    #[test]
    fn add_edge_requires_endpoints() {
        let mut graph = graph_with(&["a"]);
        let result = graph.add_edge(&"a", &"ghost", EdgeKind::Generalisation);
        assert!(matches!(result, Err(EnsmError::EndpointMissing { .. })));
        let result = graph.add_edge(&"ghost", &"a", EdgeKind::Generalisation);
        assert!(matches!(result, Err(EnsmError::EndpointMissing { .. })));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn duplicate_edge_of_same_kind_rejected() {
        let mut graph = graph_with(&["a", "b"]);
        graph
            .add_edge(&"a", &"b", EdgeKind::Generalisation)
            .expect("first edge");

        let result = graph.add_edge(&"a", &"b", EdgeKind::Generalisation);
        assert!(matches!(
            result,
            Err(EnsmError::DuplicateEdge {
                kind: EdgeKind::Generalisation,
                ..
            })
        ));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn parallel_edges_of_different_kinds_allowed() {
        let mut graph = graph_with(&["a", "b"]);
        graph
            .add_edge(&"a", &"b", EdgeKind::Generalisation)
            .expect("edge");
        graph
            .add_edge(&"a", &"b", EdgeKind::Substitutability)
            .expect("edge");
        graph
            .add_edge(&"b", &"a", EdgeKind::Generalisation)
            .expect("reverse edge is a different ordered pair");

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.out_edges(&"a").len(), 2);
        assert_eq!(graph.in_edges(&"b").len(), 2);
        let gen_out: Vec<_> = graph.successors(&"a", EdgeKind::Generalisation).collect();
        assert_eq!(gen_out, vec![&"b"]);
    }

    #[test]
    fn remove_edge_is_noop_when_absent() {
        let mut graph = graph_with(&["a", "b"]);
        assert!(!graph.remove_edge(&"a", &"b", EdgeKind::Inclusion));

        graph.add_edge(&"a", &"b", EdgeKind::Inclusion).expect("edge");
        assert!(graph.remove_edge(&"a", &"b", EdgeKind::Inclusion));
        assert!(!graph.contains_edge(&"a", &"b", EdgeKind::Inclusion));
        assert!(graph.in_edges(&"b").is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn remove_node_purges_incident_edges() {
        let mut graph = graph_with(&["a", "b", "c"]);
        graph.add_edge(&"a", &"b", EdgeKind::Generalisation).expect("edge");
        graph.add_edge(&"b", &"c", EdgeKind::Generalisation).expect("edge");
        graph.add_edge(&"c", &"b", EdgeKind::Regulation).expect("edge");

        assert!(graph.remove_node(&"b"));
        assert!(!graph.contains_node(&"b"));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.out_edges(&"a").is_empty());
        assert!(graph.in_edges(&"c").is_empty());
        assert!(graph.out_edges(&"c").is_empty());
        assert!(!graph.remove_node(&"b"));
    }

    #[test]
    fn remove_node_counts_self_loop_once() {
        let mut graph = graph_with(&["a", "b"]);
        graph.add_edge(&"a", &"a", EdgeKind::Concurrency).expect("loop");
        graph.add_edge(&"a", &"b", EdgeKind::Concurrency).expect("edge");
        assert_eq!(graph.edge_count(), 2);

        graph.remove_node(&"a");
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn queries_on_unknown_node_are_empty() {
        let graph = graph_with(&["a"]);
        assert!(graph.out_edges(&"nope").is_empty());
        assert!(graph.in_edges(&"nope").is_empty());
        assert!(!graph.contains_edge(&"nope", &"a", EdgeKind::Generalisation));
    }

    #[test]
    fn edges_enumerate_by_source() {
        let mut graph = graph_with(&["a", "b", "c"]);
        graph.add_edge(&"b", &"c", EdgeKind::Inclusion).expect("edge");
        graph.add_edge(&"a", &"c", EdgeKind::Generalisation).expect("edge");

        let edges: Vec<_> = graph.edges().map(|(f, t, k)| (*f, *t, k)).collect();
        assert_eq!(
            edges,
            vec![
                ("a", "c", EdgeKind::Generalisation),
                ("b", "c", EdgeKind::Inclusion),
            ]
        );
    }
}
