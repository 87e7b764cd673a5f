//! The network container and its lookup indices
//!
//! A [`NetworkIndex`] owns every node and edge object in an arena and keeps
//! four derived structures consistent with the live set:
//!
//! - `nodes` / `edges`: live objects in insertion order
//! - `node_by_id` / `edge_by_id`: identifier to live object
//! - `adjacency`: tail to head to edge, populated only in the a→b direction
//!
//! Objects that are not bound in the id maps are *detached*: freshly created,
//! cloned, or removed. They remain addressable by key until discarded.

use std::collections::{HashMap, HashSet};

use crate::arena::Arena;
use crate::edge::{Edge, EdgeKey};
use crate::error::{ElementKey, Error, Result};
use crate::identifier::Identifier;
use crate::node::{Node, NodeKey};
use crate::weight::Weight;

/// Graph data model: a directed multigraph with dual-weighted edges
#[derive(Debug)]
pub struct NetworkIndex<N = (), E = ()> {
    pub(crate) node_store: Arena<Node<N>>,
    pub(crate) edge_store: Arena<Edge<E>>,
    pub(crate) nodes: Vec<NodeKey>,
    pub(crate) edges: Vec<EdgeKey>,
    pub(crate) node_by_id: HashMap<Identifier, NodeKey>,
    pub(crate) edge_by_id: HashMap<Identifier, EdgeKey>,
    pub(crate) adjacency: HashMap<NodeKey, HashMap<NodeKey, EdgeKey>>,
}

impl<N, E> Default for NetworkIndex<N, E> {
    fn default() -> Self {
        Self {
            node_store: Arena::new(),
            edge_store: Arena::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            node_by_id: HashMap::new(),
            edge_by_id: HashMap::new(),
            adjacency: HashMap::new(),
        }
    }
}

impl<N, E> NetworkIndex<N, E> {
    /// Create an empty network
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Object access
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve a node handle, live or detached
    pub fn node(&self, key: NodeKey) -> Option<&Node<N>> {
        self.node_store.get(key.0)
    }

    /// Mutable access for in-place `value` / `meta` edits
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node<N>> {
        self.node_store.get_mut(key.0)
    }

    /// Resolve an edge handle, live or detached
    pub fn edge(&self, key: EdgeKey) -> Option<&Edge<E>> {
        self.edge_store.get(key.0)
    }

    /// Mutable access for in-place weight / `meta` edits
    pub fn edge_mut(&mut self, key: EdgeKey) -> Option<&mut Edge<E>> {
        self.edge_store.get_mut(key.0)
    }

    /// Live nodes in insertion order
    pub fn nodes(&self) -> &[NodeKey] {
        &self.nodes
    }

    /// Live edges in insertion order
    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up the live node bound to an identifier
    pub fn node_by_id(&self, id: &Identifier) -> Option<NodeKey> {
        self.node_by_id.get(id).copied()
    }

    /// Look up the live edge bound to an identifier
    pub fn edge_by_id(&self, id: &Identifier) -> Option<EdgeKey> {
        self.edge_by_id.get(id).copied()
    }

    /// True when `key` is the object currently bound to its own id
    pub fn is_live_node(&self, key: NodeKey) -> bool {
        self.node(key)
            .map(|node| self.node_by_id.get(&node.id) == Some(&key))
            .unwrap_or(false)
    }

    /// True when `key` is the object currently bound to its own id
    pub fn is_live_edge(&self, key: EdgeKey) -> bool {
        self.edge(key)
            .map(|edge| self.edge_by_id.get(&edge.id) == Some(&key))
            .unwrap_or(false)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Object creation
    // ─────────────────────────────────────────────────────────────────────────

    /// Allocate a detached node. It joins the network through `add_nodes`.
    pub fn create_node(
        &mut self,
        id: impl Into<Identifier>,
        value: impl Into<Weight>,
        meta: N,
    ) -> NodeKey {
        NodeKey(self.node_store.insert(Node::new(id.into(), value.into(), meta)))
    }

    /// Allocate a detached edge from `a` to `b`
    ///
    /// The edge is staged on the `out` / `in` lists of endpoints that are
    /// themselves detached, so adding those nodes later brings the edge in.
    /// Live endpoints are left untouched; use `add_edges` to link the edge.
    pub fn create_edge(
        &mut self,
        id: impl Into<Identifier>,
        a: NodeKey,
        b: NodeKey,
        atob: impl Into<Weight>,
        btoa: impl Into<Weight>,
        meta: E,
    ) -> Result<EdgeKey> {
        if !self.node_store.contains(a.0) {
            return Err(Error::StaleHandle(ElementKey::Node(a)));
        }
        if !self.node_store.contains(b.0) {
            return Err(Error::StaleHandle(ElementKey::Node(b)));
        }

        let edge = Edge {
            id: id.into(),
            a,
            b,
            atob: atob.into(),
            btoa: btoa.into(),
            meta,
        };
        let key = EdgeKey(self.edge_store.insert(edge));

        if !self.is_live_node(a) {
            if let Some(node) = self.node_store.get_mut(a.0) {
                node.outgoing.push(key);
            }
        }
        if !self.is_live_node(b) {
            if let Some(node) = self.node_store.get_mut(b.0) {
                node.incoming.push(key);
            }
        }

        Ok(key)
    }

    /// Free a detached node's storage. Its key goes stale.
    pub fn discard_node(&mut self, key: NodeKey) -> Result<Node<N>> {
        if self.is_live_node(key) {
            return Err(Error::NodeLive(key));
        }
        self.node_store
            .remove(key.0)
            .ok_or(Error::StaleHandle(ElementKey::Node(key)))
    }

    /// Free a detached edge's storage. Its key goes stale.
    pub fn discard_edge(&mut self, key: EdgeKey) -> Result<Edge<E>> {
        if self.is_live_edge(key) {
            return Err(Error::EdgeLive(key));
        }
        self.edge_store
            .remove(key.0)
            .ok_or(Error::StaleHandle(ElementKey::Edge(key)))
    }

    /// Number of stored objects (live and detached) as `(nodes, edges)`
    pub fn stored_counts(&self) -> (usize, usize) {
        (self.node_store.len(), self.edge_store.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Adjacency
    // ─────────────────────────────────────────────────────────────────────────

    /// The indexed a→b edge. Does not probe b→a.
    pub fn adjacent(&self, a: NodeKey, b: NodeKey) -> Option<EdgeKey> {
        self.adjacency.get(&a)?.get(&b).copied()
    }

    /// Every `(a, b, edge)` entry of the adjacency index
    pub fn adjacency_entries(&self) -> impl Iterator<Item = (NodeKey, NodeKey, EdgeKey)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(a, heads)| heads.iter().map(move |(b, e)| (*a, *b, *e)))
    }

    /// Connecting edge between two nodes in either direction, via the index
    pub fn get_edge(&self, a: NodeKey, b: NodeKey) -> Option<EdgeKey> {
        self.adjacent(a, b).or_else(|| self.adjacent(b, a))
    }

    /// Connecting edge between two nodes found by scanning `a`'s edge lists
    pub fn find_edge_scan(&self, a: NodeKey, b: NodeKey) -> Option<EdgeKey> {
        let node = self.node(a)?;
        node.incoming
            .iter()
            .copied()
            .find(|e| self.edge(*e).map(|edge| edge.a == b).unwrap_or(false))
            .or_else(|| {
                node.outgoing
                    .iter()
                    .copied()
                    .find(|e| self.edge(*e).map(|edge| edge.b == b).unwrap_or(false))
            })
    }

    pub(crate) fn index_adjacency(&mut self, a: NodeKey, b: NodeKey, edge: EdgeKey) {
        // The first a→b edge stays indexed when duplicates are added
        self.adjacency.entry(a).or_default().entry(b).or_insert(edge);
    }

    /// Drop `edge` from the index, re-pointing the entry at a surviving
    /// duplicate a→b edge when one is still linked on `a`
    pub(crate) fn unindex_adjacency(&mut self, a: NodeKey, b: NodeKey, edge: EdgeKey) {
        if self.adjacent(a, b) != Some(edge) {
            return;
        }

        let survivor = self.node(a).and_then(|node| {
            node.outgoing.iter().copied().find(|other| {
                *other != edge
                    && self.is_live_edge(*other)
                    && self.edge(*other).map(|e| e.b == b).unwrap_or(false)
            })
        });

        if let Some(heads) = self.adjacency.get_mut(&a) {
            match survivor {
                Some(other) => {
                    heads.insert(b, other);
                }
                None => {
                    heads.remove(&b);
                    if heads.is_empty() {
                        self.adjacency.remove(&a);
                    }
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// True when every key is a live node
    pub fn has_nodes(&self, keys: &[NodeKey]) -> bool {
        keys.iter().all(|key| self.is_live_node(*key))
    }

    /// True when the node carries an edge whose both ends are itself
    pub fn has_circular_edge(&self, key: NodeKey) -> bool {
        let Some(node) = self.node(key) else {
            return false;
        };
        if node.incoming.is_empty() || node.outgoing.is_empty() {
            return false;
        }

        // A self-loop sits in both lists, so the shorter one is enough
        let shortest = if node.incoming.len() > node.outgoing.len() {
            &node.outgoing
        } else {
            &node.incoming
        };
        shortest
            .iter()
            .any(|e| self.edge(*e).map(|edge| edge.is_circular()).unwrap_or(false))
    }

    /// Deduplicated union of the given nodes' incoming and outgoing edges
    pub fn all_edges(&self, keys: &[NodeKey]) -> Vec<EdgeKey> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for node in keys.iter().filter_map(|key| self.node(*key)) {
            for edge in node.incoming.iter().chain(node.outgoing.iter()) {
                if seen.insert(*edge) {
                    out.push(*edge);
                }
            }
        }

        out
    }

    /// Live nodes that are not connected to anything
    pub fn no_connections(&self) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .copied()
            .filter(|key| {
                self.node(*key)
                    .map(|node| node.incoming.is_empty() && node.outgoing.is_empty())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Check every structural invariant, reporting the first violation
    ///
    /// Holds whenever all mutation went through the mutation operators.
    pub fn verify(&self) -> Result<()> {
        let violation = |msg: String| Err(Error::Validation(msg));

        if self.node_by_id.len() != self.nodes.len() {
            return violation(format!(
                "{} live nodes but {} node ids bound",
                self.nodes.len(),
                self.node_by_id.len()
            ));
        }
        if self.edge_by_id.len() != self.edges.len() {
            return violation(format!(
                "{} live edges but {} edge ids bound",
                self.edges.len(),
                self.edge_by_id.len()
            ));
        }

        for &key in &self.nodes {
            if !self.is_live_node(key) {
                return violation(format!("{} listed but not bound to its id", key));
            }
            let Some(node) = self.node(key) else {
                return violation(format!("{} listed but not stored", key));
            };
            for &e in &node.outgoing {
                if !self.is_live_edge(e) || self.edge(e).map(|edge| edge.a) != Some(key) {
                    return violation(format!("{} lists {} as outgoing", key, e));
                }
            }
            for &e in &node.incoming {
                if !self.is_live_edge(e) || self.edge(e).map(|edge| edge.b) != Some(key) {
                    return violation(format!("{} lists {} as incoming", key, e));
                }
            }
        }

        for &key in &self.edges {
            if !self.is_live_edge(key) {
                return violation(format!("{} listed but not bound to its id", key));
            }
            let Some(edge) = self.edge(key) else {
                return violation(format!("{} listed but not stored", key));
            };
            if !self.is_live_node(edge.a) || !self.is_live_node(edge.b) {
                return violation(format!("{} has an endpoint outside the network", key));
            }
            let in_a = self.node(edge.a).map(|n| n.outgoing.contains(&key));
            let in_b = self.node(edge.b).map(|n| n.incoming.contains(&key));
            if in_a != Some(true) || in_b != Some(true) {
                return violation(format!("{} is not linked on both endpoints", key));
            }
            if self.adjacent(edge.a, edge.b).is_none() {
                return violation(format!("{} has no adjacency entry", key));
            }
        }

        for (a, b, e) in self.adjacency_entries() {
            match self.edge(e) {
                Some(edge) if self.is_live_edge(e) && edge.a == a && edge.b == b => {}
                _ => return violation(format!("adjacency {} -> {} points at {}", a, b, e)),
            }
        }

        Ok(())
    }
}
