//! Mutation operators
//!
//! Every structural change to a [`NetworkIndex`] goes through these
//! operators. They never fail as a whole: each element of a batch either
//! applies or is reported as a [`MutationError`] in the returned result.

use std::collections::{HashMap, HashSet};

use crate::edge::{Edge, EdgeKey};
use crate::error::{ElementKey, Error, MutationError, Result};
use crate::identifier::Identifier;
use crate::network::NetworkIndex;
use crate::node::{Node, NodeKey};
use crate::weight::Weight;

/// Batch context for add operations
///
/// Elements recorded here are not reported as duplicates when they are seen
/// again within the same batch.
#[derive(Debug, Clone, Default)]
pub struct AddContext {
    pub nodes: HashSet<NodeKey>,
    pub edges: HashSet<EdgeKey>,
}

/// Batch context for remove operations
///
/// Elements recorded here are silently accepted when a later call in the
/// same batch asks to remove them again.
#[derive(Debug, Clone, Default)]
pub struct RemoveContext {
    pub nodes: HashSet<NodeKey>,
    pub edges: HashSet<EdgeKey>,
}

/// Outcome of `add_nodes`
#[derive(Debug, Clone, Default)]
pub struct AddNodesResult {
    /// Nodes linked by this call
    pub nodes: Vec<NodeKey>,
    /// Edges linked by replaying the added nodes' edge references
    pub edges: Vec<EdgeKey>,
    pub errors: Vec<MutationError>,
}

/// Outcome of `add_edges`
#[derive(Debug, Clone, Default)]
pub struct AddEdgesResult {
    pub edges: Vec<EdgeKey>,
    pub errors: Vec<MutationError>,
}

/// Outcome of `remove_nodes`
#[derive(Debug, Clone, Default)]
pub struct RemoveNodesResult {
    pub nodes: Vec<NodeKey>,
    /// Every edge unlinked because it touched a removed node
    pub edges: Vec<EdgeKey>,
    pub errors: Vec<MutationError>,
}

/// Outcome of `remove_edges`
#[derive(Debug, Clone, Default)]
pub struct RemoveEdgesResult {
    pub edges: Vec<EdgeKey>,
    pub errors: Vec<MutationError>,
}

/// Outcome of `combine_shared_edges`
#[derive(Debug, Clone, Default)]
pub struct CombineResult {
    /// Live edges produced by merging
    pub merged: Vec<EdgeKey>,
    /// Original edges replaced by a merge
    pub removed: Vec<EdgeKey>,
    pub errors: Vec<MutationError>,
}

macro_rules! impl_is_ok {
    ($($ty:ty),*) => {
        $(impl $ty {
            /// True when no element of the batch failed
            pub fn is_ok(&self) -> bool {
                self.errors.is_empty()
            }
        })*
    };
}

impl_is_ok!(
    AddNodesResult,
    AddEdgesResult,
    RemoveNodesResult,
    RemoveEdgesResult,
    CombineResult
);

/// The data a reducer hands back when two edges of one pair are combined
///
/// The merged edge keeps the orientation of the first edge seen for the pair.
#[derive(Debug, Clone)]
pub struct EdgeMerge<E> {
    pub id: Identifier,
    pub atob: Weight,
    pub btoa: Weight,
    pub meta: E,
}

impl<N, E> NetworkIndex<N, E> {
    // ─────────────────────────────────────────────────────────────────────────
    // Add
    // ─────────────────────────────────────────────────────────────────────────

    /// Add nodes, then link the edges they reference
    pub fn add_nodes(&mut self, nodes: &[NodeKey]) -> AddNodesResult {
        self.add_nodes_with(nodes, &mut AddContext::default())
    }

    /// Add nodes within a caller-held batch context
    ///
    /// Nodes are all accepted first; only then are each new node's `out` and
    /// `in` references replayed through `add_edges`, so an edge between two
    /// nodes of the same batch links regardless of their order.
    pub fn add_nodes_with(&mut self, nodes: &[NodeKey], ctx: &mut AddContext) -> AddNodesResult {
        let mut result = AddNodesResult::default();
        let mut needs_edges = Vec::new();

        for &key in nodes {
            let Some(id) = self.node(key).map(|node| node.id.clone()) else {
                result.errors.push(MutationError::UnknownElement {
                    element: ElementKey::Node(key),
                    id: None,
                });
                continue;
            };

            if let Some(&bound) = self.node_by_id.get(&id) {
                if bound != key && !ctx.nodes.contains(&key) {
                    result.errors.push(MutationError::DuplicateId {
                        element: ElementKey::Node(key),
                        id,
                    });
                }
                continue;
            }

            self.nodes.push(key);
            self.node_by_id.insert(id, key);
            ctx.nodes.insert(key);
            result.nodes.push(key);
            needs_edges.push(key);
        }

        // Lists are rebuilt from the edges that actually link, so every new
        // node is cleared before any edge is replayed
        let mut staged = Vec::with_capacity(needs_edges.len());
        for key in needs_edges {
            if let Some(node) = self.node_store.get_mut(key.0) {
                staged.push((
                    std::mem::take(&mut node.outgoing),
                    std::mem::take(&mut node.incoming),
                ));
            }
        }

        for (outgoing, incoming) in staged {
            self.link_edges(&outgoing, ctx, &mut result.edges, &mut result.errors);
            self.link_edges(&incoming, ctx, &mut result.edges, &mut result.errors);
        }

        tracing::debug!(
            "add_nodes: {} nodes, {} edges added, {} errors",
            result.nodes.len(),
            result.edges.len(),
            result.errors.len()
        );

        result
    }

    /// Add edges whose endpoints are already in the network
    pub fn add_edges(&mut self, edges: &[EdgeKey]) -> AddEdgesResult {
        self.add_edges_with(edges, &mut AddContext::default())
    }

    /// Add edges within a caller-held batch context
    pub fn add_edges_with(&mut self, edges: &[EdgeKey], ctx: &mut AddContext) -> AddEdgesResult {
        let mut result = AddEdgesResult::default();
        self.link_edges(edges, ctx, &mut result.edges, &mut result.errors);

        tracing::debug!(
            "add_edges: {} edges added, {} errors",
            result.edges.len(),
            result.errors.len()
        );

        result
    }

    fn link_edges(
        &mut self,
        edges: &[EdgeKey],
        ctx: &mut AddContext,
        added: &mut Vec<EdgeKey>,
        errors: &mut Vec<MutationError>,
    ) {
        for &key in edges {
            let Some((id, a, b)) = self.edge(key).map(|edge| (edge.id.clone(), edge.a, edge.b))
            else {
                errors.push(MutationError::UnknownElement {
                    element: ElementKey::Edge(key),
                    id: None,
                });
                continue;
            };

            if let Some(&bound) = self.edge_by_id.get(&id) {
                if bound != key && !ctx.edges.contains(&key) {
                    errors.push(MutationError::DuplicateId {
                        element: ElementKey::Edge(key),
                        id,
                    });
                }
                continue;
            }

            // Never partially link an edge
            let missing = [a, b].into_iter().find(|end| !self.is_live_node(*end));
            if let Some(endpoint) = missing {
                errors.push(MutationError::MissingEndpoint {
                    edge: key,
                    id,
                    endpoint,
                });
                continue;
            }

            self.edges.push(key);
            self.edge_by_id.insert(id, key);
            self.index_adjacency(a, b, key);

            if let Some(node) = self.node_store.get_mut(a.0) {
                if !node.outgoing.contains(&key) {
                    node.outgoing.push(key);
                }
            }
            if let Some(node) = self.node_store.get_mut(b.0) {
                if !node.incoming.contains(&key) {
                    node.incoming.push(key);
                }
            }

            ctx.edges.insert(key);
            added.push(key);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Remove
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove edges from the network
    pub fn remove_edges(&mut self, edges: &[EdgeKey]) -> RemoveEdgesResult {
        self.remove_edges_with(edges, &mut RemoveContext::default())
    }

    /// Remove edges within a caller-held batch context
    ///
    /// The id must resolve to the very object passed in; an id now held by a
    /// different object is an identity mismatch, not a removal.
    pub fn remove_edges_with(
        &mut self,
        edges: &[EdgeKey],
        ctx: &mut RemoveContext,
    ) -> RemoveEdgesResult {
        let mut result = RemoveEdgesResult::default();

        for &key in edges {
            let id = self.edge(key).map(|edge| edge.id.clone());

            if let Err(err) = check_bound(ElementKey::Edge(key), id, |id| {
                self.edge_by_id.get(id).map(|bound| *bound == key)
            }) {
                if !ctx.edges.contains(&key) {
                    result.errors.push(err);
                }
                continue;
            }

            self.unlink_edge(key);
            ctx.edges.insert(key);
            result.edges.push(key);
        }

        tracing::debug!(
            "remove_edges: {} edges removed, {} errors",
            result.edges.len(),
            result.errors.len()
        );

        result
    }

    fn unlink_edge(&mut self, key: EdgeKey) {
        let Some((id, a, b)) = self.edge(key).map(|edge| (edge.id.clone(), edge.a, edge.b)) else {
            return;
        };

        self.edge_by_id.remove(&id);
        if let Some(node) = self.node_store.get_mut(a.0) {
            node.outgoing.retain(|e| *e != key);
        }
        if let Some(node) = self.node_store.get_mut(b.0) {
            node.incoming.retain(|e| *e != key);
        }
        if let Some(pos) = self.edges.iter().position(|e| *e == key) {
            self.edges.remove(pos);
        }
        self.unindex_adjacency(a, b, key);
    }

    /// Remove nodes and every edge touching them
    pub fn remove_nodes(&mut self, nodes: &[NodeKey]) -> RemoveNodesResult {
        self.remove_nodes_with(nodes, &mut RemoveContext::default())
    }

    /// Remove nodes within a caller-held batch context
    ///
    /// Out-edges go first, then in-edges, sharing the context so a self-loop
    /// or an edge between two removed nodes is reported once. Afterwards the
    /// removed node's own `out` / `in` lists hold the edges that were removed
    /// or failed, so the node can be inspected or re-added later.
    pub fn remove_nodes_with(
        &mut self,
        nodes: &[NodeKey],
        ctx: &mut RemoveContext,
    ) -> RemoveNodesResult {
        let mut result = RemoveNodesResult::default();

        for &key in nodes {
            let id = self.node(key).map(|node| node.id.clone());

            if let Err(err) = check_bound(ElementKey::Node(key), id.clone(), |id| {
                self.node_by_id.get(id).map(|bound| *bound == key)
            }) {
                if !ctx.nodes.contains(&key) {
                    result.errors.push(err);
                }
                continue;
            }

            let (outgoing, incoming) = match self.node(key) {
                Some(node) => (node.outgoing.clone(), node.incoming.clone()),
                None => continue,
            };

            let out_removed = self.remove_edges_with(&outgoing, ctx);
            let in_removed = self.remove_edges_with(&incoming, ctx);

            let failed: HashSet<EdgeKey> = out_removed
                .errors
                .iter()
                .chain(in_removed.errors.iter())
                .filter_map(|err| match err.element() {
                    ElementKey::Edge(e) => Some(e),
                    ElementKey::Node(_) => None,
                })
                .collect();
            let keep = |e: &EdgeKey| ctx.edges.contains(e) || failed.contains(e);
            let trace_out: Vec<EdgeKey> = outgoing.into_iter().filter(keep).collect();
            let trace_in: Vec<EdgeKey> = incoming.into_iter().filter(keep).collect();

            if let Some(id) = id {
                self.node_by_id.remove(&id);
            }
            if let Some(pos) = self.nodes.iter().position(|n| *n == key) {
                self.nodes.remove(pos);
            }
            self.adjacency.remove(&key);
            if let Some(node) = self.node_store.get_mut(key.0) {
                node.outgoing = trace_out;
                node.incoming = trace_in;
            }

            result.edges.extend(out_removed.edges);
            result.edges.extend(in_removed.edges);
            result.errors.extend(out_removed.errors);
            result.errors.extend(in_removed.errors);
            ctx.nodes.insert(key);
            result.nodes.push(key);
        }

        tracing::debug!(
            "remove_nodes: {} nodes, {} edges removed, {} errors",
            result.nodes.len(),
            result.edges.len(),
            result.errors.len()
        );

        result
    }

    /// Remove every edge that starts and ends at the same node
    pub fn remove_circular_edges(&mut self) -> RemoveEdgesResult {
        let circular: Vec<EdgeKey> = self
            .edges
            .iter()
            .copied()
            .filter(|e| self.edge(*e).map(|edge| edge.is_circular()).unwrap_or(false))
            .collect();

        self.remove_edges(&circular)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Combine
    // ─────────────────────────────────────────────────────────────────────────

    /// Merge every group of edges joining the same unordered node pair
    ///
    /// The first edge of a pair is kept tentatively; each later edge for the
    /// pair is folded into it through `reduce(previous, next)`. Both inputs
    /// are removed and the merged edge is added in their place.
    pub fn combine_shared_edges<F>(&mut self, mut reduce: F) -> CombineResult
    where
        F: FnMut(&Edge<E>, &Edge<E>) -> EdgeMerge<E>,
    {
        let mut result = CombineResult::default();
        let mut found: HashMap<(NodeKey, NodeKey), EdgeKey> = HashMap::new();
        let mut produced: HashSet<EdgeKey> = HashSet::new();
        let snapshot = self.edges.clone();

        for key in snapshot {
            if !self.is_live_edge(key) {
                continue;
            }
            let Some((a, b)) = self.edge(key).map(|edge| (edge.a, edge.b)) else {
                continue;
            };
            let pair = if a <= b { (a, b) } else { (b, a) };

            let Some(&previous) = found.get(&pair) else {
                found.insert(pair, key);
                continue;
            };

            let (merge, orientation) = match (self.edge(previous), self.edge(key)) {
                (Some(prev), Some(next)) => (reduce(prev, next), (prev.a, prev.b)),
                _ => continue,
            };

            // A merge may reuse either input's id, but no other live edge's
            let taken = self
                .edge_by_id
                .get(&merge.id)
                .is_some_and(|bound| *bound != previous && *bound != key);
            if taken {
                result.errors.push(MutationError::DuplicateId {
                    element: ElementKey::Edge(key),
                    id: merge.id,
                });
                continue;
            }

            let mut ctx = RemoveContext::default();
            let removed = self.remove_edges_with(&[previous, key], &mut ctx);
            result.errors.extend(removed.errors);
            result.removed.extend(
                removed
                    .edges
                    .into_iter()
                    .filter(|e| !produced.contains(e)),
            );

            let merged = EdgeKey(self.edge_store.insert(Edge {
                id: merge.id,
                a: orientation.0,
                b: orientation.1,
                atob: merge.atob,
                btoa: merge.btoa,
                meta: merge.meta,
            }));
            let added = self.add_edges(&[merged]);

            if added.is_ok() {
                produced.insert(merged);
                found.insert(pair, merged);
            } else {
                // Put the pair back as it was, `previous` surviving
                result.errors.extend(added.errors);
                let _ = self.edge_store.remove(merged.0);
                let restored = self.add_edges(&[previous, key]);
                result.errors.extend(restored.errors);
                result
                    .removed
                    .retain(|e| !restored.edges.contains(e));
            }
        }

        // Intermediate merges that were merged again are internal only
        for key in &produced {
            if self.is_live_edge(*key) {
                result.merged.push(*key);
            } else {
                let _ = self.edge_store.remove(key.0);
            }
        }
        result
            .merged
            .sort_by_key(|key| self.edges.iter().position(|e| e == key));

        tracing::debug!(
            "combine_shared_edges: {} merged, {} removed, {} errors",
            result.merged.len(),
            result.removed.len(),
            result.errors.len()
        );

        result
    }
}

/// Confirm an element is the live object bound to its own id
///
/// `bound_to` answers whether the id is bound, and if so whether to this key.
fn check_bound<F>(
    element: ElementKey,
    id: Option<Identifier>,
    bound_to: F,
) -> std::result::Result<(), MutationError>
where
    F: FnOnce(&Identifier) -> Option<bool>,
{
    let Some(id) = id else {
        return Err(MutationError::UnknownElement { element, id: None });
    };

    match bound_to(&id) {
        Some(true) => Ok(()),
        Some(false) => Err(MutationError::IdentityMismatch { element, id }),
        None => Err(MutationError::UnknownElement {
            element,
            id: Some(id),
        }),
    }
}

impl<N: Clone, E: Clone> NetworkIndex<N, E> {
    // ─────────────────────────────────────────────────────────────────────────
    // Clone
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy a node into a new detached object, optionally under a new id
    ///
    /// Edge references are copied as-is; list weights are copied, never shared.
    pub fn clone_node(&mut self, key: NodeKey, id: Option<Identifier>) -> Result<NodeKey> {
        let source = self
            .node(key)
            .ok_or(Error::StaleHandle(ElementKey::Node(key)))?;
        let copy = Node {
            id: id.unwrap_or_else(|| source.id.clone()),
            value: source.value.clone(),
            meta: source.meta.clone(),
            incoming: source.incoming.clone(),
            outgoing: source.outgoing.clone(),
        };

        Ok(NodeKey(self.node_store.insert(copy)))
    }

    /// Copy an edge into a new detached object, optionally under a new id
    pub fn clone_edge(&mut self, key: EdgeKey, id: Option<Identifier>) -> Result<EdgeKey> {
        let source = self
            .edge(key)
            .ok_or(Error::StaleHandle(ElementKey::Edge(key)))?;
        let copy = Edge {
            id: id.unwrap_or_else(|| source.id.clone()),
            a: source.a,
            b: source.b,
            atob: source.atob.clone(),
            btoa: source.btoa.clone(),
            meta: source.meta.clone(),
        };

        Ok(EdgeKey(self.edge_store.insert(copy)))
    }

    /// Build an independent copy of the live network
    ///
    /// Detached objects are not carried over. References in the copy are
    /// rewired by id, so nothing in the result points back into `self`.
    pub fn clone_network(&self) -> NetworkIndex<N, E> {
        let mut copy = NetworkIndex::new();

        for node in self.nodes.iter().filter_map(|key| self.node(*key)) {
            let cloned = Node::new(node.id.clone(), node.value.clone(), node.meta.clone());
            let new_key = NodeKey(copy.node_store.insert(cloned));
            copy.nodes.push(new_key);
            copy.node_by_id.insert(node.id.clone(), new_key);
        }

        for edge in self.edges.iter().filter_map(|key| self.edge(*key)) {
            let a = self.node(edge.a).and_then(|n| copy.node_by_id.get(&n.id));
            let b = self.node(edge.b).and_then(|n| copy.node_by_id.get(&n.id));
            let (Some(&a), Some(&b)) = (a, b) else {
                continue;
            };
            let cloned = Edge {
                id: edge.id.clone(),
                a,
                b,
                atob: edge.atob.clone(),
                btoa: edge.btoa.clone(),
                meta: edge.meta.clone(),
            };
            let new_key = EdgeKey(copy.edge_store.insert(cloned));
            copy.edges.push(new_key);
            copy.edge_by_id.insert(edge.id.clone(), new_key);
        }

        // Rewire edge lists to the cloned edges by id
        let remap = |list: &[EdgeKey]| -> Vec<EdgeKey> {
            list.iter()
                .filter_map(|e| self.edge(*e))
                .filter_map(|edge| copy.edge_by_id.get(&edge.id).copied())
                .collect()
        };
        let rewired: Vec<(NodeKey, Vec<EdgeKey>, Vec<EdgeKey>)> = self
            .nodes
            .iter()
            .filter_map(|key| self.node(*key))
            .filter_map(|node| {
                copy.node_by_id
                    .get(&node.id)
                    .map(|new_key| (*new_key, remap(&node.incoming), remap(&node.outgoing)))
            })
            .collect();
        for (key, incoming, outgoing) in rewired {
            if let Some(node) = copy.node_store.get_mut(key.0) {
                node.incoming = incoming;
                node.outgoing = outgoing;
            }
        }

        let entries: Vec<(NodeKey, NodeKey, EdgeKey)> = self
            .adjacency_entries()
            .filter_map(|(a, b, e)| {
                let a = copy.node_by_id.get(&self.node(a)?.id)?;
                let b = copy.node_by_id.get(&self.node(b)?.id)?;
                let e = copy.edge_by_id.get(&self.edge(e)?.id)?;
                Some((*a, *b, *e))
            })
            .collect();
        for (a, b, e) in entries {
            copy.adjacency.entry(a).or_default().insert(b, e);
        }

        tracing::debug!(
            "clone_network: {} nodes, {} edges",
            copy.node_count(),
            copy.edge_count()
        );

        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Net = NetworkIndex<&'static str, &'static str>;

    /// 1 -> 2, 2 -> 3, 1 -> 4, 4 -> 3
    fn diamond() -> (Net, Vec<NodeKey>, Vec<EdgeKey>) {
        let mut network = Net::new();
        let nodes: Vec<NodeKey> = (1..=4)
            .map(|i| network.create_node(i, i as f64, "node"))
            .collect();
        let edges = vec![
            network.create_edge(12, nodes[0], nodes[1], 1.0, 1.0, "e").unwrap(),
            network.create_edge(23, nodes[1], nodes[2], 1.0, 1.0, "e").unwrap(),
            network.create_edge(14, nodes[0], nodes[3], 1.0, 1.0, "e").unwrap(),
            network.create_edge(43, nodes[3], nodes[2], 1.0, 1.0, "e").unwrap(),
        ];
        let result = network.add_nodes(&nodes);
        assert!(result.is_ok(), "{:?}", result.errors);
        (network, nodes, edges)
    }

    #[test]
    fn test_add_nodes_links_staged_edges_in_any_order() {
        let mut network = Net::new();
        let a = network.create_node(1, 1.0, "a");
        let b = network.create_node(2, 1.0, "b");
        let e = network.create_edge(1, a, b, 1.0, 2.0, "ab").unwrap();

        // Head first: the edge still links once both are accepted
        let result = network.add_nodes(&[b, a]);

        assert!(result.is_ok());
        assert_eq!(result.nodes, vec![b, a]);
        assert_eq!(result.edges, vec![e]);
        assert_eq!(network.adjacent(a, b), Some(e));
        assert_eq!(network.node(a).unwrap().outgoing(), &[e]);
        assert_eq!(network.node(b).unwrap().incoming(), &[e]);
        assert!(network.verify().is_ok());
    }

    #[test]
    fn test_add_node_duplicate_id() {
        let (mut network, _, _) = diamond();
        let impostor = network.create_node(1, 0.0, "impostor");

        let result = network.add_nodes(&[impostor]);

        assert!(result.nodes.is_empty());
        assert_eq!(
            result.errors,
            vec![MutationError::DuplicateId {
                element: ElementKey::Node(impostor),
                id: Identifier::Num(1),
            }]
        );
        assert_eq!(network.node_count(), 4);
    }

    #[test]
    fn test_add_node_idempotent_with_context() {
        let mut network = Net::new();
        let a = network.create_node(1, 1.0, "a");
        let mut ctx = AddContext::default();

        let first = network.add_nodes_with(&[a], &mut ctx);
        let second = network.add_nodes_with(&[a], &mut ctx);

        assert_eq!(first.nodes, vec![a]);
        assert!(second.is_ok());
        assert!(second.nodes.is_empty());
        assert_eq!(network.node_count(), 1);
    }

    #[test]
    fn test_add_edge_missing_endpoint() {
        let mut network = Net::new();
        let a = network.create_node(1, 1.0, "a");
        network.add_nodes(&[a]);
        let absent = network.create_node(2, 1.0, "absent");
        let e = network.create_edge(1, a, absent, 1.0, 1.0, "e").unwrap();

        let result = network.add_edges(&[e]);

        assert!(result.edges.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0],
            MutationError::MissingEndpoint { endpoint, .. } if endpoint == absent
        ));
        assert_eq!(network.edge_count(), 0);
        assert!(network.node(a).unwrap().outgoing().is_empty());
        assert!(network.verify().is_ok());
    }

    #[test]
    fn test_add_edge_between_live_nodes() {
        let (mut network, nodes, _) = diamond();
        let e = network
            .create_edge(31, nodes[2], nodes[0], 5.0, 6.0, "back")
            .unwrap();

        let result = network.add_edges(&[e]);

        assert!(result.is_ok());
        assert_eq!(network.edge_count(), 5);
        assert_eq!(network.adjacent(nodes[2], nodes[0]), Some(e));
        assert!(network.node(nodes[2]).unwrap().outgoing().contains(&e));
        assert!(network.verify().is_ok());
    }

    #[test]
    fn test_remove_node_unlinks_all_edges() {
        let mut network = Net::new();
        let hub = network.create_node(0, 1.0, "hub");
        let x = network.create_node(1, 1.0, "x");
        let y = network.create_node(2, 1.0, "y");
        let z = network.create_node(3, 1.0, "z");
        network.create_edge(1, hub, x, 1.0, 1.0, "out").unwrap();
        network.create_edge(2, hub, y, 1.0, 1.0, "out").unwrap();
        network.create_edge(3, z, hub, 1.0, 1.0, "in").unwrap();
        network.add_nodes(&[hub, x, y, z]);
        assert_eq!(network.edge_count(), 3);

        let result = network.remove_nodes(&[hub]);

        assert!(result.is_ok());
        assert_eq!(result.nodes, vec![hub]);
        assert_eq!(result.edges.len(), 3);
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 0);
        assert!(network
            .adjacency_entries()
            .all(|(a, b, _)| a != hub && b != hub));
        // The removed node keeps a trace of what was unlinked
        assert_eq!(network.node(hub).unwrap().outgoing().len(), 2);
        assert_eq!(network.node(hub).unwrap().incoming().len(), 1);
        assert!(network.verify().is_ok());
    }

    #[test]
    fn test_removed_node_can_be_re_added() {
        let (mut network, nodes, _) = diamond();

        network.remove_nodes(&[nodes[0]]);
        assert_eq!(network.edge_count(), 2);

        let result = network.add_nodes(&[nodes[0]]);
        assert!(result.is_ok());
        assert_eq!(result.edges.len(), 2);
        assert_eq!(network.edge_count(), 4);
        assert!(network.verify().is_ok());
    }

    #[test]
    fn test_remove_identity_mismatch() {
        let (mut network, nodes, edges) = diamond();

        // A stale handle: same id, different object
        let phantom = network.clone_node(nodes[1], None).unwrap();
        let result = network.remove_nodes(&[phantom]);
        assert!(matches!(
            result.errors[..],
            [MutationError::IdentityMismatch { .. }]
        ));
        assert_eq!(network.node_count(), 4);

        let phantom_edge = network.clone_edge(edges[0], None).unwrap();
        let result = network.remove_edges(&[phantom_edge]);
        assert!(matches!(
            result.errors[..],
            [MutationError::IdentityMismatch { .. }]
        ));
        assert_eq!(network.edge_count(), 4);
    }

    #[test]
    fn test_remove_unknown_vs_already_removed() {
        let (mut network, _, edges) = diamond();
        let mut ctx = RemoveContext::default();

        let first = network.remove_edges_with(&[edges[0]], &mut ctx);
        let again = network.remove_edges_with(&[edges[0]], &mut ctx);
        let fresh = network.remove_edges(&[edges[0]]);

        assert!(first.is_ok());
        assert!(again.is_ok());
        assert!(again.edges.is_empty());
        assert!(matches!(
            fresh.errors[..],
            [MutationError::UnknownElement { .. }]
        ));
    }

    #[test]
    fn test_self_loop_reported_once() {
        let mut network = Net::new();
        let a = network.create_node(1, 1.0, "a");
        let loop_edge = network.create_edge(1, a, a, 1.0, 1.0, "loop").unwrap();
        network.add_nodes(&[a]);
        assert_eq!(network.node(a).unwrap().outgoing(), &[loop_edge]);
        assert_eq!(network.node(a).unwrap().incoming(), &[loop_edge]);

        let result = network.remove_nodes(&[a]);

        assert!(result.is_ok());
        assert_eq!(result.edges, vec![loop_edge]);
        assert_eq!(network.node(a).unwrap().incoming(), &[loop_edge]);
        assert!(network.verify().is_ok());
    }

    #[test]
    fn test_duplicate_edges_keep_adjacency_consistent() {
        let (mut network, nodes, edges) = diamond();
        let dup = network
            .create_edge(99, nodes[0], nodes[1], 2.0, 2.0, "dup")
            .unwrap();
        network.add_edges(&[dup]);
        assert_eq!(network.adjacent(nodes[0], nodes[1]), Some(edges[0]));

        network.remove_edges(&[edges[0]]);

        // The survivor takes over the pair's entry
        assert_eq!(network.adjacent(nodes[0], nodes[1]), Some(dup));
        assert!(network.verify().is_ok());
    }

    #[test]
    fn test_clone_node_copies_list_weight() {
        let mut network = Net::new();
        let a = network.create_node(1, vec![1.0, 2.0], "a");

        let b = network.clone_node(a, Some(Identifier::from(2))).unwrap();
        if let Some(Weight::Multi(values)) = network.node_mut(b).map(|n| &mut n.value) {
            values[0] = 10.0;
        }

        assert_eq!(network.node(a).unwrap().value.as_slice(), &[1.0, 2.0]);
        assert_eq!(network.node(b).unwrap().value.as_slice(), &[10.0, 2.0]);
        assert_eq!(network.node(b).unwrap().id(), &Identifier::Num(2));
        assert_eq!(network.node(b).unwrap().meta, "a");
    }

    #[test]
    fn test_clone_network_isolated() {
        let (source, nodes, _) = diamond();
        let mut copy = source.clone_network();

        assert_eq!(copy.node_count(), source.node_count());
        assert_eq!(copy.edge_count(), source.edge_count());
        assert!(copy.verify().is_ok());

        let copy_a = copy.node_by_id(&Identifier::Num(1)).unwrap();
        let copy_b = copy.node_by_id(&Identifier::Num(2)).unwrap();
        assert!(copy.get_edge(copy_a, copy_b).is_some());

        copy.remove_nodes(&[copy_a]);
        if let Some(node) = copy.node_mut(copy_b) {
            node.value = Weight::Single(-1.0);
        }

        assert_eq!(source.node_count(), 4);
        assert_eq!(source.edge_count(), 4);
        assert_eq!(source.node(nodes[1]).unwrap().value, Weight::Single(2.0));
        assert!(source.verify().is_ok());
        assert!(copy.verify().is_ok());
    }

    #[test]
    fn test_combine_shared_edges() {
        let mut network = Net::new();
        let a = network.create_node(1, 1.0, "a");
        let b = network.create_node(2, 1.0, "b");
        let c = network.create_node(3, 1.0, "c");
        network.create_edge(1, a, b, 1.0, 0.0, "ab").unwrap();
        network.create_edge(2, b, a, 2.0, 0.0, "ba").unwrap();
        network.create_edge(3, a, b, 4.0, 0.0, "ab2").unwrap();
        let bc = network.create_edge(4, b, c, 1.0, 0.0, "bc").unwrap();
        network.add_nodes(&[a, b, c]);
        assert_eq!(network.edge_count(), 4);

        let result = network.combine_shared_edges(|prev, next| EdgeMerge {
            id: prev.id().clone(),
            atob: Weight::Single(prev.atob.as_slice()[0] + next.atob.as_slice()[0]),
            btoa: prev.btoa.clone(),
            meta: "merged",
        });

        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(result.merged.len(), 1);
        assert_eq!(result.removed.len(), 3);
        assert_eq!(network.edge_count(), 2);
        assert!(network.is_live_edge(bc));

        let merged = network.edge(result.merged[0]).unwrap();
        assert_eq!(merged.a(), a);
        assert_eq!(merged.b(), b);
        assert_eq!(merged.atob, Weight::Single(7.0));
        assert_eq!(merged.meta, "merged");
        assert!(network.get_edge(b, a).is_some());
        assert!(network.verify().is_ok());
    }

    #[test]
    fn test_combine_keeps_pair_when_merged_id_is_taken() {
        let mut network = Net::new();
        let a = network.create_node(1, 1.0, "a");
        let b = network.create_node(2, 1.0, "b");
        let c = network.create_node(3, 1.0, "c");
        let ab = network.create_edge(1, a, b, 1.0, 0.0, "ab").unwrap();
        let ab2 = network.create_edge(2, a, b, 2.0, 0.0, "ab2").unwrap();
        let bc = network.create_edge(3, b, c, 1.0, 0.0, "bc").unwrap();
        network.add_nodes(&[a, b, c]);
        let stored = network.stored_counts();

        // Id 3 belongs to b -> c
        let result = network.combine_shared_edges(|_, next| EdgeMerge {
            id: Identifier::from(3),
            atob: next.atob.clone(),
            btoa: next.btoa.clone(),
            meta: "merged",
        });

        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0],
            MutationError::DuplicateId { element: ElementKey::Edge(e), .. } if e == ab2
        ));
        assert!(result.merged.is_empty());
        assert!(result.removed.is_empty());
        assert_eq!(network.edges(), &[ab, ab2, bc]);
        assert!(network.get_edge(a, b).is_some());
        assert_eq!(network.stored_counts(), stored);
        assert!(network.verify().is_ok());
    }

    #[test]
    fn test_remove_circular_edges() {
        let mut network = Net::new();
        let a = network.create_node(1, 1.0, "a");
        let b = network.create_node(2, 1.0, "b");
        network.create_edge(1, a, a, 1.0, 1.0, "loop").unwrap();
        let ab = network.create_edge(2, a, b, 1.0, 1.0, "ab").unwrap();
        network.add_nodes(&[a, b]);

        let result = network.remove_circular_edges();

        assert_eq!(result.edges.len(), 1);
        assert_eq!(network.edges(), &[ab]);
        assert!(!network.has_circular_edge(a));
        assert!(network.verify().is_ok());
    }
}
