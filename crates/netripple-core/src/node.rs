//! Node (vertex) types

use crate::arena::RawKey;
use crate::edge::EdgeKey;
use crate::identifier::Identifier;
use crate::weight::Weight;

/// Handle to a node object inside a [`crate::NetworkIndex`]
///
/// The handle is the node's identity. Two node objects may carry the same
/// [`Identifier`] over time, but never the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub(crate) RawKey);

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}v{}", self.0.index, self.0.generation)
    }
}

/// A vertex in the network
///
/// Structure (`id`, incoming and outgoing edges) is owned by the mutation
/// operators; `value` and `meta` may be changed in place by callers.
#[derive(Debug, Clone)]
pub struct Node<N> {
    pub(crate) id: Identifier,
    /// The values this node harbors
    pub value: Weight,
    /// Opaque caller data
    pub meta: N,
    /// Edges where `edge.b` is this node
    pub(crate) incoming: Vec<EdgeKey>,
    /// Edges where `edge.a` is this node
    pub(crate) outgoing: Vec<EdgeKey>,
}

impl<N> Node<N> {
    pub(crate) fn new(id: Identifier, value: Weight, meta: N) -> Self {
        Self {
            id,
            value,
            meta,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn incoming(&self) -> &[EdgeKey] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[EdgeKey] {
        &self.outgoing
    }

    /// Count of edge references, a self-loop counting twice
    pub fn degree(&self) -> usize {
        self.incoming.len() + self.outgoing.len()
    }
}
