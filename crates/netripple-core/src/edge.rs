//! Edge types

use crate::arena::RawKey;
use crate::identifier::Identifier;
use crate::node::NodeKey;
use crate::weight::Weight;

/// Handle to an edge object inside a [`crate::NetworkIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub(crate) RawKey);

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "edge#{}v{}", self.0.index, self.0.generation)
    }
}

/// A directed connection from node `a` (tail) to node `b` (head)
///
/// Each direction carries its own weight. Endpoints are fixed at creation.
#[derive(Debug, Clone)]
pub struct Edge<E> {
    pub(crate) id: Identifier,
    pub(crate) a: NodeKey,
    pub(crate) b: NodeKey,
    /// The value flowing from `a` to `b`
    pub atob: Weight,
    /// The value flowing from `b` to `a`
    pub btoa: Weight,
    /// Opaque caller data
    pub meta: E,
}

impl<E> Edge<E> {
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Tail node
    pub fn a(&self) -> NodeKey {
        self.a
    }

    /// Head node
    pub fn b(&self) -> NodeKey {
        self.b
    }

    /// True for a self-loop
    pub fn is_circular(&self) -> bool {
        self.a == self.b
    }

    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint
    pub fn other(&self, node: NodeKey) -> Option<NodeKey> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }

    /// True when the edge joins `x` and `y` in either direction
    pub fn connects(&self, x: NodeKey, y: NodeKey) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}
