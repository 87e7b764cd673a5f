//! Error types for Netripple Core

use crate::edge::EdgeKey;
use crate::identifier::Identifier;
use crate::node::NodeKey;
use thiserror::Error;

/// Result type alias using Netripple's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Either kind of network element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKey {
    Node(NodeKey),
    Edge(EdgeKey),
}

impl std::fmt::Display for ElementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node(key) => write!(f, "{}", key),
            Self::Edge(key) => write!(f, "{}", key),
        }
    }
}

impl From<NodeKey> for ElementKey {
    fn from(key: NodeKey) -> Self {
        Self::Node(key)
    }
}

impl From<EdgeKey> for ElementKey {
    fn from(key: EdgeKey) -> Self {
        Self::Edge(key)
    }
}

/// A conflict found while applying one element of a batch mutation
///
/// These are returned as data inside mutation results, never raised, so a
/// caller can run many mutations and inspect every failure afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Duplicate id {id}: {element} conflicts with a different live object")]
    DuplicateId { element: ElementKey, id: Identifier },

    #[error("Missing endpoint: edge {edge} ({id}) references {endpoint}, which is not in the network")]
    MissingEndpoint {
        edge: EdgeKey,
        id: Identifier,
        endpoint: NodeKey,
    },

    #[error("Identity mismatch: id {id} belongs to a different object than {element}")]
    IdentityMismatch { element: ElementKey, id: Identifier },

    #[error("Unknown element: {element} is not in the network")]
    UnknownElement {
        element: ElementKey,
        id: Option<Identifier>,
    },
}

impl MutationError {
    /// The element the conflict was reported for
    pub fn element(&self) -> ElementKey {
        match self {
            Self::DuplicateId { element, .. }
            | Self::IdentityMismatch { element, .. }
            | Self::UnknownElement { element, .. } => *element,
            Self::MissingEndpoint { edge, .. } => ElementKey::Edge(*edge),
        }
    }
}

/// Netripple core error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Stale handle: {0}")]
    StaleHandle(ElementKey),

    #[error("Node is live in the network: {0}")]
    NodeLive(NodeKey),

    #[error("Edge is live in the network: {0}")]
    EdgeLive(EdgeKey),

    #[error("Validation error: {0}")]
    Validation(String),
}
