//! Netripple Core - Network data model and mutation operators
//!
//! This crate provides the directed multigraph container, its node and edge
//! objects, and the operators that mutate it while keeping every index
//! consistent with the live set.

mod arena;
pub mod edge;
pub mod error;
pub mod identifier;
pub mod mutate;
pub mod network;
pub mod node;
pub mod weight;

pub use edge::{Edge, EdgeKey};
pub use error::{ElementKey, Error, MutationError, Result};
pub use identifier::Identifier;
pub use mutate::{
    AddContext, AddEdgesResult, AddNodesResult, CombineResult, EdgeMerge, RemoveContext,
    RemoveEdgesResult, RemoveNodesResult,
};
pub use network::NetworkIndex;
pub use node::{Node, NodeKey};
pub use weight::Weight;
