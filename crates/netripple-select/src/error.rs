//! Error types for Netripple Select

use netripple_core::NodeKey;
use thiserror::Error;

use crate::limits::ValidationError;

/// Result type alias for selection entry points
pub type SelectResult<T> = std::result::Result<T, SelectError>;

/// Selection error types
///
/// Only input that cannot start a traversal is reported here. Problems found
/// while a traversal runs are logged and the affected branch is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectError {
    #[error("Node is not in the network: {0}")]
    NodeNotFound(NodeKey),

    #[error("Invalid splash options: {0}")]
    Validation(#[from] ValidationError),
}
