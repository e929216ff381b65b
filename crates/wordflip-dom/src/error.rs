//! Error types for document hosting.

use ego_tree::NodeId;
use thiserror::Error;
use wordflip_core::CycleError;

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Node id does not belong to this document.
    #[error("node {0:?} not found in document")]
    MissingNode(NodeId),

    /// Operation needs an element but the node is text, a comment, etc.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    /// Container index out of range for the stage.
    #[error("container {index} out of range ({len} containers)")]
    UnknownContainer { index: usize, len: usize },

    #[error(transparent)]
    Cycle(#[from] CycleError),
}
