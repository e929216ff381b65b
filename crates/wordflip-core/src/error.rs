//! Error types for the cycling state machine.

use thiserror::Error;

/// Result type for cycler operations.
pub type Result<T> = std::result::Result<T, CycleError>;

/// Errors reported by [`crate::WordCycler`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    /// A signal referenced a word index outside the container.
    #[error("word index {index} out of range for container with {len} words")]
    UnknownWord { index: usize, len: usize },
}
