//! Collection error types
//!
//! Error types for stream collection operations.

use crate::stream::StreamType;

/// Error type for collection operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// No top-level stream with this id
    StreamNotFound(String),
    /// Variant type differs from its parent's type
    TypeMismatch {
        /// Id of the parent stream
        stream_id: String,
        /// Type of the parent stream
        expected: StreamType,
        /// Type of the rejected variant
        actual: StreamType,
    },
}

impl std::fmt::Display for CollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionError::StreamNotFound(id) => {
                write!(f, "Collection doesn't contain the stream: {}", id)
            }
            CollectionError::TypeMismatch {
                stream_id,
                expected,
                actual,
            } => write!(
                f,
                "Variant of {} must be {}, got {}",
                stream_id, expected, actual
            ),
        }
    }
}

impl std::error::Error for CollectionError {}
