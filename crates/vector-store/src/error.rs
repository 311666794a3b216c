use crate::types::ChunkId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorStoreError {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Refusing to store a chunk with empty text")]
    EmptyText,

    /// Empty vector, zero dimension, or a NaN/infinite component.
    #[error("Invalid embedding: {0}")]
    InvalidEmbedding(String),

    #[error("Chunk not found: {0}")]
    NotFound(ChunkId),

    #[error("Cannot build an index over an empty store")]
    EmptyIndex,

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),
}
