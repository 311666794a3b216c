use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Vector store error: {0}")]
    VectorStore(#[from] rag_vector_store::VectorStoreError),

    #[error("Chunker error: {0}")]
    Chunker(#[from] rag_text_chunker::ChunkerError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The query could not be embedded, so no search was attempted.
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),
}

impl SearchError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
