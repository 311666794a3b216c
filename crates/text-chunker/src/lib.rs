//! # RAG Text Chunker
//!
//! Word-window chunking of extracted document text for embedding and retrieval.
//!
//! ## Architecture
//!
//! ```text
//! Document text
//!     │
//!     ├──> Whitespace tokenization → words
//!     │
//!     └──> Sliding window
//!          ├─> chunk_size words per chunk
//!          ├─> advance by chunk_size - overlap
//!          └─> Emit TextChunk[] (ordinal + word range)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rag_text_chunker::{ChunkerConfig, TextChunker};
//!
//! let chunker = TextChunker::new(ChunkerConfig::new(4, 1)).unwrap();
//! let chunks = chunker.chunk("one two three four five six seven");
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].content, "one two three four");
//! assert_eq!(chunks[1].content, "four five six seven");
//! ```

mod chunker;
mod config;
mod error;
mod types;

pub use chunker::TextChunker;
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use types::TextChunk;
