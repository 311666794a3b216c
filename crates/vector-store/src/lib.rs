//! # RAG Vector Store
//!
//! In-memory chunk storage and exact nearest-neighbor search for retrieval.
//!
//! ## Features
//!
//! - **Append-only store** with gap-free ids assigned in insertion order
//! - **Copy-on-read snapshots** so searches never see a half-written chunk
//! - **Flat exact index** (cosine or squared Euclidean) built per snapshot
//! - **Pluggable embedders** behind the [`Embedder`] trait
//!
//! ## Architecture
//!
//! ```text
//! (text, embedding)
//!     │
//!     ├──> VectorStore::append
//!     │      └─> Arc<Chunk> { id, text, embedding }
//!     │
//!     ├──> VectorStore::snapshot
//!     │      └─> StoreSnapshot (immutable, generation-tagged)
//!     │
//!     └──> IndexBuilder::build(snapshot)
//!            └─> FlatIndex::search(query, k) → Neighbor[]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rag_vector_store::{IndexBuilder, VectorStore};
//!
//! let store = VectorStore::new();
//! store.append("cats are mammals", vec![1.0, 0.0]).unwrap();
//! store.append("the stock market fell today", vec![0.0, 1.0]).unwrap();
//!
//! let index = IndexBuilder::default().build(&store.snapshot()).unwrap();
//! let nearest = index.search(&[0.9, 0.1], 1).unwrap();
//! assert_eq!(nearest[0].id, 0);
//! ```

mod embeddings;
mod error;
mod index;
mod store;
mod types;

pub use embeddings::{Embedder, HashingEmbedder};
pub use error::{Result, VectorStoreError};
pub use index::{DistanceMetric, FlatIndex, IndexBuilder};
pub use store::{StoreSnapshot, VectorStore};
pub use types::{Chunk, ChunkId, Neighbor};
