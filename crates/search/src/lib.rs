//! # RAG Search
//!
//! Hybrid retrieval over a [`rag_vector_store::VectorStore`]: a coarse vector
//! stage followed by re-ranking on a blend of cosine similarity and keyword
//! overlap.
//!
//! ## Architecture
//!
//! ```text
//! query ──> QueryClassifier ──(trivial)──> ContextOutcome::Trivial
//!   │
//!   └─> normalize_query ─> Embedder::embed
//!            │
//!            └─> Retriever::search
//!                  ├─ FlatIndex::search(candidate_k)   coarse
//!                  ├─ Scorer::score                    fine
//!                  └─ sort by fused score, id; take final_k
//!                        │
//!                        └─> ContextMerger::merge_results
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rag_search::{RetrievalConfig, Retriever};
//! use rag_vector_store::VectorStore;
//!
//! let store = Arc::new(VectorStore::new());
//! store.append("cats are mammals", vec![1.0, 0.0]).unwrap();
//! store.append("the stock market fell today", vec![0.0, 1.0]).unwrap();
//!
//! let retriever = Retriever::new(store);
//! let hits = retriever
//!     .search("tell me about cats", Some(&[1.0, 0.0]), &RetrievalConfig::default())
//!     .unwrap();
//! assert_eq!(hits[0].text, "cats are mammals");
//! ```

mod config;
mod error;
mod merge;
mod pipeline;
mod query;
mod retriever;
mod scorer;

pub use config::RetrievalConfig;
pub use error::{Result, SearchError};
pub use merge::ContextMerger;
pub use pipeline::{ContextOutcome, IngestReport, RagPipeline, SearchStrategy};
pub use query::{normalize_query, AlwaysKnowledge, GreetingClassifier, QueryClassifier, QueryKind};
pub use retriever::{RetrievedChunk, Retriever};
pub use scorer::{fuse, lexical_overlap, semantic_similarity, QueryTerms, ScoreParts, Scorer};
