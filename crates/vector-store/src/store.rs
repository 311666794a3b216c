use crate::error::{Result, VectorStoreError};
use crate::types::{Chunk, ChunkId};
use std::sync::{Arc, PoisonError, RwLock};

/// Append-only, thread-safe owner of all chunks and their embeddings.
///
/// Ids are assigned under the write lock, so they form a gap-free sequence in
/// insertion order no matter how many threads append at once. Chunks are
/// published as whole `Arc<Chunk>` values and never mutated afterwards.
#[derive(Debug, Default)]
pub struct VectorStore {
    state: RwLock<StoreState>,
    configured_dimension: Option<usize>,
}

#[derive(Debug, Default)]
struct StoreState {
    chunks: Vec<Arc<Chunk>>,
    dimension: Option<usize>,
    generation: u64,
}

/// Immutable view of the store at one point in time.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    chunks: Vec<Arc<Chunk>>,
    dimension: Option<usize>,
    generation: u64,
}

impl StoreSnapshot {
    #[must_use]
    pub fn chunks(&self) -> &[Arc<Chunk>] {
        &self.chunks
    }

    /// Chunk ids equal their position, so lookup is a plain index.
    #[must_use]
    pub fn get(&self, id: ChunkId) -> Option<&Arc<Chunk>> {
        self.chunks.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[must_use]
    pub const fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Changes on every append and clear of the originating store.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

impl VectorStore {
    /// Create an empty store whose dimension is fixed by the first append.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that only accepts `dimension`-length embeddings.
    pub fn with_dimension(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(VectorStoreError::InvalidEmbedding(
                "dimension must be >= 1".to_string(),
            ));
        }
        log::debug!("Initializing VectorStore with dimension {dimension}");
        Ok(Self {
            state: RwLock::new(StoreState {
                dimension: Some(dimension),
                ..StoreState::default()
            }),
            configured_dimension: Some(dimension),
        })
    }

    /// Store a new chunk and return its id.
    pub fn append(&self, text: impl Into<String>, embedding: Vec<f32>) -> Result<ChunkId> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(VectorStoreError::EmptyText);
        }
        validate_embedding(&embedding)?;

        let mut state = self.write_state();
        if let Some(expected) = state.dimension {
            if embedding.len() != expected {
                return Err(VectorStoreError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        } else {
            log::debug!("VectorStore dimension established at {}", embedding.len());
            state.dimension = Some(embedding.len());
        }

        let id = state.chunks.len();
        state.chunks.push(Arc::new(Chunk {
            id,
            text,
            embedding,
        }));
        state.generation += 1;
        Ok(id)
    }

    pub fn get(&self, id: ChunkId) -> Result<Arc<Chunk>> {
        self.read_state()
            .chunks
            .get(id)
            .cloned()
            .ok_or(VectorStoreError::NotFound(id))
    }

    /// Current chunk count.
    #[must_use]
    pub fn size(&self) -> usize {
        self.read_state().chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Established embedding dimension, if any.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.read_state().dimension
    }

    /// Drop every chunk. A configured dimension survives; an inferred one does not.
    pub fn clear(&self) {
        let mut state = self.write_state();
        let removed = state.chunks.len();
        state.chunks.clear();
        state.dimension = self.configured_dimension;
        state.generation += 1;
        log::debug!("Cleared VectorStore ({removed} chunks removed)");
    }

    /// Copy the current chunk handles out under a short read lock.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.read_state();
        StoreSnapshot {
            chunks: state.chunks.clone(),
            dimension: state.dimension,
            generation: state.generation,
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_embedding(embedding: &[f32]) -> Result<()> {
    if embedding.is_empty() {
        return Err(VectorStoreError::InvalidEmbedding(
            "embedding has no components".to_string(),
        ));
    }
    if let Some(position) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(VectorStoreError::InvalidEmbedding(format!(
            "component {position} is not finite"
        )));
    }
    Ok(())
}
