use serde::{Deserialize, Serialize};

/// Identifier assigned by [`crate::VectorStore`] in insertion order, starting at 0.
pub type ChunkId = usize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// One hit from [`crate::FlatIndex::search`]; smaller distance is closer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: ChunkId,
    pub distance: f32,
}
