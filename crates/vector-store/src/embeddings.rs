use crate::error::{Result, VectorStoreError};

/// Text → fixed-dimension vector capability supplied by the caller.
///
/// Implementations may be slow or fail (remote providers); the retrieval core
/// never calls them itself and never retries.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;

    fn model_id(&self) -> &str {
        "unknown"
    }
}

/// Deterministic, offline feature-hashing embedder.
///
/// Each case-folded whitespace token is hashed to a signed bucket; the summed
/// vector is L2-normalized. Texts sharing words land close together, which is
/// enough for tests and the CLI without a model download.
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMENSION: usize = 256;

    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(VectorStoreError::EmbeddingError(
                "embedding dimension must be > 0".to_string(),
            ));
        }
        Ok(Self { dimension })
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimension: Self::DEFAULT_DIMENSION,
        }
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vec = vec![0.0f32; self.dimension];
        let mut tokens = 0usize;

        for token in text.split_whitespace() {
            let token = token.to_lowercase();
            let mut state = fnv1a_64(token.as_bytes());
            let bucket = (splitmix64(&mut state) % self.dimension as u64) as usize;
            let sign = if splitmix64(&mut state) & 1 == 0 {
                1.0
            } else {
                -1.0
            };
            vec[bucket] += sign;
            tokens += 1;
        }

        if tokens == 0 {
            return Err(VectorStoreError::EmbeddingError(
                "cannot embed text without tokens".to_string(),
            ));
        }

        normalize(&mut vec);
        Ok(vec)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        "hashing"
    }
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
