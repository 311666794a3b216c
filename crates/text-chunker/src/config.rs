use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for word-window chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkerConfig {
    /// Number of words per chunk
    pub chunk_size: usize,

    /// Number of words shared by consecutive chunks
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            overlap: 50,
        }
    }
}

impl ChunkerConfig {
    #[must_use]
    pub const fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Create config without overlap (disjoint windows)
    #[must_use]
    pub const fn disjoint(chunk_size: usize) -> Self {
        Self::new(chunk_size, 0)
    }

    /// Number of words the window advances between chunks
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.chunk_size.saturating_sub(self.overlap)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkerError::invalid_config("chunk_size must be > 0"));
        }

        if self.overlap >= self.chunk_size {
            return Err(ChunkerError::invalid_config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }

        Ok(())
    }
}
