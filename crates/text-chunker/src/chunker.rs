use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::types::TextChunk;

/// Main chunker interface for splitting document text
#[derive(Debug, Clone, Default)]
pub struct TextChunker {
    config: ChunkerConfig,
}

impl TextChunker {
    /// Create a new chunker, rejecting invalid configuration
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split text into overlapping word windows.
    ///
    /// The last window may be shorter than `chunk_size`; no window starts
    /// after the one that reaches the final word.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let size = self.config.chunk_size;
        let stride = self.config.stride();
        let mut chunks = Vec::with_capacity(words.len().div_ceil(stride));
        let mut start = 0;

        loop {
            let end = (start + size).min(words.len());
            chunks.push(TextChunk::new(
                chunks.len(),
                start,
                end,
                words[start..end].join(" "),
            ));

            if end >= words.len() {
                break;
            }
            start += stride;
        }

        log::debug!(
            "Chunked {} words into {} chunks (size={}, overlap={})",
            words.len(),
            chunks.len(),
            size,
            self.config.overlap
        );
        chunks
    }
}
