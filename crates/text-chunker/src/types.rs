use serde::{Deserialize, Serialize};

/// A window of consecutive words taken from a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextChunk {
    /// Position of this chunk within the document (0-indexed)
    pub ordinal: usize,

    /// Index of the first word (0-indexed)
    pub start_word: usize,

    /// Index one past the last word
    pub end_word: usize,

    /// Words of the window joined by single spaces
    pub content: String,
}

impl TextChunk {
    #[must_use]
    pub const fn new(ordinal: usize, start_word: usize, end_word: usize, content: String) -> Self {
        Self {
            ordinal,
            start_word,
            end_word,
            content,
        }
    }

    /// Get the number of words in this chunk
    #[must_use]
    pub const fn word_count(&self) -> usize {
        self.end_word.saturating_sub(self.start_word)
    }

    /// Check if chunk covers a specific word index
    #[must_use]
    pub const fn contains_word(&self, word: usize) -> bool {
        word >= self.start_word && word < self.end_word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_word_count() {
        let chunk = TextChunk::new(0, 10, 15, "a b c d e".to_string());
        assert_eq!(chunk.word_count(), 5);
    }

    #[test]
    fn test_chunk_contains_word() {
        let chunk = TextChunk::new(1, 10, 15, "a b c d e".to_string());
        assert!(chunk.contains_word(10));
        assert!(chunk.contains_word(14));
        assert!(!chunk.contains_word(9));
        assert!(!chunk.contains_word(15));
    }
}
