//! Fused relevance scoring: cosine similarity blended with lexical overlap.

use serde::Serialize;
use std::collections::HashSet;

/// Case-folded whitespace tokens of a query, kept as a set for overlap lookups.
#[derive(Debug, Clone, Default)]
pub struct QueryTerms {
    terms: HashSet<String>,
}

impl QueryTerms {
    #[must_use]
    pub fn new(query_text: &str) -> Self {
        Self {
            terms: tokenize(query_text).collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Fraction of the chunk's tokens found in this query; 0 for a tokenless chunk.
    #[must_use]
    pub fn overlap(&self, chunk_text: &str) -> f32 {
        if self.is_empty() {
            return 0.0;
        }

        let mut total = 0usize;
        let mut hits = 0usize;
        for token in tokenize(chunk_text) {
            total += 1;
            if self.terms.contains(&token) {
                hits += 1;
            }
        }
        if total == 0 {
            return 0.0;
        }
        hits as f32 / total as f32
    }
}

/// Per-candidate scoring breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreParts {
    pub semantic: f32,
    pub lexical: f32,
    pub fused: f32,
}

/// Scores candidates against one query with a fixed blend weight.
#[derive(Debug, Clone)]
pub struct Scorer<'q> {
    query_embedding: &'q [f32],
    query_terms: QueryTerms,
    alpha: f32,
}

impl<'q> Scorer<'q> {
    #[must_use]
    pub fn new(query_text: &str, query_embedding: &'q [f32], alpha: f32) -> Self {
        Self {
            query_embedding,
            query_terms: QueryTerms::new(query_text),
            alpha,
        }
    }

    #[must_use]
    pub fn score(&self, chunk_text: &str, chunk_embedding: &[f32]) -> ScoreParts {
        let semantic = semantic_similarity(self.query_embedding, chunk_embedding);
        let lexical = self.query_terms.overlap(chunk_text);
        ScoreParts {
            semantic,
            lexical,
            fused: fuse(semantic, lexical, self.alpha),
        }
    }
}

/// Cosine similarity in `[-1, 1]`.
///
/// Returns exactly `0.0` when either vector has zero norm or the lengths differ.
#[must_use]
pub fn semantic_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Share of `chunk_text` tokens that also occur in `query_text`.
///
/// Normalized by chunk length, so short focused chunks beat long ones that
/// mention a query word in passing.
#[must_use]
pub fn lexical_overlap(chunk_text: &str, query_text: &str) -> f32 {
    QueryTerms::new(query_text).overlap(chunk_text)
}

#[must_use]
pub fn fuse(semantic: f32, lexical: f32, alpha: f32) -> f32 {
    alpha * semantic + (1.0 - alpha) * lexical
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((semantic_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_and_opposite() {
        assert!(semantic_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((semantic_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_norm_is_exactly_zero() {
        assert_eq!(semantic_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(semantic_similarity(&[1.0, 0.0], &[0.0, 0.0]), 0.0);
        assert_eq!(semantic_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
        assert_eq!(semantic_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_length_mismatch_is_zero() {
        assert_eq!(semantic_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_lexical_overlap_normalized_by_chunk_length() {
        let score = lexical_overlap("cats are mammals", "tell me about cats");
        assert!((score - 1.0 / 3.0).abs() < 1e-6);

        let long = lexical_overlap(
            "cats appear once in this much longer passage of text",
            "tell me about cats",
        );
        assert!(long < score);
    }

    #[test]
    fn test_lexical_overlap_is_case_folded_and_counts_repeats() {
        assert_eq!(lexical_overlap("CATS Cats cats", "cats"), 1.0);
        assert!((lexical_overlap("cats dogs cats dogs", "Cats") - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_lexical_overlap_edge_cases() {
        assert_eq!(lexical_overlap("", "anything"), 0.0);
        assert_eq!(lexical_overlap("   ", "anything"), 0.0);
        assert_eq!(lexical_overlap("some words", ""), 0.0);
    }

    #[test]
    fn test_query_terms_dedupe_and_case_fold() {
        let terms = QueryTerms::new("Cats cats CATS");
        assert!(!terms.is_empty());
        assert_eq!(terms.overlap("cats nap"), 0.5);
        assert!(QueryTerms::new("  ").is_empty());
        assert_eq!(QueryTerms::new("").overlap("cats nap"), 0.0);
    }

    #[test]
    fn test_fuse_blend() {
        assert!((fuse(1.0, 0.0, 0.7) - 0.7).abs() < 1e-6);
        assert!((fuse(0.0, 1.0, 0.7) - 0.3).abs() < 1e-6);
        assert_eq!(fuse(0.4, 0.9, 1.0), 0.4);
        assert_eq!(fuse(0.4, 0.9, 0.0), 0.9);
    }

    #[test]
    fn test_scorer_matches_free_functions() {
        let query_embedding = [1.0, 0.0];
        let scorer = Scorer::new("tell me about cats", &query_embedding, 0.7);
        let parts = scorer.score("cats are mammals", &[1.0, 0.0]);

        assert!((parts.semantic - 1.0).abs() < 1e-6);
        assert!((parts.lexical - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(parts.fused, fuse(parts.semantic, parts.lexical, 0.7));
    }
}
