use crate::retriever::RetrievedChunk;

/// Joins retrieved chunk texts into a single context block.
pub struct ContextMerger;

impl ContextMerger {
    pub const SEPARATOR: &'static str = "\n\n";

    /// Concatenate in the given order, separated by a blank line.
    ///
    /// No trimming or deduplication; an empty input gives an empty string.
    #[must_use]
    pub fn merge<S: AsRef<str>>(texts: &[S]) -> String {
        let mut merged = String::with_capacity(
            texts.iter().map(|t| t.as_ref().len()).sum::<usize>()
                + Self::SEPARATOR.len() * texts.len().saturating_sub(1),
        );
        for (i, text) in texts.iter().enumerate() {
            if i > 0 {
                merged.push_str(Self::SEPARATOR);
            }
            merged.push_str(text.as_ref());
        }
        merged
    }

    /// Merge the texts of ranked results, keeping rank order.
    #[must_use]
    pub fn merge_results(results: &[RetrievedChunk]) -> String {
        let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
        Self::merge(&texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_joins_with_blank_line() {
        assert_eq!(ContextMerger::merge(&["a", "b", "c"]), "a\n\nb\n\nc");
    }

    #[test]
    fn merge_empty_and_single() {
        let none: [&str; 0] = [];
        assert_eq!(ContextMerger::merge(&none), "");
        assert_eq!(ContextMerger::merge(&["only"]), "only");
    }

    #[test]
    fn merge_preserves_text_verbatim() {
        let texts = vec!["  padded  ".to_string(), "dup".to_string(), "dup".to_string()];
        assert_eq!(ContextMerger::merge(&texts), "  padded  \n\ndup\n\ndup");
    }

    #[test]
    fn merge_results_keeps_rank_order() {
        let hit = |id, text: &str| RetrievedChunk {
            id,
            text: text.to_string(),
            score: 0.0,
            semantic: 0.0,
            lexical: 0.0,
        };
        let results = vec![hit(2, "second stored"), hit(0, "first stored")];
        assert_eq!(
            ContextMerger::merge_results(&results),
            "second stored\n\nfirst stored"
        );
    }
}
