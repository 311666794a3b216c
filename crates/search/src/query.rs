/// How a query should be handled before retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Small talk that needs no retrieved context
    Trivial,
    /// Anything that should go through search
    Knowledge,
}

pub trait QueryClassifier: Send + Sync {
    fn classify(&self, query: &str) -> QueryKind;
}

/// Treats greetings as trivial.
///
/// A query is trivial when its normalized form starts with one of the known
/// greetings as whole words: `"hi there"` is trivial, `"history of rome"` is not.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreetingClassifier;

const GREETINGS: &[&[&str]] = &[
    &["hello"],
    &["hi"],
    &["hey"],
    &["good", "morning"],
    &["good", "evening"],
];

impl QueryClassifier for GreetingClassifier {
    fn classify(&self, query: &str) -> QueryKind {
        let normalized = normalize_query(query);
        let words: Vec<&str> = normalized.split_whitespace().collect();
        let is_greeting = GREETINGS.iter().any(|greeting| words.starts_with(greeting));
        if is_greeting {
            QueryKind::Trivial
        } else {
            QueryKind::Knowledge
        }
    }
}

/// Never short-circuits; every query is searched.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysKnowledge;

impl QueryClassifier for AlwaysKnowledge {
    fn classify(&self, _query: &str) -> QueryKind {
        QueryKind::Knowledge
    }
}

/// Drop punctuation and symbols, lowercase, trim.
///
/// Alphanumeric characters, `_` and whitespace survive; combining marks are dropped.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    let kept: String = query
        .chars()
        .filter(|&c| is_word_char(c) || c.is_whitespace())
        .collect();
    kept.to_lowercase().trim().to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
