use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};

/// Retrieval tuning parameters.
///
/// `candidate_k` bounds the coarse vector stage, `final_k` the number of
/// re-ranked results returned, and `alpha` weighs semantic against lexical
/// evidence: `fused = alpha * semantic + (1 - alpha) * lexical`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrievalConfig {
    pub candidate_k: usize,
    pub final_k: usize,
    pub alpha: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            candidate_k: 10,
            final_k: 5,
            alpha: 0.7,
        }
    }
}

impl RetrievalConfig {
    /// Build and validate in one step.
    pub fn new(candidate_k: usize, final_k: usize, alpha: f32) -> Result<Self> {
        let config = Self {
            candidate_k,
            final_k,
            alpha,
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub const fn with_candidate_k(mut self, candidate_k: usize) -> Self {
        self.candidate_k = candidate_k;
        self
    }

    #[must_use]
    pub const fn with_final_k(mut self, final_k: usize) -> Self {
        self.final_k = final_k;
        self
    }

    #[must_use]
    pub const fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.candidate_k == 0 {
            return Err(SearchError::invalid_config("candidate_k must be >= 1"));
        }
        if self.final_k == 0 {
            return Err(SearchError::invalid_config("final_k must be >= 1"));
        }
        if self.final_k > self.candidate_k {
            return Err(SearchError::invalid_config(format!(
                "final_k ({}) cannot exceed candidate_k ({})",
                self.final_k, self.candidate_k
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(SearchError::invalid_config(format!(
                "alpha must be within [0, 1], got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}
