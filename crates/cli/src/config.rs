use anyhow::{Context, Result};
use rag_search::RetrievalConfig;
use rag_text_chunker::ChunkerConfig;
use rag_vector_store::{DistanceMetric, HashingEmbedder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of a `rag.toml` file. Every section and key is optional.
///
/// ```toml
/// [retrieval]
/// candidate_k = 20
/// final_k = 5
/// alpha = 0.6
/// metric = "squared_euclidean"
///
/// [chunking]
/// chunk_size = 200
/// overlap = 40
///
/// [embedding]
/// dimension = 512
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RagConfig {
    pub retrieval: RetrievalSection,
    pub chunking: ChunkerConfig,
    pub embedding: EmbeddingSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrievalSection {
    pub candidate_k: usize,
    pub final_k: usize,
    pub alpha: f32,
    pub metric: DistanceMetric,
}

impl Default for RetrievalSection {
    fn default() -> Self {
        let defaults = RetrievalConfig::default();
        Self {
            candidate_k: defaults.candidate_k,
            final_k: defaults.final_k,
            alpha: defaults.alpha,
            metric: DistanceMetric::default(),
        }
    }
}

impl RetrievalSection {
    pub const fn to_retrieval_config(self) -> RetrievalConfig {
        RetrievalConfig {
            candidate_k: self.candidate_k,
            final_k: self.final_k,
            alpha: self.alpha,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingSection {
    pub dimension: usize,
}

impl Default for EmbeddingSection {
    fn default() -> Self {
        Self {
            dimension: HashingEmbedder::DEFAULT_DIMENSION,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub candidate_k: Option<usize>,
    pub final_k: Option<usize>,
    pub alpha: Option<f32>,
}

impl RagConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid config file")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("In {}", path.display()))
    }

    /// File values when a path is given, defaults otherwise.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(candidate_k) = overrides.candidate_k {
            self.retrieval.candidate_k = candidate_k;
        }
        if let Some(final_k) = overrides.final_k {
            self.retrieval.final_k = final_k;
        }
        if let Some(alpha) = overrides.alpha {
            self.retrieval.alpha = alpha;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.retrieval.to_retrieval_config().validate()?;
        self.chunking.validate()?;
        anyhow::ensure!(
            self.embedding.dimension > 0,
            "embedding.dimension must be > 0"
        );
        Ok(())
    }
}
