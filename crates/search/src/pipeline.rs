use crate::config::RetrievalConfig;
use crate::error::{Result, SearchError};
use crate::merge::ContextMerger;
use crate::query::{normalize_query, GreetingClassifier, QueryClassifier, QueryKind};
use crate::retriever::{RetrievedChunk, Retriever};
use rag_text_chunker::TextChunker;
use rag_vector_store::{ChunkId, DistanceMetric, Embedder, VectorStore};
use serde::Serialize;
use std::sync::Arc;

/// Which retrieval path [`RagPipeline::retrieve_context`] takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Coarse vector stage, then fused re-ranking
    #[default]
    TwoStage,
    /// Score every stored chunk
    Linear,
}

/// What one ingestion pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub stored: Vec<ChunkId>,
    /// Chunks dropped because they could not be embedded
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextOutcome {
    /// The query needed no context; nothing was searched.
    Trivial,
    Retrieved {
        results: Vec<RetrievedChunk>,
        merged_context: String,
    },
}

impl ContextOutcome {
    #[must_use]
    pub fn merged_context(&self) -> Option<&str> {
        match self {
            Self::Trivial => None,
            Self::Retrieved { merged_context, .. } => Some(merged_context),
        }
    }
}

/// Ingestion and retrieval glue: chunk, embed, store, search, merge.
pub struct RagPipeline {
    store: Arc<VectorStore>,
    retriever: Retriever,
    embedder: Arc<dyn Embedder>,
    chunker: TextChunker,
    classifier: Box<dyn QueryClassifier>,
    config: RetrievalConfig,
    strategy: SearchStrategy,
}

impl RagPipeline {
    /// Fresh store sized to the embedder, default chunking and retrieval settings.
    pub fn new(embedder: Arc<dyn Embedder>) -> Result<Self> {
        let store = Arc::new(VectorStore::with_dimension(embedder.dimension())?);
        log::debug!(
            "RagPipeline using embedder '{}' ({} dims)",
            embedder.model_id(),
            embedder.dimension()
        );
        Ok(Self {
            retriever: Retriever::new(Arc::clone(&store)),
            store,
            embedder,
            chunker: TextChunker::default(),
            classifier: Box::new(GreetingClassifier),
            config: RetrievalConfig::default(),
            strategy: SearchStrategy::default(),
        })
    }

    #[must_use]
    pub fn with_chunker(mut self, chunker: TextChunker) -> Self {
        self.chunker = chunker;
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: impl QueryClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.retriever = Retriever::with_metric(Arc::clone(&self.store), metric);
        self
    }

    #[must_use]
    pub const fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_config(mut self, config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    #[must_use]
    pub const fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Chunk `text`, embed each chunk and append it to the store.
    ///
    /// A chunk whose embedding fails is skipped and counted; a store error
    /// (for example a dimension mismatch) aborts the pass.
    pub fn ingest_document(&self, text: &str) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        for chunk in self.chunker.chunk(text) {
            let embedding = match self.embedder.embed(&chunk.content) {
                Ok(embedding) => embedding,
                Err(err) => {
                    log::warn!("Skipping chunk {}: {err}", chunk.ordinal);
                    report.skipped += 1;
                    continue;
                }
            };
            let id = self.store.append(chunk.content, embedding)?;
            report.stored.push(id);
        }

        log::info!(
            "Ingested {} chunks ({} skipped, store size {})",
            report.stored.len(),
            report.skipped,
            self.store.size()
        );
        Ok(report)
    }

    /// Classify, normalize, embed, search and merge.
    pub fn retrieve_context(&self, query: &str) -> Result<ContextOutcome> {
        if self.classifier.classify(query) == QueryKind::Trivial {
            log::debug!("Trivial query, skipping retrieval");
            return Ok(ContextOutcome::Trivial);
        }

        let normalized = normalize_query(query);
        log::debug!(
            "Retrieving with {:?} strategy, {} metric",
            self.strategy,
            self.retriever.metric().as_str()
        );
        let query_embedding = self.embedder.embed(&normalized).map_err(|err| {
            log::warn!("Query embedding failed: {err}");
            SearchError::EmbeddingUnavailable(err.to_string())
        })?;

        let results = match self.strategy {
            SearchStrategy::TwoStage => {
                self.retriever
                    .search(&normalized, Some(&query_embedding), &self.config)?
            }
            SearchStrategy::Linear => {
                self.retriever
                    .search_linear(&normalized, Some(&query_embedding), &self.config)?
            }
        };
        let merged_context = ContextMerger::merge_results(&results);

        Ok(ContextOutcome::Retrieved {
            results,
            merged_context,
        })
    }
}
