use crate::config::RetrievalConfig;
use crate::error::{Result, SearchError};
use crate::scorer::Scorer;
use rag_vector_store::{
    Chunk, ChunkId, DistanceMetric, FlatIndex, IndexBuilder, StoreSnapshot, VectorStore,
    VectorStoreError,
};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::{Arc, PoisonError, RwLock};

/// One ranked hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub id: ChunkId,
    pub text: String,
    /// Fused score used for ranking.
    pub score: f32,
    pub semantic: f32,
    pub lexical: f32,
}

/// Two-stage hybrid retriever over a shared [`VectorStore`].
///
/// The coarse stage asks a flat index for `candidate_k` nearest neighbors;
/// the fine stage re-ranks them by fused score. The index is cached per store
/// generation, so it is rebuilt only after the store changes and a stale index
/// is never consulted.
pub struct Retriever {
    store: Arc<VectorStore>,
    builder: IndexBuilder,
    cached_index: RwLock<Option<Arc<FlatIndex>>>,
}

impl Retriever {
    #[must_use]
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self::with_metric(store, DistanceMetric::default())
    }

    #[must_use]
    pub fn with_metric(store: Arc<VectorStore>, metric: DistanceMetric) -> Self {
        Self {
            store,
            builder: IndexBuilder::new(metric),
            cached_index: RwLock::new(None),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    #[must_use]
    pub const fn metric(&self) -> DistanceMetric {
        self.builder.metric()
    }

    /// Coarse vector retrieval followed by fused re-ranking.
    ///
    /// `query_embedding` is `None` when the caller's embedding provider failed;
    /// that is reported as [`SearchError::EmbeddingUnavailable`], distinct from
    /// an empty result. An empty store yields `Ok(vec![])`.
    pub fn search(
        &self,
        query_text: &str,
        query_embedding: Option<&[f32]>,
        config: &RetrievalConfig,
    ) -> Result<Vec<RetrievedChunk>> {
        let query_embedding = prepare(query_embedding, config)?;
        let snapshot = self.store.snapshot();
        if snapshot.is_empty() {
            log::debug!("Search skipped: store is empty");
            return Ok(Vec::new());
        }
        check_dimension(&snapshot, query_embedding)?;

        let index = self.index_for(&snapshot)?;
        let neighbors = index.search(query_embedding, config.candidate_k)?;
        log::debug!(
            "Coarse stage ({}): {} of {} chunks (candidate_k={})",
            index.metric().as_str(),
            neighbors.len(),
            snapshot.len(),
            config.candidate_k
        );

        let scorer = Scorer::new(query_text, query_embedding, config.alpha);
        let mut scored = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            let chunk = snapshot
                .get(neighbor.id)
                .ok_or(VectorStoreError::NotFound(neighbor.id))?;
            scored.push(score_chunk(&scorer, chunk));
        }

        Ok(select(scored, config.final_k))
    }

    /// Single-stage variant: score every stored chunk directly.
    ///
    /// Produces the same ranking as [`Retriever::search`] whenever
    /// `candidate_k >= store size`.
    pub fn search_linear(
        &self,
        query_text: &str,
        query_embedding: Option<&[f32]>,
        config: &RetrievalConfig,
    ) -> Result<Vec<RetrievedChunk>> {
        let query_embedding = prepare(query_embedding, config)?;
        let snapshot = self.store.snapshot();
        if snapshot.is_empty() {
            return Ok(Vec::new());
        }
        check_dimension(&snapshot, query_embedding)?;

        let scorer = Scorer::new(query_text, query_embedding, config.alpha);
        let scored = snapshot
            .chunks()
            .iter()
            .map(|chunk| score_chunk(&scorer, chunk))
            .collect();

        Ok(select(scored, config.final_k))
    }

    fn index_for(&self, snapshot: &StoreSnapshot) -> Result<Arc<FlatIndex>> {
        {
            let cached = self
                .cached_index
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(index) = cached.as_ref() {
                if index.generation() == snapshot.generation() {
                    return Ok(Arc::clone(index));
                }
            }
        }

        let index = Arc::new(self.builder.build(snapshot)?);

        let mut cached = self
            .cached_index
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let newer_cached = cached
            .as_ref()
            .is_some_and(|existing| existing.generation() > index.generation());
        if !newer_cached {
            *cached = Some(Arc::clone(&index));
        }
        Ok(index)
    }
}

fn prepare<'a>(query_embedding: Option<&'a [f32]>, config: &RetrievalConfig) -> Result<&'a [f32]> {
    config.validate()?;
    query_embedding.ok_or_else(|| {
        SearchError::EmbeddingUnavailable("no query embedding was supplied".to_string())
    })
}

fn check_dimension(snapshot: &StoreSnapshot, query_embedding: &[f32]) -> Result<()> {
    match snapshot.dimension() {
        Some(expected) if expected != query_embedding.len() => {
            Err(VectorStoreError::DimensionMismatch {
                expected,
                actual: query_embedding.len(),
            }
            .into())
        }
        _ => Ok(()),
    }
}

fn score_chunk(scorer: &Scorer<'_>, chunk: &Chunk) -> RetrievedChunk {
    let parts = scorer.score(&chunk.text, &chunk.embedding);
    RetrievedChunk {
        id: chunk.id,
        text: chunk.text.clone(),
        score: parts.fused,
        semantic: parts.semantic,
        lexical: parts.lexical,
    }
}

/// Fused score descending, ties by ascending id, first `final_k`.
fn select(mut scored: Vec<RetrievedChunk>, final_k: usize) -> Vec<RetrievedChunk> {
    scored.sort_by(compare_ranked);
    scored.truncate(final_k);
    scored
}

fn compare_ranked(a: &RetrievedChunk, b: &RetrievedChunk) -> Ordering {
    rank_key(b.score)
        .total_cmp(&rank_key(a.score))
        .then_with(|| a.id.cmp(&b.id))
}

// -0.0 ties with 0.0; NaN ranks last.
fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else if score == 0.0 {
        0.0
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn toy_store() -> Arc<VectorStore> {
        let store = VectorStore::new();
        store.append("cats are mammals", vec![1.0, 0.0]).unwrap();
        store.append("dogs are loyal", vec![0.9, 0.1]).unwrap();
        store
            .append("the stock market fell today", vec![0.0, 1.0])
            .unwrap();
        Arc::new(store)
    }

    fn ids(results: &[RetrievedChunk]) -> Vec<ChunkId> {
        results.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_cats_query_ranks_cats_first() {
        let retriever = Retriever::new(toy_store());
        let config = RetrievalConfig::default();

        let results = retriever
            .search("tell me about cats", Some(&[1.0, 0.0]), &config)
            .unwrap();
        assert_eq!(ids(&results), vec![0, 1, 2]);
        assert_eq!(results[0].text, "cats are mammals");
        assert!(results[0].lexical > 0.0);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_metric_defaults_to_cosine() {
        assert_eq!(Retriever::new(toy_store()).metric(), DistanceMetric::Cosine);
        let euclidean = Retriever::with_metric(toy_store(), DistanceMetric::SquaredEuclidean);
        assert_eq!(euclidean.metric(), DistanceMetric::SquaredEuclidean);
    }

    #[test]
    fn test_empty_store_returns_empty() {
        let retriever = Retriever::new(Arc::new(VectorStore::new()));
        let results = retriever
            .search("anything", Some(&[1.0, 0.0]), &RetrievalConfig::default())
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_invalid_config_fails_before_search() {
        let retriever = Retriever::new(toy_store());
        let config = RetrievalConfig::default()
            .with_candidate_k(3)
            .with_final_k(5);
        let err = retriever
            .search("cats", Some(&[1.0, 0.0]), &config)
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));

        let empty = Retriever::new(Arc::new(VectorStore::new()));
        assert!(matches!(
            empty.search("cats", Some(&[1.0, 0.0]), &config),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_embedding_is_distinct_from_no_results() {
        let retriever = Retriever::new(Arc::new(VectorStore::new()));
        let err = retriever
            .search("cats", None, &RetrievalConfig::default())
            .unwrap_err();
        assert!(matches!(err, SearchError::EmbeddingUnavailable(_)));
        assert!(matches!(
            retriever.search_linear("cats", None, &RetrievalConfig::default()),
            Err(SearchError::EmbeddingUnavailable(_))
        ));
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let retriever = Retriever::new(toy_store());
        let err = retriever
            .search("cats", Some(&[1.0, 0.0, 0.0]), &RetrievalConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::VectorStore(VectorStoreError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_final_k_limits_results() {
        let retriever = Retriever::new(toy_store());
        let config = RetrievalConfig::new(2, 1, 0.7).unwrap();
        let results = retriever.search("cats", Some(&[1.0, 0.0]), &config).unwrap();
        assert_eq!(ids(&results), vec![0]);
    }

    #[test]
    fn test_ties_broken_by_lowest_id() {
        let store = VectorStore::new();
        store.append("alpha", vec![0.0, 1.0]).unwrap();
        store.append("beta", vec![1.0, 0.0]).unwrap();
        store.append("gamma", vec![1.0, 0.0]).unwrap();
        store.append("delta", vec![0.0, 1.0]).unwrap();
        let retriever = Retriever::new(Arc::new(store));

        let results = retriever
            .search("unrelated", Some(&[1.0, 0.0]), &RetrievalConfig::default())
            .unwrap();
        assert_eq!(ids(&results), vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_alpha_zero_ranks_by_lexical_overlap() {
        let retriever = Retriever::new(toy_store());
        let config = RetrievalConfig::new(10, 3, 0.0).unwrap();
        let results = retriever
            .search("stock market", Some(&[1.0, 0.0]), &config)
            .unwrap();
        assert_eq!(results[0].id, 2);
        assert!((results[0].score - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_index_rebuilt_after_append() {
        let store = toy_store();
        let retriever = Retriever::new(Arc::clone(&store));
        let config = RetrievalConfig::default();

        let before = retriever.search("bonds", Some(&[0.0, 1.0]), &config).unwrap();
        assert_eq!(before.len(), 3);

        store.append("bonds rallied", vec![0.0, 1.0]).unwrap();
        let after = retriever.search("bonds", Some(&[0.0, 1.0]), &config).unwrap();
        assert_eq!(after.len(), 4);
        assert_eq!(after[0].id, 3);
    }

    #[test]
    fn test_index_after_clear_does_not_serve_old_chunks() {
        let store = toy_store();
        let retriever = Retriever::new(Arc::clone(&store));
        let config = RetrievalConfig::default();
        retriever.search("cats", Some(&[1.0, 0.0]), &config).unwrap();

        store.clear();
        assert!(retriever
            .search("cats", Some(&[1.0, 0.0]), &config)
            .unwrap()
            .is_empty());

        store.append("fresh chunk", vec![0.5, 0.5]).unwrap();
        let results = retriever.search("fresh", Some(&[1.0, 0.0]), &config).unwrap();
        assert_eq!(ids(&results), vec![0]);
        assert_eq!(results[0].text, "fresh chunk");
    }

    #[test]
    fn test_linear_matches_two_stage_when_candidates_cover_store() {
        let retriever = Retriever::new(toy_store());
        let config = RetrievalConfig::new(3, 3, 0.7).unwrap();
        let two_stage = retriever
            .search("are dogs loyal", Some(&[0.7, 0.3]), &config)
            .unwrap();
        let linear = retriever
            .search_linear("are dogs loyal", Some(&[0.7, 0.3]), &config)
            .unwrap();
        assert_eq!(two_stage, linear);
    }

    #[test]
    fn test_rank_key_normalizes_signed_zero_and_nan() {
        assert_eq!(rank_key(-0.0).to_bits(), 0.0f32.to_bits());
        assert_eq!(rank_key(f32::NAN), f32::NEG_INFINITY);
        assert_eq!(rank_key(0.25), 0.25);
    }
}
