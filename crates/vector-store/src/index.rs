use crate::error::{Result, VectorStoreError};
use crate::store::StoreSnapshot;
use crate::types::{ChunkId, Neighbor};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Distance used by the flat index. Smaller is always closer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// `1 - cosine_similarity`; zero-norm vectors have similarity 0.
    #[default]
    Cosine,
    /// Squared Euclidean distance.
    SquaredEuclidean,
}

impl DistanceMetric {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::SquaredEuclidean => "squared_euclidean",
        }
    }
}

/// Builds exact flat indexes over store snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexBuilder {
    metric: DistanceMetric,
}

impl IndexBuilder {
    #[must_use]
    pub const fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }

    #[must_use]
    pub const fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Copy every embedding in `snapshot` into a dense row-major matrix.
    ///
    /// An empty snapshot is an error ([`VectorStoreError::EmptyIndex`]); callers
    /// that treat "nothing stored" as a valid empty result check first.
    pub fn build(&self, snapshot: &StoreSnapshot) -> Result<FlatIndex> {
        let Some(dimension) = snapshot.dimension() else {
            return Err(VectorStoreError::EmptyIndex);
        };
        if snapshot.is_empty() {
            return Err(VectorStoreError::EmptyIndex);
        }

        let rows = snapshot.len();
        let mut flat = Vec::with_capacity(rows * dimension);
        let mut ids = Vec::with_capacity(rows);
        for chunk in snapshot.chunks() {
            flat.extend_from_slice(&chunk.embedding);
            ids.push(chunk.id);
        }

        let vectors = Array2::from_shape_vec((rows, dimension), flat)
            .map_err(|e| VectorStoreError::IndexError(e.to_string()))?;
        let norms = vectors.map_axis(Axis(1), |row| row.dot(&row).sqrt());

        log::debug!(
            "Built flat {} index: {} vectors x {} dims (generation {})",
            self.metric.as_str(),
            rows,
            dimension,
            snapshot.generation()
        );

        Ok(FlatIndex {
            metric: self.metric,
            ids,
            vectors,
            norms,
            generation: snapshot.generation(),
        })
    }
}

/// Exact k-nearest-neighbor index over one store snapshot.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    metric: DistanceMetric,
    ids: Vec<ChunkId>,
    vectors: Array2<f32>,
    norms: Array1<f32>,
    generation: u64,
}

impl FlatIndex {
    /// Return the `k` closest chunks, ascending by distance, ties by ascending id.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension() {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimension(),
                actual: query.len(),
            });
        }

        let query = ArrayView1::from(query);
        let distances = self.distances(&query);

        let mut neighbors: Vec<Neighbor> = self
            .ids
            .iter()
            .zip(distances.iter())
            .map(|(&id, &distance)| Neighbor { id, distance })
            .collect();

        let k = k.min(neighbors.len());
        if k == 0 {
            return Ok(Vec::new());
        }
        if k < neighbors.len() {
            neighbors.select_nth_unstable_by(k - 1, compare_neighbors);
            neighbors.truncate(k);
        }
        neighbors.sort_unstable_by(compare_neighbors);

        Ok(neighbors)
    }

    fn distances(&self, query: &ArrayView1<'_, f32>) -> Array1<f32> {
        match self.metric {
            DistanceMetric::Cosine => {
                let query_norm = query.dot(query).sqrt();
                let dots = self.vectors.dot(query);
                let mut distances = Array1::zeros(dots.len());
                for ((distance, &dot), &norm) in
                    distances.iter_mut().zip(dots.iter()).zip(self.norms.iter())
                {
                    let similarity = if norm == 0.0 || query_norm == 0.0 {
                        0.0
                    } else {
                        (dot / (norm * query_norm)).clamp(-1.0, 1.0)
                    };
                    *distance = 1.0 - similarity;
                }
                distances
            }
            DistanceMetric::SquaredEuclidean => self.vectors.map_axis(Axis(1), |row| {
                row.iter()
                    .zip(query.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f32>()
            }),
        }
    }

    #[must_use]
    pub const fn metric(&self) -> DistanceMetric {
        self.metric
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Generation of the snapshot this index was built from.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

fn compare_neighbors(a: &Neighbor, b: &Neighbor) -> Ordering {
    distance_key(a.distance)
        .total_cmp(&distance_key(b.distance))
        .then_with(|| a.id.cmp(&b.id))
}

// NaN of either sign sorts after every real distance.
fn distance_key(distance: f32) -> f32 {
    if distance.is_nan() {
        f32::INFINITY
    } else {
        distance
    }
}
