//! Exact L2 flat index
//!
//! Stores every vector row-major and answers k-nearest-neighbor queries by
//! brute force. Search is O(n·d) but exact, which is what a small corpus
//! that is rebuilt on every mutation wants.
//!
//! The index supports no insert or delete. Row `i` is whatever vector was at
//! position `i` when [`FlatL2Index::build`] ran; callers keep that aligned with
//! their own row order by rebuilding from scratch.
//!
//! Distances are squared Euclidean distances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::IndexError;

/// Row id used to pad results when fewer than `k` rows exist.
pub const INVALID_ROW: i64 = -1;

const INDEX_MAGIC: [u8; 8] = *b"DSKFLAT\0";
const INDEX_FORMAT_VERSION: u32 = 1;

/// Result of a k-NN query: parallel arrays of length `k`, ascending distance.
///
/// Slots past the number of stored rows hold [`INVALID_ROW`] and `f32::MAX`.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbors {
    pub distances: Vec<f32>,
    pub row_ids: Vec<i64>,
}

impl Neighbors {
    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// Iterate `(distance, row_id)` pairs in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (f32, i64)> + '_ {
        self.distances
            .iter()
            .copied()
            .zip(self.row_ids.iter().copied())
    }
}

/// Exact nearest-neighbor index over L2 distance.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dimension: usize,
    /// Row-major, `rows * dimension` values.
    data: Vec<f32>,
    built_at: DateTime<Utc>,
}

/// On-disk envelope.
#[derive(Serialize, Deserialize)]
struct IndexEnvelope {
    magic: [u8; 8],
    version: u32,
    dimension: u64,
    rows: u64,
    built_at: DateTime<Utc>,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Build an index containing exactly `vectors`, in order.
    ///
    /// Returns `Ok(None)` for an empty input: there is nothing to search.
    pub fn build(vectors: &[Vec<f32>]) -> Result<Option<Self>, IndexError> {
        let Some(first) = vectors.first() else {
            return Ok(None);
        };

        let dimension = first.len();
        if dimension == 0 {
            return Err(IndexError::ZeroDimension);
        }

        let mut data = Vec::with_capacity(vectors.len() * dimension);
        for vector in vectors {
            if vector.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }

        Ok(Some(Self {
            dimension,
            data,
            built_at: Utc::now(),
        }))
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored vectors.
    pub fn row_count(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Return the `k` nearest rows to `query`, ascending by squared L2 distance.
    ///
    /// Ties keep the lower row id first. When `k` exceeds the row count the
    /// tail is padded with [`INVALID_ROW`].
    pub fn search(&self, query: &[f32], k: usize) -> Result<Neighbors, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(f32, usize)> = self
            .data
            .chunks_exact(self.dimension)
            .map(|row| squared_l2(query, row))
            .enumerate()
            .map(|(row_id, distance)| (distance, row_id))
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut distances = Vec::with_capacity(k);
        let mut row_ids = Vec::with_capacity(k);
        for (distance, row_id) in scored.into_iter().take(k) {
            distances.push(distance);
            row_ids.push(i64::try_from(row_id).unwrap_or(INVALID_ROW));
        }
        while row_ids.len() < k {
            distances.push(f32::MAX);
            row_ids.push(INVALID_ROW);
        }

        Ok(Neighbors { distances, row_ids })
    }

    /// Serialize to the native binary format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IndexError> {
        let envelope = IndexEnvelope {
            magic: INDEX_MAGIC,
            version: INDEX_FORMAT_VERSION,
            dimension: self.dimension as u64,
            rows: self.row_count() as u64,
            built_at: self.built_at,
            data: self.data.clone(),
        };
        bincode::serialize(&envelope).map_err(|e| IndexError::Encode(e.to_string()))
    }

    /// Decode a blob written by [`FlatL2Index::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IndexError> {
        let envelope: IndexEnvelope =
            bincode::deserialize(bytes).map_err(|e| IndexError::Corrupt(e.to_string()))?;

        if envelope.magic != INDEX_MAGIC {
            return Err(IndexError::BadMagic);
        }
        if envelope.version != INDEX_FORMAT_VERSION {
            return Err(IndexError::UnsupportedVersion(envelope.version));
        }

        let dimension = usize::try_from(envelope.dimension)
            .map_err(|_| IndexError::Corrupt("dimension overflows usize".to_string()))?;
        if dimension == 0 {
            return Err(IndexError::ZeroDimension);
        }
        let rows = usize::try_from(envelope.rows)
            .map_err(|_| IndexError::Corrupt("row count overflows usize".to_string()))?;

        let expected_len = rows
            .checked_mul(dimension)
            .ok_or_else(|| IndexError::Corrupt("row count overflows usize".to_string()))?;
        if envelope.data.len() != expected_len {
            return Err(IndexError::Corrupt(format!(
                "expected {expected_len} values for {rows} rows of dimension {dimension}, found {}",
                envelope.data.len()
            )));
        }

        Ok(Self {
            dimension,
            data: envelope.data,
            built_at: envelope.built_at,
        })
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FlatL2Index {
        FlatL2Index::build(&[
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 3.0],
        ])
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_build_empty_is_none() {
        assert!(FlatL2Index::build(&[]).unwrap().is_none());
    }

    #[test]
    fn test_build_rejects_mixed_dimensions() {
        let err = FlatL2Index::build(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_build_rejects_zero_dimension() {
        let err = FlatL2Index::build(&[vec![]]).unwrap_err();
        assert!(matches!(err, IndexError::ZeroDimension));
    }

    #[test]
    fn test_row_count_and_dimension() {
        let index = sample();
        assert_eq!(index.row_count(), 3);
        assert_eq!(index.dimension(), 2);
    }

    #[test]
    fn test_search_orders_by_squared_distance() {
        let index = sample();
        let result = index.search(&[0.9, 0.0], 3).unwrap();
        assert_eq!(result.row_ids, vec![1, 0, 2]);
        assert!((result.distances[0] - 0.01).abs() < 1e-6);
        assert!((result.distances[1] - 0.81).abs() < 1e-6);
        assert!((result.distances[2] - 9.81).abs() < 1e-5);
    }

    #[test]
    fn test_search_pads_when_k_exceeds_rows() {
        let index = sample();
        let result = index.search(&[0.0, 0.0], 5).unwrap();
        assert_eq!(result.len(), 5);
        assert_eq!(&result.row_ids[3..], &[INVALID_ROW, INVALID_ROW]);
        assert_eq!(result.distances[4], f32::MAX);
    }

    #[test]
    fn test_search_ties_keep_row_order() {
        let index = FlatL2Index::build(&[vec![1.0], vec![1.0], vec![1.0]])
            .unwrap()
            .unwrap();
        let result = index.search(&[1.0], 3).unwrap();
        assert_eq!(result.row_ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_search_rejects_wrong_query_dimension() {
        let index = sample();
        assert!(matches!(
            index.search(&[1.0, 2.0, 3.0], 1),
            Err(IndexError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_bytes_round_trip_preserves_search() {
        let index = sample();
        let bytes = index.to_bytes().unwrap();
        let restored = FlatL2Index::from_bytes(&bytes).unwrap();
        assert_eq!(restored, index);
        assert_eq!(
            restored.search(&[0.0, 2.5], 2).unwrap(),
            index.search(&[0.0, 2.5], 2).unwrap()
        );
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(FlatL2Index::from_bytes(b"not an index").is_err());
    }

    #[test]
    fn test_from_bytes_rejects_bad_magic() {
        let envelope = IndexEnvelope {
            magic: *b"FAISSIDX",
            version: INDEX_FORMAT_VERSION,
            dimension: 1,
            rows: 1,
            built_at: Utc::now(),
            data: vec![1.0],
        };
        let bytes = bincode::serialize(&envelope).unwrap();
        assert!(matches!(
            FlatL2Index::from_bytes(&bytes),
            Err(IndexError::BadMagic)
        ));
    }

    #[test]
    fn test_from_bytes_rejects_truncated_data() {
        let envelope = IndexEnvelope {
            magic: INDEX_MAGIC,
            version: INDEX_FORMAT_VERSION,
            dimension: 2,
            rows: 2,
            built_at: Utc::now(),
            data: vec![1.0, 2.0, 3.0],
        };
        let bytes = bincode::serialize(&envelope).unwrap();
        assert!(matches!(
            FlatL2Index::from_bytes(&bytes),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_future_version() {
        let envelope = IndexEnvelope {
            magic: INDEX_MAGIC,
            version: 99,
            dimension: 1,
            rows: 0,
            built_at: Utc::now(),
            data: vec![],
        };
        let bytes = bincode::serialize(&envelope).unwrap();
        assert!(matches!(
            FlatL2Index::from_bytes(&bytes),
            Err(IndexError::UnsupportedVersion(99))
        ));
    }
}
