//! The prebuilt vector index artifact.
//!
//! The artifact is produced offline by the indexing pipeline and checked in
//! at a fixed relative path. This module deserializes it, validates its
//! embedding dimensions, and answers cosine top-k searches. Nothing here
//! writes to disk.

use connectsense_core::error::IndexError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One retrievable unit of the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexChunk {
    /// Unique chunk ID
    pub id: String,

    /// Source document this chunk was cut from
    pub source: String,

    /// The chunk text
    pub content: String,

    /// Precomputed embedding vector
    pub embedding: Vec<f32>,
}

/// A chunk returned from a search, with its similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    pub id: String,
    pub source: String,
    pub content: String,
    pub score: f32,
}

/// The deserialized index artifact.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Which embedding model produced the chunk vectors.
    pub embedding_model: String,

    /// Embedding dimensionality every chunk must match.
    pub dimensions: usize,

    /// The indexed chunks.
    pub chunks: Vec<IndexChunk>,
}

impl VectorIndex {
    /// Load and validate the artifact from disk.
    ///
    /// Missing file, unparseable JSON, and a chunk whose embedding length
    /// differs from the declared dimensionality are all initialization
    /// failures — the caller degrades the session rather than crashing.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IndexError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                IndexError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let index: Self =
            serde_json::from_str(&content).map_err(|e| IndexError::Parse(e.to_string()))?;

        for chunk in &index.chunks {
            if chunk.embedding.len() != index.dimensions {
                return Err(IndexError::DimensionMismatch {
                    id: chunk.id.clone(),
                    expected: index.dimensions,
                    actual: chunk.embedding.len(),
                });
            }
        }

        debug!(
            path = %path.display(),
            chunks = index.chunks.len(),
            dimensions = index.dimensions,
            "Vector index loaded"
        );

        Ok(index)
    }

    /// Rank chunks by cosine similarity to a query embedding.
    ///
    /// Returns at most `top_k` chunks sorted by descending similarity, with
    /// `score` set to the cosine similarity value.
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<RetrievedChunk> {
        let mut scored: Vec<RetrievedChunk> = self
            .chunks
            .iter()
            .map(|chunk| RetrievedChunk {
                id: chunk.id.clone(),
                source: chunk.source.clone(),
                content: chunk.content.clone(),
                score: cosine_similarity(&chunk.embedding, query_embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        scored
    }

    /// Number of chunks in the index.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 =
/// opposite. Returns 0.0 if either vector is zero-length, empty, or the
/// lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn chunk(id: &str, embedding: Vec<f32>) -> IndexChunk {
        IndexChunk {
            id: id.into(),
            source: format!("{id}.md"),
            content: format!("Content for {id}"),
            embedding,
        }
    }

    fn index(dimensions: usize, chunks: Vec<IndexChunk>) -> VectorIndex {
        VectorIndex {
            embedding_model: "models/embedding-001".into(),
            dimensions,
            chunks,
        }
    }

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_mismatched_lengths() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn cosine_zero_vector() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn search_ranks_by_similarity() {
        let idx = index(
            3,
            vec![
                chunk("a", vec![0.0, 1.0, 0.0]), // orthogonal = 0
                chunk("b", vec![1.0, 0.0, 0.0]), // identical = 1
                chunk("c", vec![0.5, 0.5, 0.0]), // partial = ~0.707
            ],
        );

        let results = idx.search(&[1.0, 0.0, 0.0], 10);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "b");
        assert_eq!(results[1].id, "c");
        assert_eq!(results[2].id, "a");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn search_respects_top_k() {
        let chunks: Vec<_> = (0..10)
            .map(|i| chunk(&format!("c{i}"), vec![1.0, i as f32 * 0.1]))
            .collect();
        let idx = index(2, chunks);

        let results = idx.search(&[1.0, 0.0], 3);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn load_missing_file() {
        let err = VectorIndex::load(Path::new("/nonexistent/full_index.json")).unwrap_err();
        assert!(matches!(err, IndexError::NotFound { .. }));
    }

    #[test]
    fn load_corrupt_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not json at all").unwrap();
        let err = VectorIndex::load(file.path()).unwrap_err();
        assert!(matches!(err, IndexError::Parse(_)));
    }

    #[test]
    fn load_rejects_dimension_mismatch() {
        let idx = index(3, vec![chunk("bad", vec![1.0, 2.0])]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&idx).unwrap().as_bytes())
            .unwrap();

        let err = VectorIndex::load(file.path()).unwrap_err();
        match err {
            IndexError::DimensionMismatch {
                id,
                expected,
                actual,
            } => {
                assert_eq!(id, "bad");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected DimensionMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn load_roundtrip() {
        let idx = index(2, vec![chunk("a", vec![0.1, 0.9])]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&idx).unwrap().as_bytes())
            .unwrap();

        let loaded = VectorIndex::load(file.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.chunks[0].id, "a");
        assert_eq!(loaded.embedding_model, "models/embedding-001");
    }
}
