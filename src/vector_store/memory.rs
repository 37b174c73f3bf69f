//! In-memory flat vector index.
//!
//! Exact linear-scan search over a memory-resident store, with JSON
//! snapshot persistence for restart durability. Correctness and simplicity
//! win at the expected corpus scale (tens of thousands of vectors).

use super::{cosine_similarity, IndexStats, Metadata, SearchResult, VectorIndex};
use crate::error::{FinnError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::RwLock;

/// One stored vector with its metadata.
#[derive(Debug, Clone)]
struct Entry {
    id: String,
    vector: Vec<f32>,
    metadata: Metadata,
}

/// Entry list plus id lookup. Entries keep insertion order, which is the
/// tie-break order for equal similarities.
#[derive(Default)]
struct Inner {
    entries: Vec<Entry>,
    lookup: HashMap<String, usize>,
}

/// In-memory vector index with a fixed dimension.
pub struct MemoryVectorIndex {
    dimension: usize,
    inner: RwLock<Inner>,
}

impl MemoryVectorIndex {
    /// Create an empty index for vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// The fixed embedding dimension of this index.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn check_dimension(&self, len: usize) -> Result<()> {
        if len != self.dimension {
            return Err(FinnError::DimensionMismatch {
                expected: self.dimension,
                actual: len,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn insert(&self, id: &str, vector: Vec<f32>, metadata: Metadata) -> Result<()> {
        self.check_dimension(vector.len())?;

        let mut inner = self.inner.write().unwrap();
        match inner.lookup.get(id).copied() {
            Some(slot) => {
                // Last-write-wins; the entry keeps its original insertion
                // rank so re-inserting is observably idempotent.
                inner.entries[slot].vector = vector;
                inner.entries[slot].metadata = metadata;
            }
            None => {
                let slot = inner.entries.len();
                inner.entries.push(Entry {
                    id: id.to_string(),
                    vector,
                    metadata,
                });
                inner.lookup.insert(id.to_string(), slot);
            }
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &[f32],
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<SearchResult>> {
        self.check_dimension(query.len())?;

        let inner = self.inner.read().unwrap();

        let mut results: Vec<SearchResult> = inner
            .entries
            .iter()
            .map(|entry| SearchResult {
                id: entry.id.clone(),
                similarity: cosine_similarity(query, &entry.vector),
                metadata: entry.metadata.clone(),
            })
            .filter(|r| r.similarity >= threshold)
            .collect();

        // Stable sort over the insertion-ordered scan: equal similarities
        // keep earlier inserts first.
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        if let Some(slot) = inner.lookup.remove(id) {
            inner.entries.remove(slot);
            for rank in inner.lookup.values_mut() {
                if *rank > slot {
                    *rank -= 1;
                }
            }
        }
        Ok(())
    }

    async fn remove_by_metadata(&self, key: &str, value: &str) -> Result<usize> {
        let mut guard = self.inner.write().unwrap();
        let inner = &mut *guard;
        let before = inner.entries.len();

        inner
            .entries
            .retain(|entry| entry.metadata.get(key).map(String::as_str) != Some(value));

        inner.lookup = inner
            .entries
            .iter()
            .enumerate()
            .map(|(slot, entry)| (entry.id.clone(), slot))
            .collect();

        Ok(before - inner.entries.len())
    }

    async fn keyword_scan(&self, needle: &str) -> Result<Vec<SearchResult>> {
        let needle = needle.to_lowercase();
        let inner = self.inner.read().unwrap();

        let matches = inner
            .entries
            .iter()
            .filter(|entry| {
                entry
                    .metadata
                    .get("content")
                    .is_some_and(|content| content.to_lowercase().contains(&needle))
            })
            .map(|entry| SearchResult {
                id: entry.id.clone(),
                similarity: 1.0,
                metadata: entry.metadata.clone(),
            })
            .collect();

        Ok(matches)
    }

    async fn snapshot(&self, path: &Path) -> Result<()> {
        let document = {
            let inner = self.inner.read().unwrap();

            let mut vectors = serde_json::Map::new();
            let mut metadata = serde_json::Map::new();
            for entry in &inner.entries {
                vectors.insert(entry.id.clone(), json!(entry.vector));
                metadata.insert(entry.id.clone(), json!(entry.metadata));
            }

            json!({
                "dimension": self.dimension,
                "vectors": vectors,
                "metadata": metadata,
            })
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(&document)?)?;
        Ok(())
    }

    async fn restore(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|e| FinnError::CorruptSnapshot(format!("unparseable snapshot: {}", e)))?;

        let dimension = document
            .get("dimension")
            .and_then(Value::as_u64)
            .ok_or_else(|| FinnError::CorruptSnapshot("missing dimension field".to_string()))?
            as usize;

        if dimension != self.dimension {
            return Err(FinnError::DimensionMismatch {
                expected: self.dimension,
                actual: dimension,
            });
        }

        let vectors = document
            .get("vectors")
            .and_then(Value::as_object)
            .ok_or_else(|| FinnError::CorruptSnapshot("missing vectors field".to_string()))?;

        let metadata_map = document
            .get("metadata")
            .and_then(Value::as_object)
            .ok_or_else(|| FinnError::CorruptSnapshot("missing metadata field".to_string()))?;

        // Snapshots are written in insertion order and serde_json preserves
        // object order, so replaying the map rebuilds the tie-break order.
        let mut entries = Vec::with_capacity(vectors.len());
        for (id, value) in vectors {
            let vector = parse_vector(id, value)?;
            if vector.len() != dimension {
                return Err(FinnError::CorruptSnapshot(format!(
                    "vector '{}' has length {}, expected {}",
                    id,
                    vector.len(),
                    dimension
                )));
            }

            let metadata = match metadata_map.get(id) {
                Some(value) => parse_metadata(id, value)?,
                None => Metadata::new(),
            };

            entries.push(Entry {
                id: id.clone(),
                vector,
                metadata,
            });
        }

        let lookup = entries
            .iter()
            .enumerate()
            .map(|(slot, entry)| (entry.id.clone(), slot))
            .collect();

        let mut inner = self.inner.write().unwrap();
        *inner = Inner { entries, lookup };
        Ok(())
    }

    async fn stats(&self) -> Result<IndexStats> {
        let inner = self.inner.read().unwrap();

        let vector_bytes = inner.entries.len() * self.dimension * std::mem::size_of::<f32>();
        let metadata_bytes: usize = inner
            .entries
            .iter()
            .flat_map(|e| e.metadata.iter())
            .map(|(k, v)| k.len() + v.len())
            .sum();

        let sources: HashSet<&str> = inner
            .entries
            .iter()
            .filter_map(|e| e.metadata.get("source_id").map(String::as_str))
            .collect();

        Ok(IndexStats {
            total_vectors: inner.entries.len(),
            dimension: self.dimension,
            memory_usage_mb: (vector_bytes + metadata_bytes) as f64 / (1024.0 * 1024.0),
            sources: sources.len(),
        })
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        *inner = Inner::default();
        Ok(())
    }
}

fn parse_vector(id: &str, value: &Value) -> Result<Vec<f32>> {
    value
        .as_array()
        .ok_or_else(|| FinnError::CorruptSnapshot(format!("vector '{}' is not an array", id)))?
        .iter()
        .map(|v| {
            v.as_f64().map(|f| f as f32).ok_or_else(|| {
                FinnError::CorruptSnapshot(format!("vector '{}' contains a non-number", id))
            })
        })
        .collect()
}

fn parse_metadata(id: &str, value: &Value) -> Result<Metadata> {
    let object = value.as_object().ok_or_else(|| {
        FinnError::CorruptSnapshot(format!("metadata for '{}' is not an object", id))
    })?;

    object
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => {
                    return Err(FinnError::CorruptSnapshot(format!(
                        "metadata field '{}' of '{}' is not a string",
                        key, id
                    )))
                }
            };
            Ok((key.clone(), value))
        })
        .collect()
}
