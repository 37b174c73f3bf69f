//! Vector index abstraction for Finn.
//!
//! Provides a trait-based interface so the exact in-memory index can be
//! swapped for an approximate backend without changing callers.

mod memory;

pub use memory::MemoryVectorIndex;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Metadata stored alongside a vector.
///
/// Always contains at least `content`, `source_id`, `start_time`, and
/// `end_time` for vectors produced by the ingest pipeline.
pub type Metadata = HashMap<String, String>;

/// A search hit with similarity score.
///
/// Transient: constructed fresh per query, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Vector id, e.g. `"{source_id}_{passage_index}"`.
    pub id: String,
    /// Cosine similarity to the query (1.0 for keyword matches).
    pub similarity: f32,
    /// Metadata of the matched vector.
    pub metadata: Metadata,
}

/// Summary statistics about an index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    /// Number of stored vectors.
    pub total_vectors: usize,
    /// Fixed embedding dimension.
    pub dimension: usize,
    /// Rough in-memory footprint in megabytes.
    pub memory_usage_mb: f64,
    /// Number of distinct `source_id` values.
    pub sources: usize,
}

/// Trait for vector index implementations.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Store a vector with metadata. Overwrites an existing entry with the
    /// same id (last-write-wins).
    async fn insert(&self, id: &str, vector: Vec<f32>, metadata: Metadata) -> Result<()>;

    /// Exact similarity search: keeps entries at or above `threshold`,
    /// sorted descending with ties broken by insertion order, truncated to
    /// `top_k`.
    async fn search(&self, query: &[f32], top_k: usize, threshold: f32)
        -> Result<Vec<SearchResult>>;

    /// Remove a vector by id. Removing an absent id is a no-op.
    async fn remove(&self, id: &str) -> Result<()>;

    /// Remove every vector whose metadata field `key` equals `value`.
    /// Returns the number of vectors removed.
    async fn remove_by_metadata(&self, key: &str, value: &str) -> Result<usize>;

    /// Case-insensitive substring scan over stored `content` metadata, in
    /// insertion order. Matches score a flat 1.0.
    async fn keyword_scan(&self, needle: &str) -> Result<Vec<SearchResult>>;

    /// Serialize the full index state to a file.
    async fn snapshot(&self, path: &Path) -> Result<()>;

    /// Replace in-memory state from a snapshot file. A missing file is a
    /// no-op so first runs start from an empty index.
    async fn restore(&self, path: &Path) -> Result<()>;

    /// Index statistics.
    async fn stats(&self) -> Result<IndexStats>;

    /// Drop all stored vectors.
    async fn clear(&self) -> Result<()>;
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 when either norm is zero, never NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
