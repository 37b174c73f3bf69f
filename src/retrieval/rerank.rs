//! Secondary re-ranking pass over a semantic shortlist.
//!
//! Re-embeds the query and each candidate's content with a secondary
//! (typically smaller) model and resorts by the recomputed similarity.
//! Failure handling is deliberately asymmetric: a failed query embedding
//! abandons the whole pass, while a failed candidate embedding only keeps
//! that candidate's original score.

use crate::embedding::Embedder;
use crate::vector_store::{cosine_similarity, SearchResult};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Re-ranks search results with a secondary embedding model.
pub struct Reranker {
    embedder: Arc<dyn Embedder>,
    max_input_chars: usize,
    concurrency: usize,
}

impl Reranker {
    /// Create a reranker around a secondary embedder.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            max_input_chars: 8192,
            concurrency: 4,
        }
    }

    /// Set the content truncation boundary in characters.
    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    /// Set how many candidate embeddings run in flight at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Re-score and resort candidates.
    ///
    /// Returns the original ordering unchanged when the query-level
    /// re-embedding fails; a per-candidate failure keeps that candidate's
    /// original similarity and never cancels the rest of the batch.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn rerank(&self, query: &str, candidates: Vec<SearchResult>) -> Vec<SearchResult> {
        if candidates.is_empty() {
            return candidates;
        }

        let query_embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Re-rank query embedding failed, keeping original order: {}", e);
                return candidates;
            }
        };

        let query_embedding = &query_embedding;
        let embedder = &self.embedder;
        let max_input_chars = self.max_input_chars;

        let mut rescored: Vec<SearchResult> = stream::iter(candidates)
            .map(|mut candidate| async move {
                let content = candidate
                    .metadata
                    .get("content")
                    .map(String::as_str)
                    .unwrap_or("");
                let truncated = truncate_chars(content, max_input_chars);

                match embedder.embed(&truncated).await {
                    Ok(embedding) => {
                        candidate.similarity = cosine_similarity(query_embedding, &embedding);
                    }
                    Err(e) => {
                        warn!(
                            "Re-rank embedding failed for '{}', keeping original score: {}",
                            candidate.id, e
                        );
                    }
                }
                candidate
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        rescored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rescored
    }
}

/// Truncate to a character boundary, never a byte boundary.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}
