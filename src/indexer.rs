//! Ingest pipeline: chunk a transcript, embed the passages, and index them.

use crate::chunking::{Passage, RecursiveChunker, TimedSegment};
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{Metadata, VectorIndex};
use std::sync::Arc;
use tracing::{info, instrument};

/// Coordinates chunking, embedding, and index insertion for one source.
pub struct Indexer {
    chunker: RecursiveChunker,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

/// Result of indexing one transcript.
#[derive(Debug)]
pub struct IndexResult {
    /// Source identifier the passages were filed under.
    pub source_id: String,
    /// Number of passages embedded and inserted.
    pub passages_indexed: usize,
    /// Number of prior vectors for this source that were evicted.
    pub replaced: usize,
}

impl Indexer {
    /// Create an indexer with the default chunking policy.
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            chunker: RecursiveChunker::new(),
            embedder,
            index,
        }
    }

    /// Use a custom chunker.
    pub fn with_chunker(mut self, chunker: RecursiveChunker) -> Self {
        self.chunker = chunker;
        self
    }

    /// Chunk, embed, and index a transcript.
    ///
    /// Replaces any previously indexed vectors for `source_id` rather than
    /// merging with them; a changed chunking policy produces a disjoint
    /// passage numbering, so stale vectors must not survive. Embedding
    /// happens before any index mutation so a provider failure leaves the
    /// prior vectors intact.
    #[instrument(skip(self, text, segments), fields(source_id = %source_id))]
    pub async fn index_transcript(
        &self,
        source_id: &str,
        title: &str,
        text: &str,
        segments: &[TimedSegment],
    ) -> Result<IndexResult> {
        let passages = self.chunker.chunk(text, segments)?;
        info!("Chunked transcript into {} passages", passages.len());

        let texts: Vec<String> = passages.iter().map(|p| p.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let replaced = self.index.remove_by_metadata("source_id", source_id).await?;

        for (passage, embedding) in passages.iter().zip(embeddings) {
            let id = format!("{}_{}", source_id, passage.index);
            self.index
                .insert(&id, embedding, passage_metadata(source_id, title, passage))
                .await?;
        }

        info!(
            "Indexed {} passages for '{}' ({} replaced)",
            passages.len(),
            source_id,
            replaced
        );

        Ok(IndexResult {
            source_id: source_id.to_string(),
            passages_indexed: passages.len(),
            replaced,
        })
    }
}

fn passage_metadata(source_id: &str, title: &str, passage: &Passage) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("content".to_string(), passage.content.clone());
    metadata.insert("source_id".to_string(), source_id.to_string());
    metadata.insert("title".to_string(), title.to_string());
    metadata.insert("start_time".to_string(), passage.start_time.clone());
    metadata.insert("end_time".to_string(), passage.end_time.clone());
    metadata.insert("word_count".to_string(), passage.word_count.to_string());
    metadata
}
