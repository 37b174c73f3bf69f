//! Index command implementation.

use super::{build_embedder, open_index};
use crate::chunking::{ChunkerConfig, RecursiveChunker, TimedSegment};
use crate::cli::Output;
use crate::config::Settings;
use crate::indexer::Indexer;
use crate::vector_store::VectorIndex;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

/// Transcript file layout accepted by `finn index`.
#[derive(Debug, Deserialize)]
struct TranscriptFile {
    /// Full transcript text. When absent, segment texts are joined.
    text: Option<String>,
    /// Time-coded segments from the transcript source.
    #[serde(default)]
    segments: Vec<TimedSegment>,
}

/// Run the index command.
pub async fn run_index(
    file: &str,
    source_id: Option<String>,
    title: Option<String>,
    settings: Settings,
) -> Result<()> {
    let path = Path::new(file);
    let content = std::fs::read_to_string(path)?;
    let transcript: TranscriptFile = serde_json::from_str(&content)?;

    let text = match transcript.text {
        Some(text) => text,
        None => transcript
            .segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    };

    let source_id = source_id
        .or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
        })
        .ok_or_else(|| anyhow!("could not derive a source id from '{}'", file))?;
    let title = title.unwrap_or_else(|| source_id.clone());

    let index = open_index(&settings).await?;
    let embedder = build_embedder(&settings);

    let chunker = RecursiveChunker::with_config(ChunkerConfig {
        target_size: settings.chunking.target_size,
        overlap: settings.chunking.overlap,
        ..ChunkerConfig::default()
    });
    let indexer = Indexer::new(embedder, index.clone()).with_chunker(chunker);

    let spinner = Output::spinner("Chunking, embedding, and indexing...");
    let result = indexer
        .index_transcript(&source_id, &title, &text, &transcript.segments)
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            index.snapshot(&settings.snapshot_path()).await?;
            Output::success(&format!(
                "Indexed {} passages for '{}'",
                result.passages_indexed, result.source_id
            ));
            if result.replaced > 0 {
                Output::info(&format!("Replaced {} prior passages", result.replaced));
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Indexing failed: {}", e));
            Err(anyhow!("{}", e))
        }
    }
}
