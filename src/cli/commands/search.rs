//! Search command implementation.

use super::{build_embedder, open_index};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::retrieval::{Reranker, Retriever, SearchMode};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;

/// Run the search command.
pub async fn run_search(
    query: &str,
    mode: &str,
    limit: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let mode: SearchMode = mode.parse().map_err(|e: String| anyhow!(e))?;

    let index = open_index(&settings).await?;
    let embedder = build_embedder(&settings);

    let mut retriever = Retriever::new(index, embedder)
        .with_max_results(limit.unwrap_or(settings.retrieval.max_results))
        .with_min_similarity(settings.retrieval.min_similarity);

    if let Some(rerank_model) = settings
        .embedding
        .rerank_model
        .as_deref()
        .filter(|m| !m.is_empty())
    {
        let rerank_embedder = Arc::new(OpenAIEmbedder::with_timeout(
            rerank_model,
            settings.embedding.dimensions as usize,
            Duration::from_secs(settings.embedding.timeout_seconds),
        ));
        retriever = retriever.with_reranker(
            Reranker::new(rerank_embedder)
                .with_max_input_chars(settings.retrieval.rerank_max_chars)
                .with_concurrency(settings.retrieval.rerank_concurrency),
        );
    }

    let spinner = Output::spinner("Searching...");
    let response = retriever.search(query, mode).await;
    spinner.finish_and_clear();

    match response {
        Ok(response) => {
            if response.results.is_empty() {
                Output::warning("No results found matching your query.");
            } else {
                Output::success(&format!(
                    "Found {} results ({} shown)",
                    response.total_results,
                    response.results.len()
                ));

                for result in &response.results {
                    let get = |key: &str| {
                        result
                            .metadata
                            .get(key)
                            .map(String::as_str)
                            .unwrap_or("")
                    };
                    Output::search_result(
                        &result.id,
                        get("title"),
                        get("start_time"),
                        get("end_time"),
                        result.similarity,
                        get("content"),
                    );
                }
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            Err(anyhow!("{}", e))
        }
    }
}
