//! Retrieval over the vector index: keyword, semantic, and hybrid search.

mod rerank;

pub use rerank::Reranker;

use crate::embedding::Embedder;
use crate::error::{FinnError, Result};
use crate::vector_store::{SearchResult, VectorIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// How a query is matched against the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring match over stored content.
    Keyword,
    /// Embed the query and rank by cosine similarity.
    Semantic,
    /// Union of both, semantic scores winning on conflict.
    #[default]
    Hybrid,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyword" => Ok(SearchMode::Keyword),
            "semantic" => Ok(SearchMode::Semantic),
            "hybrid" => Ok(SearchMode::Hybrid),
            _ => Err(format!("Unknown search mode: {}", s)),
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Keyword => write!(f, "keyword"),
            SearchMode::Semantic => write!(f, "semantic"),
            SearchMode::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Ranked results for one query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// The query as searched.
    pub query: String,
    /// Number of matches before truncation to the result cap.
    pub total_results: usize,
    /// Ranked results, at most `max_results`.
    pub results: Vec<SearchResult>,
}

/// Composes keyword, semantic, and hybrid search over a vector index.
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    reranker: Option<Reranker>,
    max_results: usize,
    min_similarity: f32,
}

impl Retriever {
    /// Create a retriever with default limits (15 results, 0.2 threshold).
    pub fn new(index: Arc<dyn VectorIndex>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            index,
            embedder,
            reranker: None,
            max_results: 15,
            min_similarity: 0.2,
        }
    }

    /// Enable a secondary re-ranking pass on semantic results.
    pub fn with_reranker(mut self, reranker: Reranker) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Set the maximum number of results returned.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the minimum similarity threshold for semantic matches.
    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    /// Search the index in the given mode.
    ///
    /// An embedding failure in semantic or hybrid mode surfaces as
    /// `ProviderUnavailable`; the request cannot honor its stated mode, so
    /// there is no silent fallback to keyword-only. Callers may retry in
    /// keyword mode explicitly.
    #[instrument(skip(self), fields(mode = %mode))]
    pub async fn search(&self, query: &str, mode: SearchMode) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FinnError::InvalidInput("search query is empty".to_string()));
        }

        match mode {
            SearchMode::Keyword => self.keyword_search(query).await,
            SearchMode::Semantic => self.semantic_search(query).await,
            SearchMode::Hybrid => self.hybrid_search(query).await,
        }
    }

    async fn keyword_search(&self, query: &str) -> Result<SearchResponse> {
        let mut matches = self.index.keyword_scan(query).await?;

        let total_results = matches.len();
        matches.truncate(self.max_results);

        debug!("Keyword search matched {} passages", total_results);

        Ok(SearchResponse {
            query: query.to_string(),
            total_results,
            results: matches,
        })
    }

    async fn semantic_search(&self, query: &str) -> Result<SearchResponse> {
        let embedding = self.embedder.embed(query).await?;

        let mut results = self
            .index
            .search(&embedding, self.max_results, self.min_similarity)
            .await?;

        if let Some(reranker) = &self.reranker {
            results = reranker.rerank(query, results).await;
        }

        Ok(SearchResponse {
            query: query.to_string(),
            total_results: results.len(),
            results,
        })
    }

    async fn hybrid_search(&self, query: &str) -> Result<SearchResponse> {
        let keyword = self.keyword_search(query).await?;
        let semantic = self.semantic_search(query).await?;

        // Union by id; the semantic score wins on conflict, keyword matches
        // only fill gaps.
        let mut merged = semantic.results;
        let seen: HashSet<String> = merged.iter().map(|r| r.id.clone()).collect();
        merged.extend(
            keyword
                .results
                .into_iter()
                .filter(|r| !seen.contains(&r.id)),
        );

        merged.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total_results = merged.len();
        merged.truncate(self.max_results);

        Ok(SearchResponse {
            query: query.to_string(),
            total_results,
            results: merged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::{MemoryVectorIndex, Metadata};
    use async_trait::async_trait;

    /// Deterministic embedder: maps known words onto fixed 3-d axes.
    struct StubEmbedder {
        fail: bool,
    }

    impl StubEmbedder {
        fn vector_for(text: &str) -> Vec<f32> {
            let text = text.to_lowercase();
            if text.contains("ownership") {
                vec![1.0, 0.0, 0.0]
            } else if text.contains("lifetimes") {
                vec![0.0, 1.0, 0.0]
            } else {
                vec![0.0, 0.0, 1.0]
            }
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if self.fail {
                return Err(FinnError::ProviderUnavailable("stub offline".to_string()));
            }
            Ok(Self::vector_for(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if self.fail {
                return Err(FinnError::ProviderUnavailable("stub offline".to_string()));
            }
            Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn meta(content: &str) -> Metadata {
        let mut m = Metadata::new();
        m.insert("content".to_string(), content.to_string());
        m.insert("source_id".to_string(), "talk1".to_string());
        m.insert("start_time".to_string(), "00:00".to_string());
        m.insert("end_time".to_string(), "01:00".to_string());
        m
    }

    async fn retriever(fail_embedder: bool) -> Retriever {
        let index = Arc::new(MemoryVectorIndex::new(3));
        index
            .insert(
                "talk1_0",
                vec![1.0, 0.0, 0.0],
                meta("ownership moves values between bindings"),
            )
            .await
            .unwrap();
        index
            .insert(
                "talk1_1",
                vec![0.0, 1.0, 0.0],
                meta("lifetimes annotate how long references live"),
            )
            .await
            .unwrap();
        index
            .insert(
                "talk1_2",
                vec![0.0, 0.0, 1.0],
                meta("closing remarks and questions"),
            )
            .await
            .unwrap();

        Retriever::new(index, Arc::new(StubEmbedder { fail: fail_embedder }))
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let retriever = retriever(false).await;
        for mode in [SearchMode::Keyword, SearchMode::Semantic, SearchMode::Hybrid] {
            let err = retriever.search("   ", mode).await.unwrap_err();
            assert!(matches!(err, FinnError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_keyword_search_flat_score() {
        let retriever = retriever(false).await;

        let response = retriever.search("Lifetimes", SearchMode::Keyword).await.unwrap();

        assert_eq!(response.total_results, 1);
        assert_eq!(response.results[0].id, "talk1_1");
        assert_eq!(response.results[0].similarity, 1.0);
    }

    #[tokio::test]
    async fn test_semantic_search_ranks_by_similarity() {
        let retriever = retriever(false).await;

        let response = retriever
            .search("tell me about ownership", SearchMode::Semantic)
            .await
            .unwrap();

        assert_eq!(response.results[0].id, "talk1_0");
        assert!(response.results[0].similarity > 0.9);
        // Orthogonal passages fall below the 0.2 threshold.
        assert_eq!(response.total_results, 1);
    }

    #[tokio::test]
    async fn test_semantic_surfaces_provider_failure() {
        let retriever = retriever(true).await;

        let err = retriever
            .search("ownership", SearchMode::Semantic)
            .await
            .unwrap_err();
        assert!(matches!(err, FinnError::ProviderUnavailable(_)));

        let err = retriever
            .search("ownership", SearchMode::Hybrid)
            .await
            .unwrap_err();
        assert!(matches!(err, FinnError::ProviderUnavailable(_)));

        // Keyword mode never embeds, so it still works.
        let response = retriever
            .search("ownership", SearchMode::Keyword)
            .await
            .unwrap();
        assert_eq!(response.total_results, 1);
    }

    #[tokio::test]
    async fn test_hybrid_merges_semantic_and_keyword() {
        let retriever = retriever(false).await;

        // "ownership" matches talk1_0 both semantically and by keyword;
        // "remarks" only by keyword. Query embeds to the ownership axis.
        let response = retriever
            .search("ownership remarks", SearchMode::Hybrid)
            .await
            .unwrap();

        let ids: Vec<&str> = response.results.iter().map(|r| r.id.as_str()).collect();
        // The keyword-only query string matches no single content field, so
        // the union is just the semantic hit here.
        assert!(ids.contains(&"talk1_0"));
    }

    #[tokio::test]
    async fn test_hybrid_semantic_score_wins_on_conflict() {
        let retriever = retriever(false).await;

        let response = retriever
            .search("ownership", SearchMode::Hybrid)
            .await
            .unwrap();

        // talk1_0 is both a keyword match (1.0) and a semantic match; the
        // semantic entry is inserted first and survives the merge.
        let hit = response
            .results
            .iter()
            .find(|r| r.id == "talk1_0")
            .expect("ownership passage present");
        assert!(hit.similarity > 0.99);
        assert_eq!(
            response
                .results
                .iter()
                .filter(|r| r.id == "talk1_0")
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_hybrid_keyword_fills_gaps() {
        let retriever = retriever(false).await;

        // Embeds to the "other" axis (talk1_2), while the keyword side
        // matches talk1_1 by substring.
        let response = retriever
            .search("how long references live", SearchMode::Hybrid)
            .await
            .unwrap();

        let ids: Vec<&str> = response.results.iter().map(|r| r.id.as_str()).collect();
        assert!(ids.contains(&"talk1_2"));
        assert!(ids.contains(&"talk1_1"));
        // Both score 1.0; the stable re-sort keeps the semantic hit first.
        assert_eq!(response.results[0].id, "talk1_2");
    }

    #[tokio::test]
    async fn test_results_capped_at_max() {
        let retriever = retriever(false).await.with_max_results(1);

        let response = retriever
            .search("how long references live", SearchMode::Hybrid)
            .await
            .unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.total_results, 2);
    }

    #[tokio::test]
    async fn test_search_mode_parsing() {
        assert_eq!("keyword".parse::<SearchMode>().unwrap(), SearchMode::Keyword);
        assert_eq!("SEMANTIC".parse::<SearchMode>().unwrap(), SearchMode::Semantic);
        assert_eq!("hybrid".parse::<SearchMode>().unwrap(), SearchMode::Hybrid);
        assert!("fuzzy".parse::<SearchMode>().is_err());
        assert_eq!(SearchMode::default(), SearchMode::Hybrid);
    }
}
