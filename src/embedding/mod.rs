//! Embedding generation for semantic retrieval.
//!
//! The only component here that blocks on network I/O; callers must never
//! invoke it while holding the index lock.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding providers.
///
/// Implementations must fail distinguishably (`ProviderUnavailable`) when
/// the backend is down, never silently return zeros.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Fixed output dimension of this embedder.
    fn dimensions(&self) -> usize;
}
