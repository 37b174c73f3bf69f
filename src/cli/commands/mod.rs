//! CLI command implementations.

mod config;
mod index;
mod init;
mod remove;
mod search;
mod stats;

pub use config::run_config;
pub use index::run_index;
pub use init::run_init;
pub use remove::run_remove;
pub use search::run_search;
pub use stats::run_stats;

use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::vector_store::{MemoryVectorIndex, VectorIndex};
use std::sync::Arc;
use std::time::Duration;

/// Build the primary embedder configured in settings.
fn build_embedder(settings: &Settings) -> Arc<OpenAIEmbedder> {
    Arc::new(OpenAIEmbedder::with_timeout(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
        Duration::from_secs(settings.embedding.timeout_seconds),
    ))
}

/// Open the vector index, loading the snapshot when one exists.
async fn open_index(settings: &Settings) -> crate::error::Result<Arc<MemoryVectorIndex>> {
    let index = Arc::new(MemoryVectorIndex::new(
        settings.embedding.dimensions as usize,
    ));
    index.restore(&settings.snapshot_path()).await?;
    Ok(index)
}
