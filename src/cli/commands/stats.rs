//! Stats command implementation.

use super::open_index;
use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::VectorIndex;
use anyhow::Result;

/// Run the stats command.
pub async fn run_stats(settings: Settings) -> Result<()> {
    let index = open_index(&settings).await?;
    let stats = index.stats().await?;

    Output::info("Index statistics");
    Output::kv("Vectors", &stats.total_vectors.to_string());
    Output::kv("Dimension", &stats.dimension.to_string());
    Output::kv("Sources", &stats.sources.to_string());
    Output::kv("Memory", &format!("{:.2} MB", stats.memory_usage_mb));
    Output::kv(
        "Snapshot",
        &settings.snapshot_path().display().to_string(),
    );

    Ok(())
}
