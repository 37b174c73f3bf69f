//! Remove command implementation.

use super::open_index;
use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::VectorIndex;
use anyhow::Result;

/// Run the remove command: evict all passages for one source.
pub async fn run_remove(source_id: &str, settings: Settings) -> Result<()> {
    let index = open_index(&settings).await?;

    let removed = index.remove_by_metadata("source_id", source_id).await?;

    if removed == 0 {
        Output::warning(&format!("No passages indexed for '{}'", source_id));
        return Ok(());
    }

    index.snapshot(&settings.snapshot_path()).await?;
    Output::success(&format!("Removed {} passages for '{}'", removed, source_id));

    Ok(())
}
