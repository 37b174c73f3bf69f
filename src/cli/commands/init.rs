//! Init command implementation.

use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the init command: write a default configuration and create the
/// data directory.
pub fn run_init(settings: &Settings) -> Result<()> {
    let config_path = Settings::default_config_path();

    if config_path.exists() {
        Output::info(&format!(
            "Configuration already exists at {}",
            config_path.display()
        ));
    } else {
        settings.save()?;
        Output::success(&format!(
            "Wrote default configuration to {}",
            config_path.display()
        ));
    }

    std::fs::create_dir_all(settings.data_dir())?;
    Output::kv("Data directory", &settings.data_dir().display().to_string());
    Output::kv(
        "Index snapshot",
        &settings.snapshot_path().display().to_string(),
    );

    Ok(())
}
