//! Configuration settings for Finn.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
    pub retrieval: RetrievalSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.finn".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Transcript chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Upper bound in characters before a split is attempted.
    pub target_size: usize,
    /// Characters carried into the next passage's start.
    pub overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            target_size: 1000,
            overlap: 200,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Secondary model for re-ranking. None disables the re-rank pass.
    pub rerank_model: Option<String>,
    /// Request timeout in seconds for embedding calls.
    pub timeout_seconds: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            rerank_model: None,
            timeout_seconds: 300,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Path to the JSON snapshot file.
    pub snapshot_path: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            snapshot_path: "~/.finn/index.json".to_string(),
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Maximum number of results returned per query.
    pub max_results: usize,
    /// Minimum cosine similarity for semantic matches.
    pub min_similarity: f32,
    /// Truncation boundary for candidate content during re-ranking.
    pub rerank_max_chars: usize,
    /// Concurrent embedding calls during re-ranking.
    pub rerank_concurrency: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            max_results: 15,
            min_similarity: 0.2,
            rerank_max_chars: 8192,
            rerank_concurrency: 4,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or the default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::FinnError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("finn")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded snapshot file path.
    pub fn snapshot_path(&self) -> PathBuf {
        Self::expand_path(&self.index.snapshot_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_policy() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.target_size, 1000);
        assert_eq!(settings.chunking.overlap, 200);
        assert_eq!(settings.embedding.dimensions, 1536);
        assert_eq!(settings.retrieval.max_results, 15);
        assert!((settings.retrieval.min_similarity - 0.2).abs() < f32::EPSILON);
        assert!(settings.embedding.rerank_model.is_none());
    }

    #[test]
    fn test_partial_toml_round_trip() {
        let toml_src = r#"
            [chunking]
            target_size = 500

            [embedding]
            rerank_model = "text-embedding-3-small"
        "#;

        let settings: Settings = toml::from_str(toml_src).unwrap();
        assert_eq!(settings.chunking.target_size, 500);
        assert_eq!(settings.chunking.overlap, 200);
        assert_eq!(
            settings.embedding.rerank_model.as_deref(),
            Some("text-embedding-3-small")
        );

        let serialized = toml::to_string_pretty(&settings).unwrap();
        let reparsed: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.chunking.target_size, 500);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.retrieval.max_results = 25;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.retrieval.max_results, 25);
    }
}
