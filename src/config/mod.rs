//! Configuration management for Finn.

mod settings;

pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, IndexSettings, RetrievalSettings,
    Settings,
};
