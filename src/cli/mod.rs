//! CLI module for Finn.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Finn - Transcript Chunking and Vector Retrieval
///
/// A local-first tool for indexing spoken-word transcripts and searching
/// them by keyword, meaning, or both. The name "Finn" comes from the
/// Norwegian word for "find."
#[derive(Parser, Debug)]
#[command(name = "finn")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Finn and write a default configuration
    Init,

    /// Chunk, embed, and index a transcript file
    Index {
        /// Transcript JSON file ({"text": ..., "segments": [...]})
        file: String,

        /// Source identifier for the transcript (defaults to the file stem)
        #[arg(short, long)]
        source_id: Option<String>,

        /// Human-readable title stored with each passage
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Search indexed passages
    Search {
        /// Search query
        query: String,

        /// Search mode (keyword, semantic, hybrid)
        #[arg(short, long, default_value = "hybrid")]
        mode: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Remove all passages indexed for a source
    Remove {
        /// Source identifier to evict
        source_id: String,
    },

    /// Show index statistics
    Stats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
