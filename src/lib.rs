//! Finn - Transcript Chunking and Vector Retrieval
//!
//! A local-first engine for splitting long-form spoken-word transcripts
//! into overlapping, timestamp-anchored passages and serving nearest
//! neighbor and hybrid retrieval over them.
//!
//! The name "Finn" comes from the Norwegian word for "find."
//!
//! # Overview
//!
//! Finn allows you to:
//! - Split transcripts into bounded, overlapping passages with best-effort
//!   source timestamps
//! - Embed passages and store them in an exact in-memory vector index
//! - Search by keyword, semantically, or both combined, with optional
//!   re-ranking
//! - Persist the index as a snapshot file and reload it at startup
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `chunking` - Recursive transcript segmentation and timestamp alignment
//! - `embedding` - Embedding generation
//! - `vector_store` - Flat vector index with snapshot persistence
//! - `retrieval` - Keyword/semantic/hybrid search and re-ranking
//! - `indexer` - Ingest pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use finn::embedding::OpenAIEmbedder;
//! use finn::indexer::Indexer;
//! use finn::retrieval::{Retriever, SearchMode};
//! use finn::vector_store::MemoryVectorIndex;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let index = Arc::new(MemoryVectorIndex::new(1536));
//!     let embedder = Arc::new(OpenAIEmbedder::new());
//!
//!     let indexer = Indexer::new(embedder.clone(), index.clone());
//!     indexer
//!         .index_transcript("talk42", "A Talk", "transcript text...", &[])
//!         .await?;
//!
//!     let retriever = Retriever::new(index, embedder);
//!     let response = retriever.search("what was said?", SearchMode::Hybrid).await?;
//!     println!("{} results", response.total_results);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod openai;
pub mod retrieval;
pub mod vector_store;

pub use error::{FinnError, Result};
