//! Transcript chunking: splitting long transcripts into bounded,
//! overlapping passages anchored to source timestamps.

mod align;
mod recursive;

pub use align::{align_timestamps, format_timestamp};
pub use recursive::{ChunkerConfig, RecursiveChunker};

use serde::{Deserialize, Serialize};

/// A time-coded segment from the transcript source.
///
/// The atomic unit timestamp alignment works against. Segments are ordered
/// by start time and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedSegment {
    /// Text spoken during this segment.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TimedSegment {
    /// Create a new time-coded segment.
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// A bounded, timestamp-anchored passage of transcript text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Text content of this passage.
    pub content: String,
    /// Position within the source transcript (0-based, contiguous).
    pub index: usize,
    /// Best-effort start timestamp ("MM:SS" or "HH:MM:SS").
    pub start_time: String,
    /// Best-effort end timestamp (same format).
    pub end_time: String,
    /// Number of whitespace-delimited words in the content.
    pub word_count: usize,
}
