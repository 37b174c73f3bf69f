//! Timestamp alignment between passages and time-coded segments.
//!
//! A heuristic, not an exact mapping: passage boundaries and segment
//! boundaries never line up exactly, so we look for the passage's first
//! (and last) five words as a substring of a segment's text. A repeated
//! phrase can mis-align to its first occurrence; the alternative is a full
//! alignment pass that doesn't pay for itself at transcript scale.

use super::TimedSegment;

/// Find best-effort start and end timestamps for a passage.
///
/// Returns `("00:00", "00:00")` when no match is found or `segments` is
/// empty; alignment failure is never an error.
pub fn align_timestamps(content: &str, segments: &[TimedSegment]) -> (String, String) {
    const PHRASE_WORDS: usize = 5;

    if segments.is_empty() {
        return ("00:00".to_string(), "00:00".to_string());
    }

    let words: Vec<&str> = content.split_whitespace().collect();

    let head_phrase = words
        .iter()
        .take(PHRASE_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut start_time = None;
    for segment in segments {
        if segment.text.to_lowercase().contains(&head_phrase) {
            start_time = Some(format_timestamp(segment.start));
            break;
        }
    }

    // Only look for the end once the start matched; an unanchored passage
    // gets the default for both boundaries.
    let mut end_time = None;
    if start_time.is_some() {
        let tail_phrase = words[words.len().saturating_sub(PHRASE_WORDS)..]
            .join(" ")
            .to_lowercase();

        for segment in segments {
            if segment.text.to_lowercase().contains(&tail_phrase) {
                end_time = Some(format_timestamp(segment.start + segment.duration));
                break;
            }
        }
    }

    (
        start_time.unwrap_or_else(|| "00:00".to_string()),
        end_time.unwrap_or_else(|| "00:00".to_string()),
    )
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` at one hour and beyond.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
