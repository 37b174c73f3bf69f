//! Recursive separator-aware text splitter.
//!
//! Tries separators from coarsest (paragraph breaks) to finest (single
//! spaces) and greedily packs the resulting units into passages bounded by
//! a target size, carrying an overlap tail into each successor so context
//! survives split boundaries.

use super::{align_timestamps, Passage, TimedSegment};
use crate::error::{FinnError, Result};

/// Configuration for the recursive chunker.
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Upper bound in characters before a split is attempted.
    pub target_size: usize,
    /// Characters carried into the next passage's start.
    pub overlap: usize,
    /// Separators tried in order, coarsest first.
    pub separators: Vec<String>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            target_size: 1000,
            overlap: 200,
            separators: ["\n\n", "\n", ". ", "? ", "! ", " "]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Recursive, separator-aware transcript chunker.
pub struct RecursiveChunker {
    config: ChunkerConfig,
}

impl RecursiveChunker {
    /// Create a chunker with the default policy (1000 chars, 200 overlap).
    pub fn new() -> Self {
        Self::with_config(ChunkerConfig::default())
    }

    /// Create a chunker with a custom configuration.
    pub fn with_config(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Split transcript text into timestamped passages.
    ///
    /// `segments` may be empty; timestamp alignment then degrades to
    /// `"00:00"` for every passage. Empty text is an error.
    pub fn chunk(&self, text: &str, segments: &[TimedSegment]) -> Result<Vec<Passage>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FinnError::InvalidInput(
                "transcript text is empty".to_string(),
            ));
        }

        let pieces = self.split_recursive(text);

        let passages = pieces
            .into_iter()
            .enumerate()
            .map(|(index, content)| {
                let (start_time, end_time) = align_timestamps(&content, segments);
                let word_count = content.split_whitespace().count();
                Passage {
                    content,
                    index,
                    start_time,
                    end_time,
                    word_count,
                }
            })
            .collect();

        Ok(passages)
    }

    /// Recursively split text using the separator priority list.
    fn split_recursive(&self, text: &str) -> Vec<String> {
        if char_len(text) <= self.config.target_size {
            return vec![text.to_string()];
        }

        for separator in &self.config.separators {
            if text.contains(separator.as_str()) {
                return self.split_with_separator(text, separator);
            }
        }

        // No separator occurs anywhere in the text.
        self.split_by_chars(text)
    }

    /// Greedily accumulate separator-delimited units into passages.
    fn split_with_separator(&self, text: &str, separator: &str) -> Vec<String> {
        let target = self.config.target_size;
        let sep_len = char_len(separator);

        let mut chunks = Vec::new();
        let mut current = String::new();

        for unit in text.split(separator) {
            if char_len(&current) + char_len(unit) + sep_len > target {
                if !current.is_empty() {
                    chunks.push(current.trim().to_string());
                    // Seed the next passage with the overlap tail.
                    let overlap = self.overlap_text(&current);
                    current = format!("{}{}", overlap, unit);
                } else {
                    // A single unit exceeds the target; re-chunk it with
                    // the same separator list.
                    let mut sub = self.split_recursive(unit);
                    current = sub.pop().unwrap_or_default();
                    chunks.append(&mut sub);
                }
            } else if current.is_empty() {
                current = unit.to_string();
            } else {
                current.push_str(separator);
                current.push_str(unit);
            }
        }

        if !current.is_empty() {
            chunks.push(current.trim().to_string());
        }

        chunks
    }

    /// The last `overlap` characters of a closed passage, trimmed to a word
    /// boundary by dropping a leading partial word.
    fn overlap_text(&self, text: &str) -> String {
        let overlap = self.config.overlap;

        if char_len(text) <= overlap {
            return format!("{} ", text);
        }

        let tail = tail_chars(text, overlap);
        let words: Vec<&str> = tail.split(' ').collect();

        let overlap_text = if words.len() > 1 {
            words[1..].join(" ")
        } else {
            tail.to_string()
        };

        if overlap_text.is_empty() {
            String::new()
        } else {
            format!("{} ", overlap_text)
        }
    }

    /// Fixed-width character slicing fallback when no separator exists.
    ///
    /// Slides the window by `target_size - overlap`, snapping each window
    /// end backward to the nearest preceding space when one exists past the
    /// window start.
    fn split_by_chars(&self, text: &str) -> Vec<String> {
        let target = self.config.target_size;
        let overlap = self.config.overlap;
        let total = char_len(text);

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < total {
            let mut end = start + target;

            if end >= total {
                chunks.push(slice_chars(text, start, total).to_string());
                break;
            }

            let window = slice_chars(text, start, end);
            if let Some(byte_pos) = window.rfind(' ') {
                let offset = window[..byte_pos].chars().count();
                if offset > 0 {
                    end = start + offset;
                }
            }

            chunks.push(slice_chars(text, start, end).to_string());
            start = if end > overlap && end - overlap > start {
                end - overlap
            } else {
                end
            };
        }

        chunks
    }
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Length in characters, not bytes. Transcripts are frequently non-ASCII.
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Slice by character offsets, safe on multi-byte content.
fn slice_chars(s: &str, start: usize, end: usize) -> &str {
    let begin = byte_offset(s, start);
    let finish = byte_offset(s, end);
    &s[begin..finish]
}

/// The last `n` characters of `s`.
fn tail_chars(s: &str, n: usize) -> &str {
    let total = char_len(s);
    slice_chars(s, total.saturating_sub(n), total)
}

fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker() -> RecursiveChunker {
        RecursiveChunker::new()
    }

    #[test]
    fn test_short_text_single_passage() {
        let passages = chunker().chunk("one. two. three.", &[]).unwrap();

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].content, "one. two. three.");
        assert_eq!(passages[0].index, 0);
        assert_eq!(passages[0].start_time, "00:00");
        assert_eq!(passages[0].end_time, "00:00");
        assert_eq!(passages[0].word_count, 3);
    }

    #[test]
    fn test_empty_text_is_an_error() {
        assert!(chunker().chunk("", &[]).is_err());
        assert!(chunker().chunk("   \n  ", &[]).is_err());
    }

    #[test]
    fn test_long_text_respects_target_size() {
        let text = (0..200)
            .map(|i| format!("Sentence number {} talks about something. ", i))
            .collect::<String>();

        let passages = chunker().chunk(&text, &[]).unwrap();

        assert!(passages.len() > 1);
        for passage in &passages {
            assert!(
                passage.content.chars().count() <= 1000 + 50,
                "passage too large: {} chars",
                passage.content.chars().count()
            );
        }
        // Indices are contiguous from zero.
        for (i, passage) in passages.iter().enumerate() {
            assert_eq!(passage.index, i);
        }
    }

    #[test]
    fn test_adjacent_passages_share_overlap() {
        let text = (0..200)
            .map(|i| format!("Sentence number {} talks about something. ", i))
            .collect::<String>();

        let passages = chunker().chunk(&text, &[]).unwrap();
        assert!(passages.len() > 1);

        for pair in passages.windows(2) {
            let head: String = pair[1].content.chars().take(30).collect();
            assert!(
                pair[0].content.contains(head.trim()),
                "no shared overlap between adjacent passages"
            );
        }
    }

    #[test]
    fn test_paragraph_separator_preferred() {
        let para = "word ".repeat(120);
        let text = format!("{}\n\n{}", para.trim(), para.trim());

        let passages = chunker().chunk(&text, &[]).unwrap();

        assert_eq!(passages.len(), 2);
        assert!(!passages[0].content.contains("\n\n"));
    }

    #[test]
    fn test_fallback_slicing_without_separators() {
        // No configured separator appears at all.
        let text = "x".repeat(2500);

        let passages = chunker().chunk(&text, &[]).unwrap();

        assert!(passages.len() >= 3);
        for passage in &passages {
            assert!(passage.content.chars().count() <= 1000);
        }
    }

    #[test]
    fn test_fallback_snaps_to_space() {
        let word = "abcdefghi ".repeat(300); // spaces only, no other separator
        let config = ChunkerConfig {
            separators: vec![],
            ..ChunkerConfig::default()
        };
        let chunker = RecursiveChunker::with_config(config);

        let passages = chunker.chunk(&word, &[]).unwrap();
        assert!(passages.len() > 1);
        // Window ends snapped backward to a space, so no word is cut.
        for passage in passages.iter().take(passages.len() - 1) {
            assert!(passage.content.ends_with("abcdefghi"));
        }
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let text = "ordbok æøå på norsk. ".repeat(200);
        let passages = chunker().chunk(&text, &[]).unwrap();
        assert!(passages.len() > 1);
    }

    #[test]
    fn test_timestamps_aligned_from_segments() {
        let segments = vec![
            TimedSegment::new("hello there everyone welcome back to the show", 0.0, 5.0),
            TimedSegment::new("today we are talking about rust", 5.0, 5.0),
        ];

        let passages = chunker()
            .chunk("hello there everyone welcome back to the show", &segments)
            .unwrap();

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].start_time, "00:00");
        // Last five words also land in the first segment.
        assert_eq!(passages[0].end_time, "00:05");
    }
}
