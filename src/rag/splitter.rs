//! Overlapping text chunker.
//!
//! Splits a document blob into chunks of at most `chunk_size` characters
//! with `chunk_overlap` characters shared between adjacent chunks. Chunk
//! boundaries prefer, in order, a paragraph break, a sentence end, then a
//! plain space near the end of the size window; only when none is present
//! does the splitter cut mid-word. Deterministic for a given input and
//! configuration.

use serde::{Deserialize, Serialize};

/// Boundary separators in priority order.
const SEPARATORS: [char; 3] = ['\n', '.', ' '];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters.
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 700,
            chunk_overlap: 100,
        }
    }
}

/// A text chunk with source information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// The text content.
    pub text: String,
    /// Source identifier (file name).
    pub source: String,
    /// Character offset in the original document.
    pub start_offset: usize,
    /// Chunk index within the source.
    pub chunk_index: usize,
}

pub struct RecursiveSplitter {
    config: SplitterConfig,
}

impl RecursiveSplitter {
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Split `text` into overlapping chunks attributed to `source`.
    pub fn split(&self, text: &str, source: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        if total == 0 {
            return Vec::new();
        }

        let size = self.config.chunk_size.max(1);
        let overlap = self.config.chunk_overlap.min(size.saturating_sub(1));

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        while start < total {
            let hard_end = (start + size).min(total);
            let end = if hard_end < total {
                find_boundary(&chars, start, hard_end)
            } else {
                hard_end
            };

            let chunk_text: String = chars[start..end].iter().collect();
            let trimmed = chunk_text.trim();
            if !trimmed.is_empty() {
                chunks.push(TextChunk {
                    text: trimmed.to_string(),
                    source: source.to_string(),
                    start_offset: start,
                    chunk_index,
                });
                chunk_index += 1;
            }

            if end >= total {
                break;
            }
            start = end.saturating_sub(overlap).max(start + 1);
        }

        chunks
    }
}

/// Find a cut point at or before `hard_end`, preferring the highest-priority
/// separator in the latter half of the window. Returns the index one past the
/// separator so it stays with the preceding chunk.
fn find_boundary(chars: &[char], start: usize, hard_end: usize) -> usize {
    let floor = start + (hard_end - start) / 2;

    for sep in SEPARATORS {
        let mut i = hard_end;
        while i > floor {
            i -= 1;
            if chars[i] == sep {
                return i + 1;
            }
        }
    }

    hard_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> RecursiveSplitter {
        RecursiveSplitter::new(SplitterConfig {
            chunk_size,
            chunk_overlap,
        })
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(splitter(700, 100).split("", "doc").is_empty());
    }

    #[test]
    fn short_input_is_a_single_chunk() {
        let chunks = splitter(700, 100).split("hello world", "doc");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello world");
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[0].chunk_index, 0);
    }

    #[test]
    fn splitting_is_deterministic() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let a = splitter(700, 100).split(&text, "doc");
        let b = splitter(700, 100).split(&text, "doc");
        assert_eq!(a, b);
        assert!(a.len() > 1);
    }

    #[test]
    fn every_chunk_respects_the_size_limit() {
        let text = "Sentence one. Sentence two. Sentence three. ".repeat(60);
        let chunks = splitter(700, 100).split(&text, "doc");

        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 700);
        }
    }

    #[test]
    fn adjacent_chunks_overlap_by_the_configured_amount() {
        // No separators, so boundaries are hard cuts and the overlap is exact.
        let text = "a".repeat(2000);
        let chunks = splitter(700, 100).split(&text, "doc");

        assert_eq!(chunks.len(), 4);
        for pair in chunks.windows(2) {
            let prev_end = pair[0].start_offset + pair[0].text.chars().count();
            assert_eq!(pair[1].start_offset, prev_end - 100);
        }

        let last = chunks.last().unwrap();
        assert_eq!(last.start_offset + last.text.chars().count(), 2000);
    }

    #[test]
    fn chunks_cover_the_whole_source() {
        let text = "word ".repeat(500);
        let chunks = splitter(700, 100).split(&text, "doc");

        let mut covered = 0;
        for chunk in &chunks {
            assert!(chunk.start_offset <= covered, "gap before {}", chunk.start_offset);
            covered = covered.max(chunk.start_offset + 700);
        }
        assert!(covered >= text.trim_end().chars().count());
    }

    #[test]
    fn prefers_paragraph_breaks_over_sentence_ends() {
        let mut text = "x".repeat(300);
        text.push('\n');
        text.push_str(&"y. ".repeat(100));
        let chunks = splitter(400, 50).split(&text, "doc");

        // The first boundary lands right after the newline at offset 300.
        assert_eq!(chunks[1].start_offset, 301 - 50);
    }

    #[test]
    fn falls_back_to_sentence_end_then_space() {
        let text = format!("{}. {}", "a".repeat(200), "b".repeat(400));
        let chunks = splitter(300, 0).split(&text, "doc");
        assert!(chunks[0].text.ends_with('.'));
    }

    #[test]
    fn chunk_indices_are_sequential_per_source() {
        let text = "token ".repeat(300);
        let chunks = splitter(200, 40).split(&text, "doc");
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i);
            assert_eq!(chunk.source, "doc");
        }
    }
}
