//! Prompt context formatting.
//!
//! Turns search results into a numbered context block with source citations,
//! capped at a maximum character budget.

use super::store::ChunkSearchResult;

/// Format retrieved chunks into a context string.
///
/// Chunks are emitted in rank order until adding another would exceed
/// `max_chars`.
pub fn format_context(results: &[ChunkSearchResult], max_chars: usize) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut context = String::new();
    let mut used = 0;

    for (i, result) in results.iter().enumerate() {
        let header = format!(
            "[{}] (source: {}, score: {:.2})\n",
            i + 1,
            result.chunk.source,
            result.score
        );
        let addition = header.chars().count() + result.chunk.content.chars().count() + 2;
        if used + addition > max_chars {
            break;
        }

        context.push_str(&header);
        context.push_str(&result.chunk.content);
        context.push_str("\n\n");
        used += addition;
    }

    context.trim_end().to_string()
}

/// Distinct sources among the results, sorted.
pub fn sources(results: &[ChunkSearchResult]) -> Vec<String> {
    let mut sources: Vec<String> = results.iter().map(|r| r.chunk.source.clone()).collect();
    sources.sort();
    sources.dedup();
    sources
}
