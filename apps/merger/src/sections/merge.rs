//! Section merge: collapses each heading's blocks into one final text.
//!
//! One distinct block is kept verbatim. Diverging blocks are joined and summarized;
//! text longer than the model's practical input is summarized in fixed-size chunks.

use tracing::{debug, info};

use crate::errors::MergeError;
use crate::llm_client::LlmError;
use crate::sections::{FinalSections, SectionMap};
use crate::summarizer::Summarizer;

/// Longest text, in characters, sent to the summarizer in one call.
pub const CHUNK_CHARS: usize = 2000;
/// Summary length bounds, in model tokens.
pub const SUMMARY_MIN_LENGTH: u32 = 40;
pub const SUMMARY_MAX_LENGTH: u32 = 150;

/// Result of merging every heading.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub sections: FinalSections,
    /// Number of headings whose content went through the summarizer.
    pub summarized: usize,
}

/// Produces one text block per heading.
///
/// Headings are processed in map order, one at a time; chunk summaries are requested
/// sequentially.
pub async fn merge_sections(
    all_sections: SectionMap,
    summarizer: &dyn Summarizer,
) -> Result<MergeOutcome, MergeError> {
    let mut outcome = MergeOutcome::default();

    for (heading, blocks) in all_sections {
        let mut unique = distinct(blocks);

        let text = if unique.len() == 1 {
            debug!("Section '{heading}': single distinct block, kept verbatim");
            unique.remove(0)
        } else {
            info!(
                "Section '{heading}': {} distinct blocks, summarizing with {}",
                unique.len(),
                summarizer.backend()
            );
            outcome.summarized += 1;
            summarize_combined(&unique.join("\n"), summarizer).await?
        };

        outcome.sections.insert(heading, text);
    }

    Ok(outcome)
}

/// Drops exact duplicates, keeping first occurrences in order.
fn distinct(blocks: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if !unique.contains(&block) {
            unique.push(block);
        }
    }
    unique
}

async fn summarize_combined(
    combined: &str,
    summarizer: &dyn Summarizer,
) -> Result<String, LlmError> {
    if combined.chars().count() <= CHUNK_CHARS {
        return summarizer
            .summarize(combined, SUMMARY_MIN_LENGTH, SUMMARY_MAX_LENGTH)
            .await;
    }

    let chunks = chunk_text(combined, CHUNK_CHARS);
    debug!("Summarizing {} chunks of up to {CHUNK_CHARS} chars", chunks.len());

    let mut summaries = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        summaries.push(
            summarizer
                .summarize(chunk, SUMMARY_MIN_LENGTH, SUMMARY_MAX_LENGTH)
                .await?,
        );
    }
    Ok(summaries.join(" "))
}

/// Splits `text` into consecutive slices of `size` characters (the last may be shorter).
/// Boundaries ignore words and sentences.
pub fn chunk_text(text: &str, size: usize) -> Vec<&str> {
    if size == 0 {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}
