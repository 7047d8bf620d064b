//! Merge pipeline: orchestrates one run.
//!
//! Flow: find_documents → load + extract each file, folded into one section map →
//!       merge_sections (dedupe / summarize) → write_sections.
//!
//! Everything runs sequentially; the only inputs are the arguments and the filesystem.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::discovery::find_documents;
use crate::document::{load_document, write_sections};
use crate::errors::MergeError;
use crate::sections::{absorb, extract_sections, merge_sections, SectionMap};
use crate::summarizer::Summarizer;

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub files: usize,
    pub headings: usize,
    pub summarized: usize,
    pub output: PathBuf,
}

/// Merges every document in `input_dir` into one document at `output_file`.
pub async fn run(
    input_dir: &Path,
    output_file: &Path,
    summarizer: &dyn Summarizer,
) -> Result<MergeReport, MergeError> {
    let files = find_documents(input_dir)?;
    info!("Found {} documents in {}", files.len(), input_dir.display());

    let all_sections = collect_sections(&files)?;
    let outcome = merge_sections(all_sections, summarizer).await?;
    write_sections(&outcome.sections, output_file)?;

    Ok(MergeReport {
        files: files.len(),
        headings: outcome.sections.len(),
        summarized: outcome.summarized,
        output: output_file.to_path_buf(),
    })
}

/// Loads each file and folds its sections into a single map, in file order.
pub fn collect_sections(files: &[PathBuf]) -> Result<SectionMap, MergeError> {
    files.iter().try_fold(SectionMap::new(), |acc, path| {
        let document = load_document(path)?;
        let sections = extract_sections(&document);
        debug!("{}: {} sections", path.display(), sections.len());
        Ok(absorb(acc, sections))
    })
}
