//! File discovery: lists the documents a run will merge.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::MergeError;

/// File-name suffix of the only supported document format. Compared case-insensitively.
pub const DOCUMENT_SUFFIX: &str = ".docx";

/// Returns every entry directly inside `dir` whose name ends in `.docx` (any case).
///
/// Not recursive. Order follows the directory listing. A missing or unreadable
/// directory is an error.
pub fn find_documents(dir: &Path) -> Result<Vec<PathBuf>, MergeError> {
    let entries = std::fs::read_dir(dir).map_err(|e| MergeError::io(dir, e))?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MergeError::io(dir, e))?;
        let path = entry.path();
        if has_document_extension(&path) {
            debug!("Discovered document {}", path.display());
            documents.push(path);
        }
    }

    Ok(documents)
}

// Suffix match on the whole name, so a bare `.docx` counts too.
fn has_document_extension(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().to_lowercase().ends_with(DOCUMENT_SUFFIX))
}
