use std::path::PathBuf;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Pipeline-level error type.
/// Every stage (discovery, reading, summarizing, writing) reports through this enum;
/// `main` surfaces it via `anyhow` and exits non-zero.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a readable document container {}: {source}", path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Malformed XML in {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Malformed XML attribute in {}: {source}", path.display())]
    XmlAttr {
        path: PathBuf,
        #[source]
        source: quick_xml::events::attributes::AttrError,
    },

    #[error("Invalid document {}: {reason}", path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("Summarizer error: {0}")]
    Summarizer(#[from] LlmError),
}

impl MergeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MergeError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = MergeError::io(
            "/tmp/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing"), "got: {msg}");
        assert!(msg.contains("gone"), "got: {msg}");
    }

    #[test]
    fn test_summarizer_error_converts() {
        let err: MergeError = LlmError::EmptyContent.into();
        assert!(matches!(err, MergeError::Summarizer(LlmError::EmptyContent)));
    }
}
