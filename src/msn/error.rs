use std::path::{Path, PathBuf};

/// Errors that can occur during MS1/MS2 parsing
#[derive(Debug, thiserror::Error)]
pub enum MsnError {
    /// The input file could not be opened
    #[error("Failed to open {}: {source}", .path.display())]
    OpenError {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// I/O error while reading lines
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A record line does not match the expected field layout
    #[error("{file}:{line_number}: malformed '{tag}' record ({reason}): {line}")]
    FormatError {
        /// File name, or `<stream>` for anonymous readers
        file: String,
        /// 1-based line number
        line_number: usize,
        /// Leading tag character of the offending line
        tag: char,
        /// What was wrong with the line
        reason: String,
        /// The raw line content
        line: String,
    },
}

impl MsnError {
    pub(super) fn open(path: &Path, source: std::io::Error) -> Self {
        MsnError::OpenError {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for errors caused by malformed content rather than I/O
    pub fn is_format_error(&self) -> bool {
        matches!(self, MsnError::FormatError { .. })
    }
}
