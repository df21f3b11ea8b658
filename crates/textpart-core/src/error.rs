use std::path::{Path, PathBuf};
use thiserror::Error;

pub type TextpartResult<T> = Result<T, TextpartError>;

#[derive(Debug, Error)]
pub enum TextpartError {
    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid part {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error(
        "invalid part {}: fingerprints don't match (stored {expected}, computed {actual})",
        path.display()
    )]
    FingerprintMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("invalid part id: {0}")]
    InvalidId(String),

    #[error("cannot compare \"{left}\" with \"{right}\": parts belong to different series")]
    Comparison { left: String, right: String },

    #[error("duplicate part index {index}: {} and {}", first.display(), second.display())]
    DuplicateIndex {
        index: u64,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("missing part {index} of {count}")]
    MissingPart { index: u64, count: u64 },
}

impl TextpartError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        TextpartError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn format(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        TextpartError::Format {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }
}
