//! Fingerprinted chunks and the part-file layout
//!
//! Part file (lines joined by the format terminator, no trailing terminator):
//! ```text
//! 000001                               index, zero-padded
//! 000003                               count, zero-padded
//! 5d41402abc4b2a76b9719d911017c592     fingerprint of the wrapped body
//! -----------------------------------  boundary
//! <wrapped base64 body, 1..n lines>
//! -----------------------------------  boundary
//! ```
//!
//! The fingerprint covers the body lines joined by the terminator, so a file
//! written with one terminator only verifies when read with the same one.

use std::path::Path;
use tracing::debug;

use textpart_core::{PartFormat, TextpartError, TextpartResult};

use crate::fingerprint::fingerprint_bytes;

/// Minimum number of lines in a well-formed part file
const MIN_LINES: usize = 5;

/// An immutable slice of wrapped text and its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    content: String,
    fingerprint: String,
}

impl Chunk {
    /// Build a chunk from wrapped text, fingerprinting it.
    pub fn from_text(content: impl Into<String>) -> Self {
        let content = content.into();
        let fingerprint = fingerprint_bytes(content.as_bytes());
        Self {
            content,
            fingerprint,
        }
    }

    /// Build a chunk whose fingerprint was already verified by the caller.
    pub fn with_fingerprint(content: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            fingerprint: fingerprint.into(),
        }
    }

    /// The wrapped text, terminators included.
    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// The logical payload: wrapped text with every terminator removed.
    pub fn unwrapped(&self, format: &PartFormat) -> String {
        self.content.split(format.terminator.as_str()).collect()
    }

    /// Render the part file for position `index` of `count`.
    pub fn render(&self, index: u64, count: u64, format: &PartFormat) -> String {
        let index = format.format_index(index);
        let count = format.format_count(count);
        let boundary = format.boundary();
        [
            index.as_str(),
            count.as_str(),
            self.fingerprint.as_str(),
            boundary.as_str(),
            self.content.as_str(),
            boundary.as_str(),
        ]
        .join(format.terminator.as_str())
    }

    /// Read and verify a part file, keeping only the chunk.
    pub fn load(path: &Path, format: &PartFormat) -> TextpartResult<Self> {
        PartFile::load(path, format).map(|part| part.chunk)
    }
}

/// A verified part file: its header fields and chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartFile {
    pub index: u64,
    pub count: u64,
    pub chunk: Chunk,
}

impl PartFile {
    pub fn load(path: &Path, format: &PartFormat) -> TextpartResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => {
                TextpartError::format(path, "part is not valid UTF-8")
            }
            _ => TextpartError::io(path, e),
        })?;
        Self::parse(&text, path, format)
    }

    /// Parse part text. `path` is only used to label errors.
    pub fn parse(text: &str, path: &Path, format: &PartFormat) -> TextpartResult<Self> {
        let lines: Vec<&str> = text.split(format.terminator.as_str()).collect();
        if lines.len() < MIN_LINES {
            return Err(TextpartError::format(
                path,
                format!("expected at least {MIN_LINES} lines, found {}", lines.len()),
            ));
        }

        let last = lines.len() - 1;
        let expected = lines[2];
        for boundary in [lines[3], lines[last]] {
            if !is_boundary(boundary) {
                return Err(TextpartError::format(
                    path,
                    format!("unexpected boundary \"{boundary}\""),
                ));
            }
        }

        let body = lines[4..last].join(format.terminator.as_str());
        let actual = fingerprint_bytes(body.as_bytes());
        if actual != expected {
            return Err(TextpartError::FingerprintMismatch {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }

        let index = parse_field(lines[0], "index", path)?;
        let count = parse_field(lines[1], "count", path)?;
        debug!(path = %path.display(), index, count, lines = last - 4, "part verified");

        Ok(Self {
            index,
            count,
            chunk: Chunk::with_fingerprint(body, actual),
        })
    }
}

fn is_boundary(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b == b'-')
}

fn parse_field(line: &str, name: &str, path: &Path) -> TextpartResult<u64> {
    if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TextpartError::format(
            path,
            format!("{name} field \"{line}\" is not a number"),
        ));
    }
    line.parse()
        .map_err(|e| TextpartError::format(path, format!("{name} field \"{line}\": {e}")))
}
