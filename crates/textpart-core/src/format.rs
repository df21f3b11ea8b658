//! Part-file layout parameters
//!
//! Every component that wraps, hashes, renders, or parses part text takes a
//! `PartFormat`. Encoder and decoder must agree on it for a series to
//! round-trip.

use serde::{Deserialize, Serialize};

use crate::error::{TextpartError, TextpartResult};

/// Length of the hex fingerprint line (MD5 digest, 16 bytes)
pub const FINGERPRINT_LEN: usize = 32;

/// Number of header separators: index, count, fingerprint, boundary
const HEADER_SEPARATORS: usize = 4;

/// Digits in `u64::MAX`; wider header fields are pure padding
pub const MAX_FIELD_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartFormat {
    /// Width of the zero-padded index line (default: 6)
    pub index_width: usize,
    /// Width of the zero-padded count line (default: 6)
    pub count_width: usize,
    /// Physical line width including the terminator (default: 60)
    pub line_width: usize,
    /// Line terminator used for wrapping, hashing and joining (default: "\n")
    pub terminator: String,
}

impl Default for PartFormat {
    fn default() -> Self {
        Self {
            index_width: 6,
            count_width: 6,
            line_width: 60,
            terminator: "\n".into(),
        }
    }
}

impl PartFormat {
    /// Check the parameters describe a usable layout.
    pub fn validate(&self) -> TextpartResult<()> {
        if self.terminator.is_empty() {
            return Err(TextpartError::Config("line terminator must not be empty".into()));
        }
        if !self.terminator.chars().all(|c| c == '\n' || c == '\r') {
            return Err(TextpartError::Config(format!(
                "line terminator must only contain CR/LF characters, got {:?}",
                self.terminator
            )));
        }
        if self.line_width <= self.terminator.len() {
            return Err(TextpartError::Config(format!(
                "the line width must be greater than {} (got {})",
                self.terminator.len(),
                self.line_width
            )));
        }
        if self.index_width == 0 || self.count_width == 0 {
            return Err(TextpartError::Config(
                "index and count field widths must be at least 1".into(),
            ));
        }
        if self.index_width > MAX_FIELD_WIDTH || self.count_width > MAX_FIELD_WIDTH {
            return Err(TextpartError::Config(format!(
                "index and count field widths must be at most {MAX_FIELD_WIDTH}"
            )));
        }
        if self.checked_min_max_char().is_none() {
            return Err(TextpartError::Config(format!(
                "line width {} makes the per-part overhead overflow",
                self.line_width
            )));
        }
        Ok(())
    }

    fn checked_header_len(&self) -> Option<usize> {
        self.index_width
            .checked_add(self.count_width)?
            .checked_add(FINGERPRINT_LEN)?
            .checked_add(self.content_width())?
            .checked_add(HEADER_SEPARATORS.checked_mul(self.terminator.len())?)
    }

    fn checked_overhead(&self) -> Option<usize> {
        self.checked_header_len()?.checked_add(self.footer_len())
    }

    fn checked_min_max_char(&self) -> Option<usize> {
        self.checked_overhead()?
            .checked_add(self.terminator.len())?
            .checked_add(1)
    }

    /// Content characters per wrapped line.
    pub fn content_width(&self) -> usize {
        self.line_width.saturating_sub(self.terminator.len())
    }

    /// A boundary line as written by the encoder.
    pub fn boundary(&self) -> String {
        "-".repeat(self.content_width())
    }

    /// Characters before the body: four fields plus their separators.
    ///
    /// Saturates at `usize::MAX` for layouts `validate` rejects.
    pub fn header_len(&self) -> usize {
        self.checked_header_len().unwrap_or(usize::MAX)
    }

    /// Characters of the closing boundary.
    pub fn footer_len(&self) -> usize {
        self.content_width()
    }

    /// Fixed per-part overhead, excluding the separator after the body.
    pub fn overhead(&self) -> usize {
        self.checked_overhead().unwrap_or(usize::MAX)
    }

    /// Smallest part budget that still leaves room for one body character.
    pub fn min_max_char(&self) -> usize {
        self.checked_min_max_char().unwrap_or(usize::MAX)
    }

    /// Body budget per part for a given maximum part size.
    pub fn chunk_budget(&self, max_char: usize) -> TextpartResult<usize> {
        let floor = self.checked_min_max_char().ok_or_else(|| {
            TextpartError::Config("per-part overhead overflows usize".into())
        })?;
        if max_char < floor {
            return Err(TextpartError::Config(format!(
                "the maximum number of characters per part must be at least {floor} (got {max_char})"
            )));
        }
        Ok(max_char - (floor - 1))
    }

    /// Whether `count` fits in both zero-padded header fields.
    pub fn fits_count(&self, count: u64) -> bool {
        let digits = count.to_string().len();
        digits <= self.index_width && digits <= self.count_width
    }

    pub fn format_index(&self, index: u64) -> String {
        format!("{index:0width$}", width = self.index_width)
    }

    pub fn format_count(&self, count: u64) -> String {
        format!("{count:0width$}", width = self.count_width)
    }
}
