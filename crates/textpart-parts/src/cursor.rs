//! Incremental fixed-width line wrapping
//!
//! The cursor holds a flat ASCII document (base64 text) and hands it out in
//! budgeted slices, inserting the terminator every `content_width` content
//! characters. Terminators count against the caller's budget but never
//! against `remaining()`.

use textpart_core::PartFormat;

#[derive(Debug, Clone)]
pub struct LineWrappingCursor {
    text: String,
    pos: usize,
    content_width: usize,
    terminator: String,
}

impl LineWrappingCursor {
    /// Create a cursor over ASCII `text`. `format` must already be validated.
    ///
    /// # Panics
    ///
    /// Panics if `text` contains non-ASCII characters. Slices are cut at
    /// arbitrary byte offsets, so multi-byte characters cannot be wrapped.
    pub fn new(text: impl Into<String>, format: &PartFormat) -> Self {
        let text = text.into();
        assert!(text.is_ascii(), "cursor input must be ASCII");
        Self {
            text,
            pos: 0,
            content_width: format.content_width(),
            terminator: format.terminator.clone(),
        }
    }

    /// Take up to `n` characters (content plus inserted terminators).
    ///
    /// Each call starts a fresh line. A terminator is only emitted when more
    /// content follows and the whole terminator fits in the budget, so a slice
    /// never exceeds `n` and ends in a terminator only when the budget runs out
    /// exactly after one. Returns an empty string once the buffer is exhausted.
    pub fn take(&mut self, n: usize) -> String {
        let mut out = String::with_capacity(n);
        let mut emitted = 0;
        let mut line_pos = 0;

        while emitted < n && !self.is_exhausted() {
            if line_pos >= self.content_width {
                if emitted + self.terminator.len() > n {
                    break;
                }
                out.push_str(&self.terminator);
                emitted += self.terminator.len();
                line_pos = 0;
                continue;
            }
            let run = (self.content_width - line_pos)
                .min(n - emitted)
                .min(self.remaining());
            out.push_str(&self.text[self.pos..self.pos + run]);
            self.pos += run;
            emitted += run;
            line_pos += run;
        }
        out
    }

    /// Content characters not yet consumed.
    pub fn remaining(&self) -> usize {
        self.text.len() - self.pos
    }

    /// Content characters consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}
