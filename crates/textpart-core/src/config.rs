use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::TextpartResult;
use crate::format::PartFormat;

/// Top-level configuration (loaded from textpart.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextpartConfig {
    pub format: PartFormat,
    pub parts: PartsConfig,
}

impl TextpartConfig {
    pub fn validate(&self) -> TextpartResult<()> {
        self.format.validate()
    }
}

/// Defaults for the `b2a` / `a2b` flags
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartsConfig {
    /// Maximum characters per part file (default: 1024)
    pub max_char: usize,
    /// Directory parts are written to and discovered from (default: ".")
    pub dir: PathBuf,
    /// Part filename stem (default: "part")
    pub stem: String,
}

impl Default for PartsConfig {
    fn default() -> Self {
        Self {
            max_char: 1024,
            dir: PathBuf::from("."),
            stem: "part".into(),
        }
    }
}
