//! Decode pipeline (`a2b`): discover part files → order → verify → base64 → binary
//!
//! A directory must hold exactly one coherent series per stem: mixed counts,
//! duplicate indices and gaps all abort the run before any output is written.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use textpart_core::{PartFormat, TextpartError, TextpartResult};

use crate::chunk::PartFile;
use crate::container::ChunkContainerId;
use crate::encode::ProgressFn;

#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Directory scanned recursively for part files
    pub input_dir: PathBuf,
    /// Stem of the series to reassemble
    pub stem: String,
    /// File the reassembled bytes are written to
    pub output: PathBuf,
}

/// Result of reassembling a series
#[derive(Debug)]
pub struct DecodeResult {
    pub parts: u64,
    /// Part files in the order they were read
    pub paths: Vec<PathBuf>,
    /// Bytes written to the output file
    pub bytes: u64,
}

/// Find every part file for `stem` under `dir`, recursively. Unordered.
pub fn discover_parts(dir: &Path, stem: &str) -> TextpartResult<Vec<ChunkContainerId>> {
    let root = std::fs::canonicalize(dir).map_err(|e| TextpartError::io(dir, e))?;
    let mut files = Vec::new();
    collect_files(&root, &mut files)?;
    files.sort(); // deterministic order

    let mut ids = Vec::new();
    for path in &files {
        if let Some(id) = ChunkContainerId::from_path(stem, path)? {
            debug!(path = %path.display(), index = id.index(), count = id.count(), "found part");
            ids.push(id);
        }
    }
    Ok(ids)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> TextpartResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| TextpartError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| TextpartError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| TextpartError::io(&path, e))?;
        if file_type.is_dir() {
            collect_files(&path, out)?;
        } else if path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Sort ids into a complete series `1..=count`.
///
/// Fails on ids from different series, on two files claiming one index, and
/// on any missing index.
pub fn order_series(ids: Vec<ChunkContainerId>) -> TextpartResult<Vec<ChunkContainerId>> {
    let ids = ChunkContainerId::sort_series(ids)?;

    for pair in ids.windows(2) {
        if pair[0].index() == pair[1].index() {
            return Err(TextpartError::DuplicateIndex {
                index: pair[0].index(),
                first: pair[0].path().to_path_buf(),
                second: pair[1].path().to_path_buf(),
            });
        }
    }

    if let Some(first) = ids.first() {
        let count = first.count();
        for (expected, id) in (1..=count).zip(&ids) {
            if id.index() != expected {
                return Err(TextpartError::MissingPart {
                    index: expected,
                    count,
                });
            }
        }
        let found = ids.len() as u64;
        if found < count {
            return Err(TextpartError::MissingPart {
                index: found + 1,
                count,
            });
        }
    }
    Ok(ids)
}

/// Load, verify, and concatenate an ordered series, then base64-decode it.
pub fn decode_series(
    ids: &[ChunkContainerId],
    format: &PartFormat,
    progress: Option<&ProgressFn>,
) -> TextpartResult<Vec<u8>> {
    let total = ids.len() as u64;
    let mut payload = String::new();

    for (i, id) in ids.iter().enumerate() {
        if let Some(cb) = progress {
            cb(i as u64 + 1, total, id.path());
        }
        let part = PartFile::load(id.path(), format)?;
        if part.index != id.index() || part.count != id.count() {
            return Err(TextpartError::format(
                id.path(),
                format!(
                    "header says part {} of {}, filename says {} of {}",
                    part.index,
                    part.count,
                    id.index(),
                    id.count()
                ),
            ));
        }
        payload.push_str(&part.chunk.unwrapped(format));
    }

    B64.decode(payload.as_bytes()).map_err(|e| {
        let path = ids.last().map(|id| id.directory().to_path_buf()).unwrap_or_default();
        TextpartError::format(path, format!("reassembled payload is not valid base64: {e}"))
    })
}

/// Reassemble the series `opts.stem` found under `opts.input_dir` into `opts.output`.
pub fn decode_dir(
    opts: &DecodeOptions,
    format: &PartFormat,
    progress: Option<&ProgressFn>,
) -> TextpartResult<DecodeResult> {
    format.validate()?;

    let ids = order_series(discover_parts(&opts.input_dir, &opts.stem)?)?;
    if ids.is_empty() {
        warn!(
            dir = %opts.input_dir.display(),
            stem = %opts.stem,
            "no parts found; writing an empty output file"
        );
    }

    let data = decode_series(&ids, format, progress)?;

    if let Some(parent) = opts.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| TextpartError::io(parent, e))?;
        }
    }
    std::fs::write(&opts.output, &data).map_err(|e| TextpartError::io(&opts.output, e))?;

    info!(
        output = %opts.output.display(),
        parts = ids.len(),
        bytes = data.len(),
        "decoded"
    );

    Ok(DecodeResult {
        parts: ids.len() as u64,
        paths: ids.iter().map(|id| id.path().to_path_buf()).collect(),
        bytes: data.len() as u64,
    })
}
