//! Encode pipeline (`b2a`): binary file → base64 → wrapped chunks → part files
//!
//! Every parameter is validated before the input is read, so a bad budget or
//! stem never leaves partial output behind.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use textpart_core::{PartFormat, TextpartError, TextpartResult};

use crate::chunk::Chunk;
use crate::container::{is_valid_stem, ChunkContainerId};
use crate::cursor::LineWrappingCursor;

/// Progress callback type (parts_done, parts_total, path)
pub type ProgressFn = Box<dyn Fn(u64, u64, &Path) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// File to convert
    pub input: PathBuf,
    /// Directory the part files are written to (created if missing)
    pub output_dir: PathBuf,
    /// Part filename stem
    pub stem: String,
    /// Maximum characters per part file
    pub max_char: usize,
}

/// Result of encoding a single file
#[derive(Debug)]
pub struct EncodeResult {
    /// Number of part files written
    pub parts: u64,
    pub paths: Vec<PathBuf>,
    /// Size of the input file
    pub bytes_in: u64,
    /// Total characters written across all parts
    pub chars_out: u64,
}

/// Split `data` into fingerprinted chunks that fit `max_char` once rendered.
///
/// Empty input yields no chunks.
pub fn encode_bytes(data: &[u8], format: &PartFormat, max_char: usize) -> TextpartResult<Vec<Chunk>> {
    format.validate()?;
    let budget = format.chunk_budget(max_char)?;

    let mut cursor = LineWrappingCursor::new(B64.encode(data), format);
    let mut chunks = Vec::new();
    loop {
        let text = cursor.take(budget);
        if text.is_empty() {
            break;
        }
        chunks.push(Chunk::from_text(text));
    }
    Ok(chunks)
}

/// Convert `opts.input` into a series of part files.
pub fn encode_file(
    opts: &EncodeOptions,
    format: &PartFormat,
    progress: Option<&ProgressFn>,
) -> TextpartResult<EncodeResult> {
    format.validate()?;
    format.chunk_budget(opts.max_char)?;
    if !is_valid_stem(&opts.stem) {
        return Err(TextpartError::Config(format!(
            "invalid stem \"{}\": use lowercase letters, digits, '_' or '.'",
            opts.stem
        )));
    }

    let data = std::fs::read(&opts.input).map_err(|e| TextpartError::io(&opts.input, e))?;
    let chunks = encode_bytes(&data, format, opts.max_char)?;
    let total = chunks.len() as u64;
    if !format.fits_count(total) {
        return Err(TextpartError::Config(format!(
            "{total} parts do not fit in the index/count fields ({}/{} digits); raise --max-char",
            format.index_width, format.count_width
        )));
    }

    if total > 0 && !opts.output_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&opts.output_dir)
            .map_err(|e| TextpartError::io(&opts.output_dir, e))?;
    }

    let mut paths = Vec::with_capacity(chunks.len());
    let mut chars_out = 0u64;
    for (i, chunk) in chunks.iter().enumerate() {
        let index = i as u64 + 1;
        let id = ChunkContainerId::new(opts.stem.as_str(), index, total, &opts.output_dir)?;
        let text = chunk.render(index, total, format);
        std::fs::write(id.path(), &text).map_err(|e| TextpartError::io(id.path(), e))?;
        debug!(path = %id.path().display(), chars = text.len(), fingerprint = chunk.fingerprint(), "part written");

        chars_out += text.len() as u64;
        if let Some(cb) = progress {
            cb(index, total, id.path());
        }
        paths.push(id.path().to_path_buf());
    }

    info!(
        input = %opts.input.display(),
        parts = total,
        bytes = data.len(),
        "encoded"
    );

    Ok(EncodeResult {
        parts: total,
        paths,
        bytes_in: data.len() as u64,
        chars_out,
    })
}
