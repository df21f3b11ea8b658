//! textpart-parts: split binary files into fingerprinted ASCII part files and back
//!
//! # Overview
//! - `fingerprint`: MD5 hex digests guarding each part body against corruption
//! - `cursor`: fixed-width line wrapping consumed one chunk at a time
//! - `chunk`: a wrapped, fingerprinted slice and its part-file layout
//! - `container`: part filenames (`{stem}-{index}-{count}.part`) and series ordering
//! - `encode`: binary file → base64 → part files (`b2a`)
//! - `decode`: part files → base64 → binary file (`a2b`)

pub mod chunk;
pub mod container;
pub mod cursor;
pub mod decode;
pub mod encode;
pub mod fingerprint;

pub use chunk::{Chunk, PartFile};
pub use container::{is_valid_stem, ChunkContainerId};
pub use cursor::LineWrappingCursor;
pub use decode::{decode_dir, decode_series, discover_parts, order_series, DecodeOptions, DecodeResult};
pub use encode::{encode_bytes, encode_file, EncodeOptions, EncodeResult, ProgressFn};
pub use fingerprint::{fingerprint_bytes, is_fingerprint};
