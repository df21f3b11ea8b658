//! Part body fingerprints
//!
//! MD5 over the wrapped body text, rendered as 32 lowercase hex chars. This is
//! an integrity checksum against truncation and accidental edits, not a
//! defence against deliberate tampering.

use md5::{Digest, Md5};

pub use textpart_core::format::FINGERPRINT_LEN;

/// Hex digest of a byte slice.
pub fn fingerprint_bytes(data: &[u8]) -> String {
    format!("{:x}", Md5::digest(data))
}

/// Whether `s` has the shape of a fingerprint line.
pub fn is_fingerprint(s: &str) -> bool {
    s.len() == FINGERPRINT_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
