//! Integration test: b2a → a2b round-trip through real part files
//!
//! Covers the on-disk contract end to end: budgets, naming, ordering,
//! fingerprint and boundary checks, and series coherence.

use proptest::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use textpart_core::{PartFormat, TextpartError};
use textpart_parts::{decode_dir, encode_file, DecodeOptions, EncodeOptions, ProgressFn};

fn pseudo_random(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..size)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as u8
        })
        .collect()
}

fn write_input(dir: &Path, content: &[u8]) -> PathBuf {
    let path = dir.join("input.bin");
    std::fs::write(&path, content).expect("write input");
    path
}

fn encode(
    tmp: &TempDir,
    content: &[u8],
    stem: &str,
    max_char: usize,
    format: &PartFormat,
) -> textpart_parts::EncodeResult {
    let opts = EncodeOptions {
        input: write_input(tmp.path(), content),
        output_dir: tmp.path().join("parts"),
        stem: stem.into(),
        max_char,
    };
    encode_file(&opts, format, None).expect("encode")
}

fn decode(tmp: &TempDir, stem: &str, format: &PartFormat) -> Result<Vec<u8>, TextpartError> {
    let output = tmp.path().join("output/restored.bin");
    let opts = DecodeOptions {
        input_dir: tmp.path().join("parts"),
        stem: stem.into(),
        output: output.clone(),
    };
    decode_dir(&opts, format, None)?;
    Ok(std::fs::read(&output).expect("read output"))
}

#[test]
fn roundtrip_100_random_bytes_at_200_chars() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let original = pseudo_random(100, 42);

    let encoded = encode(&tmp, &original, "x", 200, &format);
    assert!(encoded.parts >= 1);
    for path in &encoded.paths {
        let len = std::fs::read_to_string(path).unwrap().len();
        assert!(len <= 200, "{} is {len} chars", path.display());
    }

    assert_eq!(decode(&tmp, "x", &format).unwrap(), original);
}

#[test]
fn roundtrip_default_budget() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let original = pseudo_random(64 * 1024, 7);

    let encoded = encode(&tmp, &original, "part", 1024, &format);
    assert!(encoded.parts > 1);
    assert_eq!(decode(&tmp, "part", &format).unwrap(), original);
}

#[test]
fn roundtrip_empty_file() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    std::fs::create_dir_all(tmp.path().join("parts")).unwrap();

    let encoded = encode(&tmp, b"", "x", 1024, &format);
    assert_eq!(encoded.parts, 0);
    assert!(decode(&tmp, "x", &format).unwrap().is_empty());
}

#[test]
fn roundtrip_crlf_terminator() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat {
        terminator: "\r\n".into(),
        line_width: 40,
        ..PartFormat::default()
    };
    let original = pseudo_random(3000, 3);

    encode(&tmp, &original, "crlf", 300, &format);
    assert_eq!(decode(&tmp, "crlf", &format).unwrap(), original);
}

#[test]
fn parts_on_disk_match_layout() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let encoded = encode(&tmp, &pseudo_random(500, 1), "x", 300, &format);

    let text = std::fs::read_to_string(&encoded.paths[0]).unwrap();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines[0], "000001");
    assert_eq!(lines[1], format!("{:06}", encoded.parts));
    assert_eq!(lines[2].len(), 32);
    assert_eq!(lines[3], "-".repeat(59));
    assert_eq!(*lines.last().unwrap(), "-".repeat(59));
    for body in &lines[4..lines.len() - 1] {
        assert!(body.len() <= 59);
    }
}

#[test]
fn decodes_in_index_order_regardless_of_layout() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let original = pseudo_random(150, 11);
    let encoded = encode(&tmp, &original, "x", 200, &format);
    assert!(encoded.parts >= 3);

    // Scatter the parts over nested directories in reverse order.
    for (i, path) in encoded.paths.iter().enumerate().rev() {
        let nested = tmp.path().join("parts").join(format!("d{}", encoded.paths.len() - i));
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::rename(path, nested.join(path.file_name().unwrap())).unwrap();
    }

    assert_eq!(decode(&tmp, "x", &format).unwrap(), original);
}

#[test]
fn progress_reports_parts_in_order() {
    use std::sync::{Arc, Mutex};

    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let encoded = encode(&tmp, &pseudo_random(150, 5), "x", 200, &format);

    let seen: Arc<Mutex<Vec<PathBuf>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let progress: ProgressFn = Box::new(move |_done, _total, path| {
        sink.lock().unwrap().push(path.to_path_buf());
    });
    let opts = DecodeOptions {
        input_dir: tmp.path().join("parts"),
        stem: "x".into(),
        output: tmp.path().join("out.bin"),
    };
    let result = decode_dir(&opts, &format, Some(&progress)).unwrap();

    let names: Vec<String> = seen
        .lock()
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    let expected: Vec<String> = (1..=encoded.parts)
        .map(|i| format!("x-{i}-{}.part", encoded.parts))
        .collect();
    assert_eq!(names, expected);
    assert_eq!(result.parts, encoded.parts);
}

#[test]
fn unrelated_files_and_stems_are_ignored() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let original = pseudo_random(300, 9);
    encode(&tmp, &original, "x", 250, &format);

    let parts = tmp.path().join("parts");
    std::fs::write(parts.join("README.md"), "notes").unwrap();
    std::fs::write(parts.join("y-1-1.part"), "not ours").unwrap();
    std::fs::write(parts.join("x-1-1.txt"), "not a part").unwrap();

    assert_eq!(decode(&tmp, "x", &format).unwrap(), original);
}

#[test]
fn mutated_body_fails_fingerprint() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let encoded = encode(&tmp, &pseudo_random(400, 13), "x", 300, &format);

    let target = &encoded.paths[1];
    let text = std::fs::read_to_string(target).unwrap();
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let body = &mut lines[4];
    let replacement = if body.starts_with('A') { "B" } else { "A" };
    body.replace_range(0..1, replacement);
    std::fs::write(target, lines.join("\n")).unwrap();

    let err = decode(&tmp, "x", &format).unwrap_err();
    assert!(matches!(err, TextpartError::FingerprintMismatch { .. }), "{err}");
}

#[test]
fn bad_boundary_fails_format() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let encoded = encode(&tmp, &pseudo_random(100, 17), "x", 300, &format);

    let target = &encoded.paths[0];
    let text = std::fs::read_to_string(target).unwrap();
    let damaged = format!("{}+", text);
    std::fs::write(target, damaged).unwrap();

    let err = decode(&tmp, "x", &format).unwrap_err();
    assert!(matches!(err, TextpartError::Format { .. }), "{err}");
}

#[test]
fn truncated_part_fails_format() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let encoded = encode(&tmp, &pseudo_random(100, 19), "x", 300, &format);
    std::fs::write(&encoded.paths[0], "000001\n000001\n").unwrap();

    let err = decode(&tmp, "x", &format).unwrap_err();
    assert!(matches!(err, TextpartError::Format { .. }), "{err}");
}

#[test]
fn mixed_counts_fail_comparison() {
    let tmp = TempDir::new().unwrap();
    let parts = tmp.path().join("parts");
    std::fs::create_dir_all(&parts).unwrap();
    std::fs::write(parts.join("x-1-3.part"), "").unwrap();
    std::fs::write(parts.join("x-1-4.part"), "").unwrap();

    let err = decode(&tmp, "x", &PartFormat::default()).unwrap_err();
    assert!(matches!(err, TextpartError::Comparison { .. }), "{err}");
    assert!(!tmp.path().join("output/restored.bin").exists());
}

#[test]
fn missing_part_fails() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let encoded = encode(&tmp, &pseudo_random(200, 23), "x", 200, &format);
    assert!(encoded.parts >= 3);
    std::fs::remove_file(&encoded.paths[1]).unwrap();

    let err = decode(&tmp, "x", &format).unwrap_err();
    assert!(matches!(err, TextpartError::MissingPart { index: 2, .. }), "{err}");
}

#[test]
fn duplicate_part_fails() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let encoded = encode(&tmp, &pseudo_random(200, 29), "x", 200, &format);

    let copy_dir = tmp.path().join("parts/copy");
    std::fs::create_dir_all(&copy_dir).unwrap();
    let first = &encoded.paths[0];
    std::fs::copy(first, copy_dir.join(first.file_name().unwrap())).unwrap();

    let err = decode(&tmp, "x", &format).unwrap_err();
    assert!(matches!(err, TextpartError::DuplicateIndex { index: 1, .. }), "{err}");
}

#[test]
fn renamed_part_fails_header_check() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let encoded = encode(&tmp, &pseudo_random(200, 31), "x", 200, &format);
    assert!(encoded.parts >= 2);

    // Swap the first two parts' names.
    let (a, b) = (&encoded.paths[0], &encoded.paths[1]);
    let tmp_name = a.with_extension("swap");
    std::fs::rename(a, &tmp_name).unwrap();
    std::fs::rename(b, a).unwrap();
    std::fs::rename(&tmp_name, b).unwrap();

    let err = decode(&tmp, "x", &format).unwrap_err();
    assert!(matches!(err, TextpartError::Format { .. }), "{err}");
}

#[test]
fn below_overhead_writes_zero_files() {
    let tmp = TempDir::new().unwrap();
    let format = PartFormat::default();
    let opts = EncodeOptions {
        input: write_input(tmp.path(), &pseudo_random(100, 37)),
        output_dir: tmp.path().join("parts"),
        stem: "x".into(),
        max_char: format.overhead() - 1,
    };
    let err = encode_file(&opts, &format, None).unwrap_err();
    assert!(matches!(err, TextpartError::Config(_)));
    assert!(!tmp.path().join("parts").exists());
}

#[test]
fn missing_input_dir_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = decode(&tmp, "x", &PartFormat::default()).unwrap_err();
    assert!(matches!(err, TextpartError::Io { .. }), "{err}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// decode(encode(B)) == B across line widths and budgets.
    #[test]
    fn roundtrip_any_config(
        data in proptest::collection::vec(any::<u8>(), 0..=512),
        line_width in 2usize..=120,
        extra in 0usize..=400,
    ) {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("parts")).unwrap();
        let format = PartFormat { line_width, ..PartFormat::default() };
        let max_char = format.min_max_char() + extra;

        let encoded = encode(&tmp, &data, "prop", max_char, &format);
        for path in &encoded.paths {
            let len = std::fs::read_to_string(path).unwrap().len();
            prop_assert!(len <= max_char);
        }
        prop_assert_eq!(decode(&tmp, "prop", &format).unwrap(), data);
    }

    /// With a two-character terminator no part may exceed `max_char` either.
    #[test]
    fn roundtrip_crlf_respects_max_char(
        data in proptest::collection::vec(any::<u8>(), 0..=512),
        line_width in 3usize..=120,
        extra in 0usize..=400,
    ) {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("parts")).unwrap();
        let format = PartFormat {
            line_width,
            terminator: "\r\n".into(),
            ..PartFormat::default()
        };
        let max_char = format.min_max_char() + extra;

        let encoded = encode(&tmp, &data, "crlf", max_char, &format);
        for path in &encoded.paths {
            let len = std::fs::read_to_string(path).unwrap().len();
            prop_assert!(len <= max_char);
        }
        prop_assert_eq!(decode(&tmp, "crlf", &format).unwrap(), data);
    }
}
