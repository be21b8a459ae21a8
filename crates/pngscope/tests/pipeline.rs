use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pngscope::png::{ChunkType, StopReason, IEND_RECORD, PNG_SIGNATURE};
use pngscope::prelude::*;
use pngscope::{ErrorKind, ImageDataReport};

fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = (payload.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out.extend_from_slice(&[0x12, 0x34, 0x56, 0x78]);
    out
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn ihdr_10x10() -> Vec<u8> {
    chunk(b"IHDR", &[0, 0, 0, 10, 0, 0, 0, 10, 8, 2, 0, 0, 0])
}

fn png_with_idat(idat: &[u8]) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend(ihdr_10x10());
    data.extend(chunk(b"IDAT", idat));
    data.extend_from_slice(&IEND_RECORD);
    data
}

fn write(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn test_well_formed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "clean.png", &png_with_idat(&zlib(&[0u8; 310])));

    let report = analyze_file(&path, &AnalysisOptions::default());

    let types: Vec<ChunkType> = report.chunks.iter().map(|c| c.chunk_type).collect();
    assert_eq!(types, vec![ChunkType::IHDR, ChunkType::IDAT, ChunkType::IEND]);
    let ihdr = report.ihdr.unwrap();
    assert_eq!((ihdr.width, ihdr.height, ihdr.bit_depth, ihdr.color_type), (10, 10, 8, 2));
    assert_eq!(report.stop, Some(StopReason::Terminator));
    assert!(matches!(
        report.image_data,
        Some(ImageDataReport {
            chunk_count: 1,
            decode: DecodeOutcome::Decoded { decompressed_len: 310 },
            ..
        })
    ));
    assert_eq!(report.trailing.len(), Some(0));
    assert!(report.trailing.artifact().is_none());
    assert!(report.errors().is_empty());
    assert!(!dir.path().join("clean.png.extracted").exists());
}

#[test]
fn test_appended_bytes_become_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = png_with_idat(&zlib(&[0u8; 310]));
    let appended = [0xA5u8; 37];
    data.extend_from_slice(&appended);
    let path = write(dir.path(), "stego.png", &data);

    let report = analyze_file(&path, &AnalysisOptions::default());

    assert_eq!(report.chunks.len(), 3);
    assert_eq!(report.trailing.len(), Some(37));
    let artifact = report.trailing.artifact().unwrap();
    assert_eq!(artifact, dir.path().join("stego.png.extracted"));
    assert_eq!(fs::read(artifact).unwrap(), appended);
}

#[test]
fn test_keyword_hit_in_image_data() {
    let dir = tempfile::tempdir().unwrap();
    let mut raw = vec![0x00, 0x01, 0x02];
    raw.extend_from_slice(b"FLAG{test}");
    raw.extend_from_slice(&[0xFE, 0x00, 0x7F]);
    raw.extend_from_slice(b"nothing to see");
    raw.push(0);
    let path = write(dir.path(), "flag.png", &png_with_idat(&zlib(&raw)));

    let mut options = AnalysisOptions::default();
    options.survey.add_keyword("flag");
    let report = analyze_file(&path, &options);

    let strings = report.strings.unwrap();
    let hits: Vec<_> = strings.keyword_hits.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(hits, vec!["FLAG{test}"]);
    assert!(strings.preview.is_empty());
    assert_eq!(strings.total_runs, 2);
}

#[test]
fn test_preview_is_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let raw: Vec<u8> = (0..25).flat_map(|i| format!("run{:02}\0", i).into_bytes()).collect();
    let path = write(dir.path(), "many.png", &png_with_idat(&zlib(&raw)));

    let mut options = AnalysisOptions::default();
    options.survey.add_keyword("absent");
    let report = analyze_file(&path, &options);

    let strings = report.strings.unwrap();
    assert_eq!(strings.total_runs, 25);
    assert_eq!(strings.preview.len(), 10);
    assert_eq!(strings.preview[0].text, "run00");
    assert_eq!(strings.preview[9].text, "run09");
}

#[test]
fn test_decode_failure_skips_strings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "corrupt.png", &png_with_idat(b"\xde\xad\xbe\xef not zlib"));

    let report = analyze_file(&path, &AnalysisOptions::default());

    assert!(matches!(
        report.image_data.as_ref().map(|d| &d.decode),
        Some(DecodeOutcome::Failed { error }) if error.kind == ErrorKind::DecodeFailure
    ));
    assert!(report.strings.is_none());
    assert_eq!(report.trailing.len(), Some(0));
}

#[test]
fn test_no_image_data() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend(ihdr_10x10());
    data.extend(chunk(b"tEXt", b"Comment\0rain on the line"));
    data.extend_from_slice(&IEND_RECORD);
    let path = write(dir.path(), "empty.png", &data);

    let report = analyze_file(&path, &AnalysisOptions::default());

    assert!(matches!(
        report.image_data,
        Some(ImageDataReport {
            chunk_count: 0,
            decode: DecodeOutcome::NoPayload,
            ..
        })
    ));
    assert!(report.strings.is_none());
    assert_eq!(report.texts.len(), 1);
    assert_eq!(report.texts[0].text.as_text(), Some("rain on the line"));
}

#[test]
fn test_bad_signature_still_extracts_trailer() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = b"JFIF-ish header".to_vec();
    data.extend_from_slice(&IEND_RECORD);
    data.extend_from_slice(b"secret");
    let path = write(dir.path(), "fake.png", &data);

    let report = analyze_file(&path, &AnalysisOptions::default());

    assert_eq!(
        report.walk_error.as_ref().map(|e| e.kind),
        Some(ErrorKind::FormatMismatch)
    );
    assert!(report.chunks.is_empty());
    assert!(report.stop.is_none());
    assert_eq!(report.trailing.len(), Some(6));
}

#[test]
fn test_truncated_file_reports_partial_walk() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend(ihdr_10x10());
    data.extend_from_slice(&0x00FF_FFFFu32.to_be_bytes());
    data.extend_from_slice(b"IDAT");
    data.extend_from_slice(&[0u8; 16]);
    let path = write(dir.path(), "cut.png", &data);

    let report = analyze_file(&path, &AnalysisOptions::default());

    assert_eq!(report.chunks.len(), 1);
    assert!(report.is_truncated());
    assert!(report.ihdr.is_some());
    assert!(matches!(
        &report.trailing,
        pngscope::TrailingReport::Failed { error } if error.kind == ErrorKind::TerminatorNotFound
    ));

    assert_eq!(
        report.walk_error.as_ref().map(|e| e.kind),
        Some(ErrorKind::Truncation)
    );
    let kinds: Vec<_> = report.errors().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::Truncation, ErrorKind::TerminatorNotFound]);
    assert!(!report.is_unreadable());

    let batch = analyze_batch(&[path], &AnalysisOptions::default());
    assert_eq!(batch.failed_count(), 1);
}

#[test]
fn test_batch_continues_after_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.png", &png_with_idat(&zlib(b"abcdefgh")));
    let missing = dir.path().join("missing.png");

    let report = analyze_batch(&[missing.clone(), good.clone()], &AnalysisOptions::default());

    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files[0].path, missing);
    assert!(report.files[0].is_unreadable());
    assert_eq!(
        report.files[0].walk_error.as_ref().map(|e| e.kind),
        Some(ErrorKind::Io)
    );
    assert_eq!(report.files[1].path, good);
    assert!(report.files[1].errors().is_empty());
    assert_eq!(report.failed_count(), 1);
}

#[test]
fn test_extraction_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = png_with_idat(&zlib(b"abcd"));
    data.extend_from_slice(b"appended");
    let path = write(dir.path(), "off.png", &data);

    let options = AnalysisOptions {
        extract_trailing: false,
        ..AnalysisOptions::default()
    };
    let report = analyze_file(&path, &options);

    assert_eq!(report.trailing, TrailingReport::Skipped);
    assert!(!dir.path().join("off.png.extracted").exists());
}

#[test]
fn test_missing_output_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = png_with_idat(&zlib(b"abcd"));
    data.extend_from_slice(b"tail");
    let path = write(dir.path(), "a.png", &data);
    let out = dir.path().join("reports/artifacts");
    let options = AnalysisOptions {
        output_dir: Some(out.clone()),
        ..AnalysisOptions::default()
    };

    let report = analyze_file(&path, &options);

    match &report.trailing {
        pngscope::TrailingReport::Found { artifact, len, .. } => {
            assert_eq!(*len, 4);
            assert_eq!(artifact.as_deref(), Some(out.join("a.png.extracted").as_path()));
        }
        other => panic!("expected trailing data, got {:?}", other),
    }
    assert_eq!(fs::read(out.join("a.png.extracted")).unwrap(), b"tail");
}

#[test]
fn test_output_dir_and_trailing_count() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let mut with_tail = png_with_idat(&zlib(b"abcd"));
    with_tail.extend_from_slice(b"tail");
    let a = write(dir.path(), "a.png", &with_tail);
    let b = write(dir.path(), "b.png", &png_with_idat(&zlib(b"abcd")));

    let options = AnalysisOptions {
        output_dir: Some(out.path().to_path_buf()),
        ..AnalysisOptions::default()
    };
    let report = analyze_batch(&[a, b], &options);

    assert_eq!(report.trailing_count(), 1);
    assert_eq!(fs::read(out.path().join("a.png.extracted")).unwrap(), b"tail");
    assert!(!dir.path().join("a.png.extracted").exists());
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_batch_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<PathBuf> = (0..16)
        .map(|i| {
            let raw = format!("\0file-{:02}\0", i);
            write(dir.path(), &format!("{:02}.png", i), &png_with_idat(&zlib(raw.as_bytes())))
        })
        .collect();

    let seen = std::sync::atomic::AtomicUsize::new(0);
    let report = pngscope::analyze_batch_parallel(&paths, &AnalysisOptions::default(), |_| {
        seen.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    });

    assert_eq!(seen.into_inner(), 16);
    for (i, file) in report.files.iter().enumerate() {
        assert_eq!(file.path, paths[i]);
        let preview = &file.strings.as_ref().unwrap().preview;
        assert_eq!(preview[0].text, format!("file-{:02}", i));
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_report_serializes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "s.png", &png_with_idat(&zlib(b"abcd")));
    let report = analyze_batch(&[path], &AnalysisOptions::default());

    fn assert_serialize<T: serde::Serialize>(_: &T) {}
    assert_serialize(&report);
}
