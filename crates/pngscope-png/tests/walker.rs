mod common;

use std::io::Cursor;

use pngscope_png::{
    ChunkType, ChunkWalker, DecodeLimits, Error, RetainPolicy, StopReason, WalkSummary,
    IEND_RECORD, PNG_SIGNATURE,
};

use common::*;

#[test]
fn test_minimal_file_yields_three_records() {
    let data = minimal_png();
    let chunks: Vec<_> = ChunkWalker::from_bytes(&data, RetainPolicy::Metadata)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let types: Vec<ChunkType> = chunks.iter().map(|c| c.chunk_type).collect();
    assert_eq!(types, vec![ChunkType::IHDR, ChunkType::IDAT, ChunkType::IEND]);
    assert_eq!(chunks[2].declared_crc, pngscope_png::IEND_CRC);

    let walker = ChunkWalker::from_bytes(&data, RetainPolicy::Metadata).unwrap();
    let summary = WalkSummary::collect(walker, DecodeLimits::default());
    let ihdr = summary.ihdr.unwrap();
    assert_eq!((ihdr.width, ihdr.height), (10, 10));
    assert_eq!((ihdr.bit_depth, ihdr.color_type), (8, 2));
}

#[test]
fn test_spans_tile_the_structured_region() {
    let mut data = png(&[
        ihdr(4, 4, 8, 6),
        chunk(b"tEXt", b"Comment\0hello"),
        chunk(b"IDAT", &[1, 2, 3]),
        chunk(b"IDAT", &[]),
        chunk(b"prIv", &[9; 40]),
        iend(),
    ]);
    let structured_end = data.len();
    data.extend_from_slice(b"appended after the end");

    let chunks: Vec<_> = ChunkWalker::from_bytes(&data, RetainPolicy::ImageData)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let mut cursor = PNG_SIGNATURE.len() as u64;
    let mut rebuilt = Vec::new();
    for chunk in &chunks {
        let span = chunk.span();
        assert_eq!(span.start, cursor, "gap or overlap before {}", chunk.chunk_type);
        rebuilt.extend_from_slice(&data[span.start as usize..span.end as usize]);
        cursor = span.end;
    }

    assert_eq!(cursor as usize, structured_end);
    assert_eq!(rebuilt, &data[PNG_SIGNATURE.len()..structured_end]);
    assert_eq!(&rebuilt[rebuilt.len() - 12..], &IEND_RECORD);
}

#[test]
fn test_walk_stops_at_terminator() {
    let mut data = minimal_png();
    data.extend(chunk(b"IDAT", b"smuggled"));

    let mut walker = ChunkWalker::from_bytes(&data, RetainPolicy::All).unwrap();
    let count = walker.by_ref().filter(Result::is_ok).count();

    assert_eq!(count, 3);
    assert_eq!(walker.stop_reason(), Some(&StopReason::Terminator));
}

#[test]
fn test_oversized_second_chunk_reports_truncation() {
    let mut data = png(&[ihdr(10, 10, 8, 2)]);
    let second_offset = data.len() as u64;
    data.extend_from_slice(&1_000_000u32.to_be_bytes());
    data.extend_from_slice(b"IDAT");
    data.extend_from_slice(&[0u8; 32]);

    let mut walker = ChunkWalker::from_bytes(&data, RetainPolicy::All).unwrap();

    let first = walker.next().unwrap().unwrap();
    assert_eq!(first.chunk_type, ChunkType::IHDR);

    match walker.next() {
        Some(Err(Error::Truncated {
            chunk_type,
            offset,
            needed,
            available,
        })) => {
            assert_eq!(chunk_type, Some(ChunkType::IDAT));
            assert_eq!(offset, second_offset);
            assert_eq!(needed, 1_000_004);
            assert_eq!(available, 32);
        }
        other => panic!("expected truncation, got {:?}", other),
    }
    assert!(walker.next().is_none());
    assert!(matches!(
        walker.stop_reason(),
        Some(StopReason::Truncated { .. })
    ));
}

#[test]
fn test_truncated_summary_keeps_parsed_chunks() {
    let mut data = png(&[ihdr(1, 1, 8, 0), chunk(b"IDAT", &zlib(&[0, 0]))]);
    data.extend_from_slice(&u32::MAX.to_be_bytes());
    data.extend_from_slice(b"IDAT");

    let walker = ChunkWalker::from_bytes(&data, RetainPolicy::Metadata).unwrap();
    let summary = WalkSummary::collect(walker, DecodeLimits::default());

    assert_eq!(summary.chunks.len(), 2);
    assert_eq!(summary.image_data.chunk_count(), 1);
    assert!(matches!(summary.stop, StopReason::Truncated { .. }));
    assert_eq!(
        summary.image_data.decode(DecodeLimits::default()).decoded(),
        Some(&[0u8, 0][..])
    );
}

#[test]
fn test_non_printable_tag_is_not_fatal() {
    let data = png(&[chunk(&[0x01, 0xFF, b'x', b'y'], b"??"), iend()]);
    let chunks: Vec<_> = ChunkWalker::from_bytes(&data, RetainPolicy::All)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(chunks.len(), 2);
    assert!(!chunks[0].chunk_type.is_printable());
    assert_eq!(chunks[0].payload(), b"??");
}

#[test]
fn test_split_idat_from_walk() {
    let secret = b"\x00\x01FLAG{split}\x02";
    let compressed = zlib(secret);
    let (a, b) = compressed.split_at(compressed.len() / 2);
    let data = png(&[ihdr(1, 1, 8, 0), chunk(b"IDAT", a), chunk(b"IDAT", b), iend()]);

    let walker = ChunkWalker::from_bytes(&data, RetainPolicy::ImageData).unwrap();
    let (stream, result) = pngscope_png::aggregate_and_decode(
        walker.filter_map(Result::ok),
        DecodeLimits::default(),
    );

    assert_eq!(stream.chunk_count(), 2);
    assert_eq!(result.decoded(), Some(&secret[..]));
}

#[test]
fn test_walks_image_crate_output() {
    let image = image::RgbImage::from_fn(7, 5, |x, y| image::Rgb([x as u8, y as u8, 0x80]));
    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, image::ImageFormat::Png)
        .unwrap();
    let data = encoded.into_inner();

    let walker = ChunkWalker::from_bytes(&data, RetainPolicy::Metadata).unwrap();
    let summary = WalkSummary::collect(walker, DecodeLimits::default());

    assert!(summary.stop.is_terminator());
    let ihdr = summary.ihdr.unwrap();
    assert_eq!((ihdr.width, ihdr.height, ihdr.color_type), (7, 5, 2));

    // One filter byte per scanline plus three bytes per pixel.
    let decoded = summary.image_data.decode(DecodeLimits::default());
    assert_eq!(decoded.decoded().map(<[u8]>::len), Some(5 * (1 + 7 * 3)));
}

#[test]
fn test_open_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minimal.png");
    std::fs::write(&path, minimal_png()).unwrap();

    let count = ChunkWalker::open(&path, RetainPolicy::ImageData)
        .unwrap()
        .count();

    assert_eq!(count, 3);
}
