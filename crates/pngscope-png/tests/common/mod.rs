//! In-memory PNG fixture builder.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pngscope_png::PNG_SIGNATURE;

/// Encode one chunk with a correct CRC.
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(tag);
    hasher.update(payload);

    let mut out = (payload.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
    out
}

pub fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
    let mut payload = width.to_be_bytes().to_vec();
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
    chunk(b"IHDR", &payload)
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn iend() -> Vec<u8> {
    chunk(b"IEND", &[])
}

/// Signature + the given chunks.
pub fn png(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    for c in chunks {
        out.extend_from_slice(c);
    }
    out
}

/// Well-formed 10x10 RGB file with one IDAT chunk.
pub fn minimal_png() -> Vec<u8> {
    let raw = vec![0u8; 10 * (1 + 10 * 3)];
    png(&[ihdr(10, 10, 8, 2), chunk(b"IDAT", &zlib(&raw)), iend()])
}
