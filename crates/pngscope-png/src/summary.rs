//! Whole-file walk summary.

use std::io::{Read, Seek};

use tracing::warn;

use crate::decompress::DecodeLimits;
use crate::payload::ImageDataStream;
use crate::text::{TextChunk, TextKind};
use crate::walker::{ChunkWalker, StopReason};
use crate::{ChunkSummary, ChunkType, Ihdr};

/// Everything a single walk learned about a file.
#[derive(Debug, Clone)]
pub struct WalkSummary {
    /// Every chunk in encounter order.
    pub chunks: Vec<ChunkSummary>,
    /// First IHDR, if present and well-formed.
    pub ihdr: Option<Ihdr>,
    /// Why the first IHDR could not be decoded.
    pub ihdr_error: Option<String>,
    /// Decoded text chunks in encounter order.
    pub texts: Vec<TextChunk>,
    /// Reassembled image data.
    pub image_data: ImageDataStream,
    /// Why the walk ended.
    pub stop: StopReason,
    /// Offset just past the last complete chunk.
    pub end_offset: u64,
}

impl WalkSummary {
    /// Drive a walker to completion.
    ///
    /// Truncation and read errors end the walk but are not returned as errors:
    /// what was parsed so far is kept and [`WalkSummary::stop`] records why.
    pub fn collect<R: Read + Seek>(mut walker: ChunkWalker<R>, limits: DecodeLimits) -> Self {
        let mut chunks = Vec::new();
        let mut ihdr = None;
        let mut ihdr_error = None;
        let mut texts = Vec::new();
        let mut image_data = ImageDataStream::new();

        for item in walker.by_ref() {
            let Ok(chunk) = item else {
                break;
            };

            chunks.push(chunk.summary());

            if image_data.push(&chunk) {
                continue;
            }

            if chunk.chunk_type == ChunkType::IHDR
                && chunk.payload.is_some()
                && ihdr.is_none()
                && ihdr_error.is_none()
            {
                match Ihdr::parse(chunk.payload()) {
                    Ok(header) => ihdr = Some(header),
                    Err(e) => {
                        warn!(error = %e, "unreadable IHDR");
                        ihdr_error = Some(e.to_string());
                    }
                }
            } else if let Some(kind) = TextKind::from_chunk_type(chunk.chunk_type) {
                if chunk.payload.is_some() {
                    let text = TextChunk::parse(kind, chunk.payload(), limits)
                        .unwrap_or_else(|e| TextChunk::malformed(kind, &e));
                    texts.push(text);
                }
            }
        }

        let stop = walker
            .stop_reason()
            .cloned()
            .unwrap_or(StopReason::EndOfStream);

        Self {
            chunks,
            ihdr,
            ihdr_error,
            texts,
            image_data,
            stop,
            end_offset: walker.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{IEND_RECORD, PNG_SIGNATURE};
    use crate::walker::RetainPolicy;
    use crate::TextValue;

    fn record(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = (payload.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(tag);
        out.extend_from_slice(payload);
        out.extend_from_slice(&[0; 4]);
        out
    }

    #[test]
    fn test_collect_metadata() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend(record(b"IHDR", &[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0]));
        data.extend(record(b"tEXt", b"Author\0rain"));
        data.extend(record(b"tEXt", b"broken"));
        data.extend(IEND_RECORD);

        let walker = ChunkWalker::from_bytes(&data, RetainPolicy::Metadata).unwrap();
        let summary = WalkSummary::collect(walker, DecodeLimits::default());

        assert_eq!(summary.chunks.len(), 4);
        assert_eq!(summary.ihdr.map(|h| h.width), Some(1));
        assert_eq!(summary.texts.len(), 2);
        assert_eq!(summary.texts[0].text, TextValue::Text("rain".into()));
        assert!(matches!(summary.texts[1].text, TextValue::Undecodable { .. }));
        assert!(summary.stop.is_terminator());
        assert_eq!(summary.end_offset, data.len() as u64);
    }

    #[test]
    fn test_texts_skipped_when_not_retained() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend(record(b"tEXt", b"Author\0rain"));
        data.extend(IEND_RECORD);

        let walker = ChunkWalker::from_bytes(&data, RetainPolicy::ImageData).unwrap();
        let summary = WalkSummary::collect(walker, DecodeLimits::default());

        assert_eq!(summary.chunks.len(), 2);
        assert!(summary.texts.is_empty());
    }

    #[test]
    fn test_unretained_ihdr_is_not_an_error() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend(record(b"IHDR", &[0, 0, 0, 10, 0, 0, 0, 10, 8, 2, 0, 0, 0]));
        data.extend(IEND_RECORD);

        let walker = ChunkWalker::from_bytes(&data, RetainPolicy::ImageData).unwrap();
        let summary = WalkSummary::collect(walker, DecodeLimits::default());

        assert_eq!(summary.chunks.len(), 2);
        assert!(summary.ihdr.is_none());
        assert!(summary.ihdr_error.is_none());
    }

    #[test]
    fn test_bad_ihdr_length() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend(record(b"IHDR", &[0; 12]));

        let walker = ChunkWalker::from_bytes(&data, RetainPolicy::Metadata).unwrap();
        let summary = WalkSummary::collect(walker, DecodeLimits::default());

        assert!(summary.ihdr.is_none());
        assert!(summary.ihdr_error.is_some());
        assert_eq!(summary.stop, StopReason::EndOfStream);
    }
}
