//! Text chunk decoding (`tEXt`, `zTXt`, `iTXt`).

use pngscope_common::{ascii, BinaryReader};

use crate::decompress::{inflate_zlib, DecodeLimits};
use crate::{ChunkType, Error, Result};

/// The only compression method defined for text chunks (zlib).
const COMPRESSION_ZLIB: u8 = 0;

/// Which text chunk flavour a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TextKind {
    /// `tEXt`: uncompressed Latin-1.
    Plain,
    /// `zTXt`: zlib-compressed Latin-1.
    Compressed,
    /// `iTXt`: UTF-8, optionally compressed.
    International,
}

impl TextKind {
    /// Map a chunk type onto its text flavour.
    pub fn from_chunk_type(chunk_type: ChunkType) -> Option<Self> {
        match chunk_type {
            ChunkType::tEXt => Some(Self::Plain),
            ChunkType::zTXt => Some(Self::Compressed),
            ChunkType::iTXt => Some(Self::International),
            _ => None,
        }
    }

    /// Chunk type tag for this flavour.
    pub fn chunk_type(self) -> ChunkType {
        match self {
            Self::Plain => ChunkType::tEXt,
            Self::Compressed => ChunkType::zTXt,
            Self::International => ChunkType::iTXt,
        }
    }
}

/// The text body of a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TextValue {
    /// Successfully decoded text.
    Text(String),
    /// The framing parsed but the body did not (bad compression, bad fields).
    Undecodable { reason: String },
}

impl TextValue {
    /// Decoded text, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Undecodable { .. } => None,
        }
    }
}

/// A decoded text chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextChunk {
    pub kind: TextKind,
    pub keyword: String,
    /// `iTXt` only.
    pub language: Option<String>,
    /// `iTXt` only.
    pub translated_keyword: Option<String>,
    /// Whether the body was stored compressed.
    pub compressed: bool,
    pub text: TextValue,
}

impl TextChunk {
    /// Decode a text chunk payload.
    ///
    /// Only a payload without a keyword separator is an error. A body that fails
    /// to decompress still yields a `TextChunk` with [`TextValue::Undecodable`],
    /// so the keyword stays visible in reports.
    pub fn parse(kind: TextKind, payload: &[u8], limits: DecodeLimits) -> Result<Self> {
        let mut reader = BinaryReader::new(payload);
        let keyword = reader
            .read_until_nul()
            .map_err(|_| malformed(kind, "missing keyword separator"))?;
        let keyword = ascii::latin1_to_string(keyword);

        match kind {
            TextKind::Plain => Ok(Self {
                kind,
                keyword,
                language: None,
                translated_keyword: None,
                compressed: false,
                text: TextValue::Text(ascii::latin1_to_string(reader.remaining_bytes())),
            }),
            TextKind::Compressed => {
                let method = reader
                    .read_u8()
                    .map_err(|_| malformed(kind, "missing compression method"))?;
                let text = decode_body(method, reader.remaining_bytes(), limits)
                    .map(|body| ascii::latin1_to_string(&body));
                Ok(Self {
                    kind,
                    keyword,
                    language: None,
                    translated_keyword: None,
                    compressed: true,
                    text: into_value(text),
                })
            }
            TextKind::International => {
                let flag = reader
                    .read_u8()
                    .map_err(|_| malformed(kind, "missing compression flag"))?;
                let method = reader
                    .read_u8()
                    .map_err(|_| malformed(kind, "missing compression method"))?;
                let language = reader
                    .read_until_nul()
                    .map_err(|_| malformed(kind, "missing language tag separator"))?;
                let translated = reader
                    .read_until_nul()
                    .map_err(|_| malformed(kind, "missing translated keyword separator"))?;

                let compressed = flag != 0;
                let body = reader.remaining_bytes();
                let text = if compressed {
                    decode_body(method, body, limits)
                        .map(|body| String::from_utf8_lossy(&body).into_owned())
                } else {
                    Ok(String::from_utf8_lossy(body).into_owned())
                };

                Ok(Self {
                    kind,
                    keyword,
                    language: Some(ascii::latin1_to_string(language)),
                    translated_keyword: Some(String::from_utf8_lossy(translated).into_owned()),
                    compressed,
                    text: into_value(text),
                })
            }
        }
    }

    /// Placeholder for a chunk whose framing could not be parsed at all.
    pub fn malformed(kind: TextKind, error: &Error) -> Self {
        Self {
            kind,
            keyword: String::new(),
            language: None,
            translated_keyword: None,
            compressed: false,
            text: TextValue::Undecodable {
                reason: error.to_string(),
            },
        }
    }
}

fn decode_body(method: u8, body: &[u8], limits: DecodeLimits) -> Result<Vec<u8>> {
    if method != COMPRESSION_ZLIB {
        return Err(Error::UnsupportedCompression(method));
    }
    inflate_zlib(body, limits)
}

fn into_value(text: Result<String>) -> TextValue {
    match text {
        Ok(text) => TextValue::Text(text),
        Err(e) => TextValue::Undecodable {
            reason: e.to_string(),
        },
    }
}

fn malformed(kind: TextKind, reason: &str) -> Error {
    Error::MalformedText {
        chunk_type: kind.chunk_type(),
        reason: reason.to_string(),
    }
}
