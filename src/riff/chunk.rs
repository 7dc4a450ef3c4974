// RIFF chunk walker
//
// A RIFF body is a sequence of (4-byte id, 4-byte LE size, payload) records.
// Payloads of odd length are followed by one pad byte so that every header
// starts on a word boundary.

use std::borrow::Cow;

use tracing::debug;

use crate::error::ParseError;
use crate::riff::{RIFF_MAGIC, WAVE_FORM};
use crate::utils::io::{fourcc, le_u32};

/// Size of the outer `RIFF....WAVE` header
pub const RIFF_HEADER_SIZE: usize = 12;

/// Size of a chunk header (id + size)
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Outer RIFF header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiffHeader {
    pub form_type: [u8; 4],
    pub declared_size: u32,
}

impl RiffHeader {
    /// Parse the 12-byte header at the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < RIFF_HEADER_SIZE {
            return Err(ParseError::TooShort {
                what: "RIFF header",
                needed: RIFF_HEADER_SIZE,
                actual: data.len(),
            });
        }
        let magic = fourcc(data, 0).unwrap_or_default();
        let form_type = fourcc(data, 8).unwrap_or_default();
        if &magic != RIFF_MAGIC {
            return Err(ParseError::UnrecognizedEncoding {
                field: "RIFF magic".to_string(),
            });
        }

        Ok(RiffHeader {
            form_type,
            declared_size: le_u32(data, 4).unwrap_or(0),
        })
    }

    pub fn is_wave(&self) -> bool {
        &self.form_type == WAVE_FORM
    }
}

/// One chunk borrowed from the scanned buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk<'a> {
    pub id: [u8; 4],
    /// Size as declared in the header
    pub size: u32,
    /// Payload, clamped to the bytes actually available
    pub payload: &'a [u8],
    /// Offset of the chunk header in the scanned buffer
    pub offset: usize,
}

impl<'a> Chunk<'a> {
    /// Chunk id as text, lossily decoded
    pub fn id_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.id)
    }

    pub fn is(&self, id: &[u8; 4]) -> bool {
        &self.id == id
    }

    /// Whether the declared size ran past the end of the buffer
    pub fn is_truncated(&self) -> bool {
        (self.payload.len() as u64) < u64::from(self.size)
    }

    /// Describe the truncation, if any
    pub fn truncation(&self) -> Option<ParseError> {
        self.is_truncated().then(|| ParseError::TruncatedChunk {
            id: self.id_str().into_owned(),
            declared: self.size,
            available: self.payload.len(),
        })
    }
}

/// Lazy iterator over the chunks of a buffer region.
///
/// The walker is `Clone`, so a scan can be restarted from any point by
/// cloning it. It never panics on malformed input: a header that does not
/// fit ends the walk and an oversized payload is clamped.
#[derive(Debug, Clone)]
pub struct ChunkWalker<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ChunkWalker<'a> {
    /// Walk `data` from `start` to the end of the buffer
    pub fn new(data: &'a [u8], start: usize) -> Self {
        Self::bounded(data, start, data.len())
    }

    /// Walk `data` from `start`, never reading at or beyond `end`
    pub fn bounded(data: &'a [u8], start: usize, end: usize) -> Self {
        ChunkWalker {
            data,
            pos: start,
            end: end.min(data.len()),
        }
    }

    /// Walk the top-level chunks after the `RIFF....WAVE` header
    pub fn top_level(data: &'a [u8]) -> Self {
        Self::new(data, RIFF_HEADER_SIZE)
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// First chunk with the given id
    pub fn find_id(mut self, id: &[u8; 4]) -> Option<Chunk<'a>> {
        self.find_map(|chunk| chunk.is(id).then_some(chunk))
    }
}

impl<'a> Iterator for ChunkWalker<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let header_end = self.pos.checked_add(CHUNK_HEADER_SIZE)?;
        if header_end > self.end {
            self.pos = self.end;
            return None;
        }

        let id = fourcc(self.data, self.pos)?;
        let size = le_u32(self.data, self.pos + 4)?;
        let offset = self.pos;

        let declared_end = header_end.saturating_add(size as usize);
        let payload = &self.data[header_end..declared_end.min(self.end)];

        let chunk = Chunk {
            id,
            size,
            payload,
            offset,
        };
        if let Some(truncation) = chunk.truncation() {
            debug!(offset, "{}", truncation);
        }

        let pad = (size & 1) as usize;
        self.pos = declared_end.saturating_add(pad).min(self.end);

        Some(chunk)
    }
}
