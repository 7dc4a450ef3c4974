// RIFF/WAVE container support
//
// WAV File Structure:
// - RIFF header (12 bytes): "RIFF" + size (LE u32) + "WAVE"
// - Chunks: id (4 bytes) + size (LE u32) + payload, word-aligned
//   - fmt : stream format
//   - data: audio samples
//   - bext: broadcast extension (EBU Tech 3285)
//   - LIST: container, type "INFO" holds text tags
//   - axml/iXML/_PMX: embedded XML documents

pub mod chunk;
pub mod format;

pub use chunk::{Chunk, ChunkWalker, RiffHeader, CHUNK_HEADER_SIZE, RIFF_HEADER_SIZE};
pub use format::{AudioProperties, FormatTag, WaveFormat};

pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";
pub const WAVE_FORM: &[u8; 4] = b"WAVE";

/// Chunk ids this crate dispatches on
pub mod ids {
    pub const FMT: &[u8; 4] = b"fmt ";
    pub const DATA: &[u8; 4] = b"data";
    pub const BEXT: &[u8; 4] = b"bext";
    pub const LIST: &[u8; 4] = b"LIST";
    pub const INFO: &[u8; 4] = b"INFO";
    pub const PEAK: &[u8; 4] = b"PEAK";
}
