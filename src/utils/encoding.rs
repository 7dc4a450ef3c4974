// Encoding utilities

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Text encodings found in WAV metadata chunks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextEncoding {
    /// Seven-bit ASCII; other bytes are dropped
    Ascii,
    /// ISO-8859-1 / Windows-1252
    Latin1,
    Utf8,
}

/// Cut `data` at its first NUL byte
pub fn until_nul(data: &[u8]) -> &[u8] {
    match data.iter().position(|&b| b == 0) {
        Some(pos) => &data[..pos],
        None => data,
    }
}

/// Decode text with specified encoding.
///
/// Decoding never fails: invalid sequences are dropped (ASCII) or replaced
/// with U+FFFD (UTF-8).
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Ascii => data
            .iter()
            .filter(|b| b.is_ascii())
            .map(|&b| b as char)
            .collect(),
        TextEncoding::Latin1 => WINDOWS_1252.decode(data).0.into_owned(),
        TextEncoding::Utf8 => UTF_8.decode(data).0.into_owned(),
    }
}

/// Decode a fixed-width, NUL-terminated ASCII field
pub fn decode_fixed_ascii(data: &[u8]) -> String {
    decode_text(until_nul(data), TextEncoding::Ascii)
}

/// Whether the slice holds bytes the ASCII decoder would discard
pub fn has_non_ascii(data: &[u8]) -> bool {
    data.iter().any(|b| !b.is_ascii())
}
