// Byte-slice readers for RIFF structures
//
// RIFF is little-endian throughout. Every reader returns `None` instead of
// panicking when the requested range runs past the end of the slice.

/// Read little-endian 16-bit unsigned integer at `offset`
pub fn le_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read little-endian 16-bit signed integer at `offset`
pub fn le_i16(data: &[u8], offset: usize) -> Option<i16> {
    le_u16(data, offset).map(|v| v as i16)
}

/// Read little-endian 32-bit unsigned integer at `offset`
pub fn le_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read little-endian 64-bit unsigned integer at `offset`
pub fn le_u64(data: &[u8], offset: usize) -> Option<u64> {
    let bytes = data.get(offset..offset.checked_add(8)?)?;
    let mut buffer = [0u8; 8];
    buffer.copy_from_slice(bytes);
    Some(u64::from_le_bytes(buffer))
}

/// Read a four-character code at `offset`
pub fn fourcc(data: &[u8], offset: usize) -> Option<[u8; 4]> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    let mut id = [0u8; 4];
    id.copy_from_slice(bytes);
    Some(id)
}

/// Slice `data[start..end]`, clamping `end` to the slice length.
///
/// Returns an empty slice when `start` is already past the end.
pub fn clamped(data: &[u8], start: usize, end: usize) -> &[u8] {
    let end = end.min(data.len());
    if start >= end {
        return &[];
    }
    &data[start..end]
}

/// Find the first occurrence of `needle` in `haystack` at or after `from`
pub fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
