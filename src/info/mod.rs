// LIST/INFO chunk support
//
// LIST chunk layout:
// - "LIST" + size (LE u32)
// - List type (4 bytes); only "INFO" lists carry text tags
// - Sub-chunks: 4-character tag (IART, INAM, ICMT, ...) + size + NUL-terminated text
//
// The buffer is searched for "LIST" markers rather than walked, so INFO lists
// nested in other containers are found too. After each marker the search
// resumes four bytes later, not after the list. Overlapping or malformed lists
// may therefore be scanned more than once, but the scan always advances and
// always terminates.

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::field_mapping::FieldMappings;
use crate::metadata::MetadataMap;
use crate::riff::{ids, ChunkWalker, CHUNK_HEADER_SIZE};
use crate::utils::encoding::{decode_text, until_nul, TextEncoding};
use crate::utils::io::{find_bytes, fourcc, le_u32};
use crate::utils::sanitize;

/// LIST id + size + list type
const LIST_HEADER_SIZE: usize = 12;

/// Text tags from LIST/INFO chunks, keyed by their 4-character id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InfoFields {
    tags: MetadataMap,
}

impl InfoFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tag; a replaced tag keeps its original position
    pub fn insert(&mut self, tag: String, value: String) {
        self.tags.insert(tag, value);
    }

    /// Get a tag value by its 4-character id
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag)
    }

    /// Get a tag value by its readable name (`artist`, `comment`, ...)
    pub fn get_named(&self, name: &str) -> Option<&str> {
        FieldMappings::info_tag_for(name).and_then(|tag| self.get(tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter()
    }

    pub fn as_map(&self) -> &MetadataMap {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Collect the tags of every LIST/INFO chunk found in `data`
pub fn parse_info_lists(data: &[u8]) -> InfoFields {
    let mut fields = InfoFields::new();
    let mut offset = 0;

    while let Some(list_start) = find_bytes(data, ids::LIST, offset) {
        if list_start + LIST_HEADER_SIZE > data.len() {
            break;
        }

        let list_size = le_u32(data, list_start + 4).unwrap_or(0);
        let list_type = fourcc(data, list_start + 8).unwrap_or_default();

        if &list_type == ids::INFO {
            let end_of_list = (list_start + CHUNK_HEADER_SIZE).saturating_add(list_size as usize);
            parse_info_entries(data, list_start + LIST_HEADER_SIZE, end_of_list, &mut fields);
        } else {
            trace!(
                offset = list_start,
                "skipping LIST of type {}",
                String::from_utf8_lossy(&list_type)
            );
        }

        offset = list_start + ids::LIST.len();
    }

    fields
}

fn parse_info_entries(data: &[u8], start: usize, end_of_list: usize, fields: &mut InfoFields) {
    for chunk in ChunkWalker::bounded(data, start, end_of_list) {
        // A sub-chunk that would run past the list or the buffer ends this list.
        if chunk.is_truncated() {
            debug!(
                offset = chunk.offset,
                "INFO entry dropped: {}",
                ParseError::TruncatedChunk {
                    id: chunk.id_str().into_owned(),
                    declared: chunk.size,
                    available: chunk.payload.len(),
                }
            );
            break;
        }

        let value = sanitize(&decode_info_text(chunk.payload, &chunk.id_str()));
        if value.is_empty() {
            continue;
        }
        fields.insert(tag_name(&chunk.id), value);
    }
}

fn tag_name(id: &[u8; 4]) -> String {
    String::from_utf8_lossy(id).into_owned()
}

// INFO text is nominally ASCII; in practice UTF-8 and Latin-1 both occur.
fn decode_info_text(payload: &[u8], tag: &str) -> String {
    let raw = until_nul(payload);
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!(
                "{}",
                ParseError::UnrecognizedEncoding {
                    field: tag.to_string()
                }
            );
            decode_text(raw, TextEncoding::Latin1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub_chunk(id: &[u8; 4], text: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(id);
        out.extend_from_slice(&(text.len() as u32).to_le_bytes());
        out.extend_from_slice(text);
        if text.len() % 2 == 1 {
            out.push(0);
        }
        out
    }

    fn info_list(entries: &[Vec<u8>]) -> Vec<u8> {
        let body = entries.concat();
        let mut out = Vec::new();
        out.extend_from_slice(b"LIST");
        out.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
        out.extend_from_slice(b"INFO");
        out.extend(body);
        out
    }

    #[test]
    fn test_parse_basic_info() {
        let data = info_list(&[
            sub_chunk(b"IART", b"Jane Doe\0"),
            sub_chunk(b"INAM", b"Chicken Cackle\0"),
        ]);
        let fields = parse_info_lists(&data);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("IART"), Some("Jane Doe"));
        assert_eq!(fields.get("INAM"), Some("Chicken Cackle"));
        assert_eq!(fields.get_named("artist"), Some("Jane Doe"));
        let order: Vec<_> = fields.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["IART", "INAM"]);
    }

    #[test]
    fn test_odd_length_entries_are_aligned() {
        let data = info_list(&[
            sub_chunk(b"ICMT", b"odd"),
            sub_chunk(b"ISFT", b"Recorder 2\0"),
        ]);
        let fields = parse_info_lists(&data);
        assert_eq!(fields.get("ICMT"), Some("odd"));
        assert_eq!(fields.get("ISFT"), Some("Recorder 2"));
    }

    #[test]
    fn test_text_after_nul_ignored_and_sanitized() {
        let data = info_list(&[sub_chunk(b"ICMT", b"  two\t\tlines\r\n\0garbage\0")]);
        let fields = parse_info_lists(&data);
        assert_eq!(fields.get("ICMT"), Some("two lines"));
    }

    #[test]
    fn test_empty_values_skipped() {
        let data = info_list(&[sub_chunk(b"IGNR", b"\0\0"), sub_chunk(b"IKEY", b" \0")]);
        assert!(parse_info_lists(&data).is_empty());
    }

    #[test]
    fn test_entry_past_list_end_is_dropped() {
        let mut data = info_list(&[sub_chunk(b"IART", b"ok\0\0")]);
        // Claims 100 bytes but the buffer ends after 4.
        data.extend_from_slice(b"INAM");
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(b"cut\0");
        let list_size = (data.len() - 8) as u32;
        data[4..8].copy_from_slice(&list_size.to_le_bytes());

        let fields = parse_info_lists(&data);
        assert_eq!(fields.get("IART"), Some("ok"));
        assert_eq!(fields.get("INAM"), None);
    }

    #[test]
    fn test_non_info_lists_ignored() {
        let mut data = Vec::new();
        data.extend_from_slice(b"LIST");
        data.extend_from_slice(&12u32.to_le_bytes());
        data.extend_from_slice(b"adtl");
        data.extend_from_slice(&sub_chunk(b"labl", b"x\0\0\0"));
        assert!(parse_info_lists(&data).is_empty());
    }

    #[test]
    fn test_multiple_lists_merge() {
        let mut data = info_list(&[sub_chunk(b"IART", b"First\0")]);
        data.extend(info_list(&[
            sub_chunk(b"IART", b"Second\0"),
            sub_chunk(b"ICOP", b"(c) 2024\0"),
        ]));
        let fields = parse_info_lists(&data);
        assert_eq!(fields.get("IART"), Some("Second"));
        assert_eq!(fields.get("ICOP"), Some("(c) 2024"));
        assert_eq!(fields.iter().next().map(|(t, _)| t), Some("IART"));
    }

    #[test]
    fn test_nested_list_rescanned() {
        // A complete LIST/INFO block stored inside another list's ICMT payload
        let inner = info_list(&[sub_chunk(b"IART", b"Nested\0")]);
        let outer = info_list(&[
            sub_chunk(b"ICMT", &inner),
            sub_chunk(b"ISFT", b"Outer\0"),
        ]);
        let mut data = b"RIFF\0\0\0\0WAVE".to_vec();
        data.extend_from_slice(&outer);

        let fields = parse_info_lists(&data);
        assert_eq!(fields.get("ICMT"), Some("LIST"));
        assert_eq!(fields.get("ISFT"), Some("Outer"));
        assert_eq!(fields.get("IART"), Some("Nested"));
        let order: Vec<_> = fields.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["ICMT", "ISFT", "IART"]);
    }

    #[test]
    fn test_latin1_fallback() {
        let data = info_list(&[sub_chunk(b"IART", b"Ren\xe9\0")]);
        assert_eq!(parse_info_lists(&data).get("IART"), Some("René"));
    }

    #[test]
    fn test_truncated_list_header() {
        assert!(parse_info_lists(b"xxLISTab").is_empty());
        assert!(parse_info_lists(b"").is_empty());
    }
}
