// Embedded XML metadata support
//
// Broadcast WAV files carry XML in several places (axml, iXML, _PMX, or
// vendor chunks). Rather than trusting chunk ids, the whole buffer is searched
// for the start markers of known dialects. Only the first dialect found, in
// priority order, is extracted from a file.
//
// Block end detection:
// 1. The dialect's closing tag (or, for generic XML, the root element's)
// 2. Otherwise the next well-known WAV chunk id after the marker
// 3. Never more than `xml_scan_limit` bytes past the marker

pub mod dialect;
pub mod heuristic;
pub mod structured;

pub use dialect::XmlDialect;
pub use heuristic::HeuristicXmlParser;
pub use structured::StructuredXmlParser;

use std::borrow::Cow;

use serde::Serialize;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::metadata::MetadataMap;
use crate::riff::ids;
use crate::utils::encoding::{decode_text, TextEncoding};
use crate::utils::io::find_bytes;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Chunk ids that mark the end of an unterminated XML block
const FALLBACK_END_MARKERS: [&[u8; 4]; 5] =
    [ids::DATA, ids::FMT, ids::LIST, ids::BEXT, ids::PEAK];

/// How an XML block was turned into fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum XmlStrategy {
    Structured,
    Heuristic,
}

impl XmlStrategy {
    /// Parse with the strict parser, falling back to the heuristic one
    pub fn parse(block: &str) -> (XmlStrategy, MetadataMap) {
        let block = block.trim();
        match StructuredXmlParser.parse(&with_declaration(block)) {
            Ok(fields) => (XmlStrategy::Structured, fields),
            Err(err) => {
                debug!("{}; using heuristic extraction", err);
                (XmlStrategy::Heuristic, HeuristicXmlParser.parse(block))
            }
        }
    }
}

/// Fields extracted from the single XML block of a file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XmlFields {
    pub dialect: XmlDialect,
    pub strategy: XmlStrategy,
    /// Unprefixed keys (`title`, `title_lang`, ...)
    pub fields: MetadataMap,
}

impl XmlFields {
    /// Keys prefixed with the dialect name, as `{dialect}_{key}`
    pub fn prefixed(&self) -> impl Iterator<Item = (String, &str)> {
        let prefix = self.dialect.prefix();
        self.fields
            .iter()
            .map(move |(key, value)| (format!("{}_{}", prefix, key), value))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Locate, cut out and parse the first recognized XML block in `data`
pub fn extract_xml_metadata(data: &[u8], config: &ExtractorConfig) -> Option<XmlFields> {
    let (dialect, start) = XmlDialect::PRIORITY
        .into_iter()
        .find_map(|d| find_bytes(data, d.start_marker(), 0).map(|pos| (d, pos)))?;

    let end = find_xml_end(data, start, dialect, config)?;
    if end <= start {
        return None;
    }

    let block = decode_text(&data[start..end], TextEncoding::Utf8);
    let (strategy, fields) = XmlStrategy::parse(&block);
    debug!(
        dialect = %dialect,
        offset = start,
        length = end - start,
        fields = fields.len(),
        "extracted embedded XML"
    );

    Some(XmlFields {
        dialect,
        strategy,
        fields,
    })
}

/// End offset (exclusive) of the XML block starting at `start`
pub fn find_xml_end(
    data: &[u8],
    start: usize,
    dialect: XmlDialect,
    config: &ExtractorConfig,
) -> Option<usize> {
    let closing = match dialect.closing_tag() {
        Some(tag) => tag.to_vec(),
        None => {
            let root = root_element_name(data, start)?;
            [b"</".as_slice(), root, b">".as_slice()].concat()
        }
    };

    if let Some(pos) = find_bytes(data, &closing, start) {
        return Some(pos + closing.len());
    }

    let scan_from = start.saturating_add(config.xml_fallback_skip);
    let next_chunk = FALLBACK_END_MARKERS
        .iter()
        .filter_map(|marker| find_bytes(data, *marker, scan_from))
        .min()
        .unwrap_or(data.len());

    Some(next_chunk.min(start.saturating_add(config.xml_scan_limit)))
}

/// Name of the first element opened at or after `start`, skipping
/// processing instructions, comments and DOCTYPE declarations
fn root_element_name(data: &[u8], start: usize) -> Option<&[u8]> {
    let mut pos = start;
    loop {
        let open = find_bytes(data, b"<", pos)?;
        let close = find_bytes(data, b">", open)?;
        match data.get(open + 1) {
            Some(b'?') | Some(b'!') => pos = close + 1,
            _ => {
                let tag = &data[open + 1..close];
                let name_len = tag
                    .iter()
                    .position(|b| b.is_ascii_whitespace() || *b == b'/')
                    .unwrap_or(tag.len());
                return (name_len > 0).then(|| &tag[..name_len]);
            }
        }
    }
}

fn with_declaration(block: &str) -> Cow<'_, str> {
    if block.starts_with("<?xml") {
        Cow::Borrowed(block)
    } else {
        Cow::Owned(format!("{}{}", XML_DECLARATION, block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractorConfig {
        ExtractorConfig::default()
    }

    fn wav_with(xml: &str) -> Vec<u8> {
        let mut data = b"RIFF\0\0\0\0WAVEfmt \x10\0\0\0".to_vec();
        data.extend_from_slice(&[0u8; 16]);
        data.extend_from_slice(b"iXML");
        data.extend_from_slice(&(xml.len() as u32).to_le_bytes());
        data.extend_from_slice(xml.as_bytes());
        data
    }

    #[test]
    fn test_no_xml() {
        assert!(extract_xml_metadata(b"RIFF....WAVEdata", &config()).is_none());
    }

    #[test]
    fn test_bwfmetaedit_block() {
        let data = wav_with(
            "<BWFMetaEdit><Core><Description>Wind gust</Description></Core></BWFMetaEdit>",
        );
        let xml = extract_xml_metadata(&data, &config()).unwrap();
        assert_eq!(xml.dialect, XmlDialect::BwfMetaEdit);
        assert_eq!(xml.strategy, XmlStrategy::Structured);
        assert_eq!(xml.get("Description"), Some("Wind gust"));
        let keys: Vec<_> = xml.prefixed().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["bwfmetaedit_Description"]);
    }

    #[test]
    fn test_priority_beats_position() {
        let data = wav_with(
            "<?xml version=\"1.0\"?><doc><a>1</a></doc><ProTools><Name>Session</Name></ProTools>",
        );
        let xml = extract_xml_metadata(&data, &config()).unwrap();
        assert_eq!(xml.dialect, XmlDialect::ProTools);
        assert_eq!(xml.get("Name"), Some("Session"));
        assert_eq!(xml.get("a"), None);
    }

    #[test]
    fn test_generic_root_inferred() {
        let data = wav_with(
            "<?xml version=\"1.0\"?>\n<!-- c --><BWFXML><IXML_VERSION>1.5</IXML_VERSION></BWFXML>trailing",
        );
        let xml = extract_xml_metadata(&data, &config()).unwrap();
        assert_eq!(xml.dialect, XmlDialect::Generic);
        assert_eq!(xml.strategy, XmlStrategy::Structured);
        assert_eq!(xml.get("IXML_VERSION"), Some("1.5"));
    }

    #[test]
    fn test_unterminated_block_falls_back() {
        let mut data = wav_with("<BWFMetaEdit><Core><Originator>Field Rec</Originator>");
        data.extend_from_slice(&[b' '; 120]);
        data.extend_from_slice(b"data\x04\0\0\0\0\0\0\0");
        let xml = extract_xml_metadata(&data, &config()).unwrap();
        assert_eq!(xml.strategy, XmlStrategy::Heuristic);
        assert_eq!(xml.get("Originator"), Some("Field Rec"));
        assert_eq!(xml.get("attr_version"), None);
    }

    #[test]
    fn test_find_end_respects_scan_limit() {
        let mut data = b"<axml>".to_vec();
        data.extend_from_slice(&vec![b'x'; 1000]);
        let config = ExtractorConfig {
            xml_scan_limit: 200,
            ..ExtractorConfig::default()
        };
        assert_eq!(find_xml_end(&data, 0, XmlDialect::Axml, &config), Some(200));
    }

    #[test]
    fn test_find_end_uses_next_chunk() {
        let mut data = b"<axml>".to_vec();
        data.extend_from_slice(&vec![b'x'; 150]);
        data.extend_from_slice(b"PEAK");
        data.extend_from_slice(&vec![b'y'; 50]);
        // "data" inside the skipped region is ignored.
        data[20..24].copy_from_slice(b"data");
        assert_eq!(find_xml_end(&data, 0, XmlDialect::Axml, &config()), Some(156));
    }

    #[test]
    fn test_root_element_name() {
        let data = b"<?xml version=\"1.0\"?><!DOCTYPE x><root attr=\"1\">";
        assert_eq!(root_element_name(data, 0), Some(&b"root"[..]));
        assert_eq!(root_element_name(b"<?xml?>", 0), None);
    }

    #[test]
    fn test_declaration_added() {
        assert!(with_declaration("<a>1</a>").starts_with("<?xml version="));
        assert_eq!(with_declaration("<?xml version=\"1.0\"?><a/>"), "<?xml version=\"1.0\"?><a/>");
    }
}
