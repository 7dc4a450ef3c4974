// Best-effort tag recovery for documents the strict parser rejects

use std::sync::OnceLock;

use regex::Regex;

use crate::metadata::MetadataMap;
use crate::utils::sanitize;

fn element_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // <tag ...>value</...> with no nested markup in the value
        Regex::new(r"<([^/>]+)>([^<]+)</[^>]+>").expect("Invalid regex")
    })
}

fn attribute_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"(\w+)="([^"]+)""#).expect("Invalid regex"))
}

/// Regex-driven extractor for malformed or truncated XML.
///
/// Leaf elements become `tag -> text` entries and every `name="value"`
/// pair becomes `attr_name -> value`. It never fails; input with nothing
/// recognizable yields an empty map.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicXmlParser;

impl HeuristicXmlParser {
    pub fn parse(&self, document: &str) -> MetadataMap {
        let mut fields = MetadataMap::new();

        for caps in element_regex().captures_iter(document) {
            let tag = element_name(&caps[1]);
            let value = sanitize(&caps[2]);
            if !tag.is_empty() && !value.is_empty() {
                fields.insert(tag, value);
            }
        }

        for caps in attribute_regex().captures_iter(document) {
            let value = sanitize(&caps[2]);
            if !value.is_empty() {
                fields.insert(format!("attr_{}", &caps[1]), value);
            }
        }

        fields
    }
}

/// Local element name from an opening tag body such as `dc:title lang="en"`
fn element_name(tag: &str) -> String {
    let qualified = tag.split_whitespace().next().unwrap_or("");
    let local = qualified.rsplit(':').next().unwrap_or("");
    local
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
