// Strict XML parsing with xml-rs

use xml::reader::{ParserConfig, XmlEvent};

use crate::error::ParseError;
use crate::metadata::MetadataMap;
use crate::utils::sanitize;

/// Element whose end tag has not been seen yet
struct OpenElement {
    tag: String,
    attributes: Vec<(String, String)>,
    /// Text before the first child element
    text: String,
    has_child: bool,
}

/// Parses a well-formed document into a flat `tag -> text` map.
///
/// Every element with non-blank leading text contributes `tag`, every
/// non-blank attribute contributes `tag_attr`. Namespace prefixes are
/// stripped. Later occurrences of a key replace earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredXmlParser;

impl StructuredXmlParser {
    pub fn parse(&self, document: &str) -> Result<MetadataMap, ParseError> {
        let reader = ParserConfig::new()
            .trim_whitespace(false)
            .cdata_to_characters(true)
            .create_reader(document.as_bytes());

        let mut fields = MetadataMap::new();
        let mut stack: Vec<OpenElement> = Vec::new();

        for event in reader {
            match event.map_err(|e| ParseError::XmlParseFailure(e.to_string()))? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    if let Some(parent) = stack.last_mut() {
                        parent.has_child = true;
                    }
                    stack.push(OpenElement {
                        tag: name.local_name,
                        attributes: attributes
                            .into_iter()
                            .map(|attr| (attr.name.local_name, attr.value))
                            .collect(),
                        text: String::new(),
                        has_child: false,
                    });
                }
                XmlEvent::Characters(text) | XmlEvent::Whitespace(text) => {
                    if let Some(current) = stack.last_mut() {
                        if !current.has_child {
                            current.text.push_str(&text);
                        }
                    }
                }
                XmlEvent::EndElement { .. } => {
                    if let Some(element) = stack.pop() {
                        emit(&mut fields, element);
                    }
                }
                XmlEvent::EndDocument => break,
                _ => {}
            }
        }

        Ok(fields)
    }
}

fn emit(fields: &mut MetadataMap, element: OpenElement) {
    let text = sanitize(&element.text);
    if !text.is_empty() {
        fields.insert(element.tag.clone(), text);
    }

    for (name, value) in element.attributes {
        let value = sanitize(&value);
        if !value.is_empty() {
            fields.insert(format!("{}_{}", element.tag, name), value);
        }
    }
}
