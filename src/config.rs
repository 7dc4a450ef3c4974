// Extraction and categorization settings
//
// Both structs deserialize from JSON with every field optional; missing
// fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Controls which chunks are parsed and how embedded XML is cut out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Decode the `bext` chunk
    pub parse_bext: bool,
    /// Decode LIST/INFO chunks
    pub parse_info: bool,
    /// Search for embedded XML
    pub parse_xml: bool,
    /// Decode `fmt ` and derive audio properties
    pub parse_format: bool,
    /// Maximum XML block length when no closing tag is found
    pub xml_scan_limit: usize,
    /// Bytes after the XML marker skipped before looking for the next chunk id
    pub xml_fallback_skip: usize,
    /// Frame rate for the duration timecode
    pub timecode_fps: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            parse_bext: true,
            parse_info: true,
            parse_xml: true,
            parse_format: true,
            xml_scan_limit: 64 * 1024,
            xml_fallback_skip: 100,
            timecode_fps: 25,
        }
    }
}

impl ExtractorConfig {
    /// Load from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Controls UCS classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizerConfig {
    /// Fall back to fuzzy scoring when the filename has no UCS id prefix
    pub allow_guess: bool,
    /// Alternatives must score at least this fraction of the primary score
    pub alternative_ratio: f64,
    /// Maximum number of alternatives
    pub max_alternatives: usize,
    /// Primary scores below this are reported as low confidence
    pub min_score: f64,
    /// Let `UCS_ID`/`Category` values found in file metadata decide the category
    pub honor_metadata_overrides: bool,
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        CategorizerConfig {
            allow_guess: true,
            alternative_ratio: 0.7,
            max_alternatives: 5,
            min_score: 0.0,
            honor_metadata_overrides: true,
        }
    }
}

impl CategorizerConfig {
    /// Load from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.xml_scan_limit, 65536);
        assert_eq!(config.xml_fallback_skip, 100);
        assert_eq!(config.timecode_fps, 25);

        let config = CategorizerConfig::default();
        assert!(config.allow_guess);
        assert_eq!(config.max_alternatives, 5);
        assert_eq!(config.alternative_ratio, 0.7);
    }

    #[test]
    fn test_partial_json() {
        let config = ExtractorConfig::from_json_str(r#"{"parse_xml": false}"#).unwrap();
        assert!(!config.parse_xml);
        assert!(config.parse_bext);

        let config =
            CategorizerConfig::from_json_str(r#"{"allow_guess": false, "min_score": 12.5}"#).unwrap();
        assert!(!config.allow_guess);
        assert_eq!(config.min_score, 12.5);
        assert_eq!(config.max_alternatives, 5);
    }

    #[test]
    fn test_invalid_json() {
        assert!(ExtractorConfig::from_json_str("{").is_err());
        assert!(CategorizerConfig::from_json_str(r#"{"max_alternatives": "many"}"#).is_err());
    }
}
