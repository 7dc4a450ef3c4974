// Flat metadata key naming
//
// The flat map handed to downstream tooling has three partitions:
// - BEXT: documented field names (description, originator, ...)
// - LIST/INFO: the raw four-character tag (IART, INAM, ...)
// - XML: "{dialect}_{tag}" (ebucore_title, ...)
//
// Audio properties derived from `fmt `/`data` use plain snake_case names.
// This module also knows which keys carry UCS classification hints.

use crate::xml::XmlDialect;

/// BEXT fields, in flattening order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BextField {
    Description,
    Originator,
    OriginatorReference,
    OriginationDate,
    OriginationTime,
    TimeReference,
    Version,
    Umid,
    LoudnessValue,
    LoudnessRange,
    MaxTruePeak,
    MaxMomentaryLoudness,
    MaxShortTermLoudness,
    CodingHistory,
}

impl BextField {
    pub const ALL: [BextField; 14] = [
        BextField::Description,
        BextField::Originator,
        BextField::OriginatorReference,
        BextField::OriginationDate,
        BextField::OriginationTime,
        BextField::TimeReference,
        BextField::Version,
        BextField::Umid,
        BextField::LoudnessValue,
        BextField::LoudnessRange,
        BextField::MaxTruePeak,
        BextField::MaxMomentaryLoudness,
        BextField::MaxShortTermLoudness,
        BextField::CodingHistory,
    ];

    /// Flat map key
    pub fn as_str(&self) -> &'static str {
        match self {
            BextField::Description => "description",
            BextField::Originator => "originator",
            BextField::OriginatorReference => "originator_reference",
            BextField::OriginationDate => "origination_date",
            BextField::OriginationTime => "origination_time",
            BextField::TimeReference => "time_reference",
            BextField::Version => "version",
            BextField::Umid => "umid",
            BextField::LoudnessValue => "loudness_value",
            BextField::LoudnessRange => "loudness_range",
            BextField::MaxTruePeak => "max_true_peak",
            BextField::MaxMomentaryLoudness => "max_momentary_loudness",
            BextField::MaxShortTermLoudness => "max_short_term_loudness",
            BextField::CodingHistory => "coding_history",
        }
    }
}

/// Key constants for the non-BEXT partitions
pub struct FieldMappings;

impl FieldMappings {
    // LIST/INFO tags (Microsoft RIFF MCI)
    pub const INFO_ARTIST: &str = "IART";
    pub const INFO_TITLE: &str = "INAM";
    pub const INFO_COMMENT: &str = "ICMT";
    pub const INFO_COPYRIGHT: &str = "ICOP";
    pub const INFO_CREATION_DATE: &str = "ICRD";
    pub const INFO_GENRE: &str = "IGNR";
    pub const INFO_KEYWORDS: &str = "IKEY";
    pub const INFO_SOFTWARE: &str = "ISFT";
    pub const INFO_SUBJECT: &str = "ISBJ";
    pub const INFO_ENGINEER: &str = "IENG";
    pub const INFO_TECHNICIAN: &str = "ITCH";
    pub const INFO_SOURCE: &str = "ISRC";
    pub const INFO_PRODUCT: &str = "IPRD";

    // Audio properties
    pub const SAMPLE_RATE: &str = "sample_rate";
    pub const CHANNELS: &str = "channels";
    pub const BITS_PER_SAMPLE: &str = "bits_per_sample";
    pub const FRAMES: &str = "frames";
    pub const DURATION_SECONDS: &str = "duration_seconds";
    pub const DURATION_TIMECODE: &str = "duration_timecode";

    // UCS classification hints written by library tools into INFO or iXML
    pub const UCS_ID_KEYS: [&str; 2] = ["UCS_ID", "CatID"];
    pub const UCS_CATEGORY_KEYS: [&str; 1] = ["Category"];
    pub const UCS_SUBCATEGORY_KEYS: [&str; 1] = ["SubCategory"];

    /// INFO tag for a readable name (case-insensitive)
    pub fn info_tag_for(name: &str) -> Option<&'static str> {
        match name.to_lowercase().as_str() {
            "artist" => Some(Self::INFO_ARTIST),
            "title" | "name" => Some(Self::INFO_TITLE),
            "comment" => Some(Self::INFO_COMMENT),
            "copyright" => Some(Self::INFO_COPYRIGHT),
            "creation_date" | "date" => Some(Self::INFO_CREATION_DATE),
            "genre" => Some(Self::INFO_GENRE),
            "keywords" => Some(Self::INFO_KEYWORDS),
            "software" => Some(Self::INFO_SOFTWARE),
            "subject" => Some(Self::INFO_SUBJECT),
            "engineer" => Some(Self::INFO_ENGINEER),
            "technician" => Some(Self::INFO_TECHNICIAN),
            "source" => Some(Self::INFO_SOURCE),
            "product" => Some(Self::INFO_PRODUCT),
            _ => None,
        }
    }

    /// Whether a flat key names the given hint, ignoring case.
    ///
    /// Accepts the bare hint (`UCS_ID`, `catid`) or an XML element key with a
    /// known dialect prefix (`xml_CatID`, `bwfmetaedit_Category`). Attribute
    /// keys (`{dialect}_{tag}_{attr}`) never match.
    pub fn key_matches(key: &str, hint: &str) -> bool {
        if key.eq_ignore_ascii_case(hint) {
            return true;
        }
        match key.split_once('_') {
            Some((_, tag)) if XmlDialect::from_key(key).is_some() => {
                tag.eq_ignore_ascii_case(hint)
            }
            _ => false,
        }
    }
}
