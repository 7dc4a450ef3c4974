// Broadcast extension (bext) chunk
//
// bext layout (EBU Tech 3285, all integers little-endian):
// -   0..256  Description (ASCII, NUL-padded)
// - 256..288  Originator
// - 288..320  OriginatorReference
// - 320..330  OriginationDate  (yyyy-mm-dd)
// - 330..338  OriginationTime  (hh:mm:ss)
// - 338..346  TimeReference    (u64, samples since midnight)
// - 346..348  Version          (u16)
// - 348..412  UMID             (64 bytes, SMPTE 330M)
// - 412..422  Loudness fields  (5 x i16, 1/100 dB or LU, 0x8000 = unset)
// - 422..602  Reserved
// - 602..     CodingHistory    (ASCII, NUL-terminated)

use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::ParseError;
use crate::utils::encoding::{decode_fixed_ascii, has_non_ascii, until_nul};
use crate::utils::io::{le_u16, le_u64};

/// Fixed portion of the bext record
pub const BEXT_MIN_SIZE: usize = 602;

/// Raw value marking a loudness field as unset
pub const LOUDNESS_UNSET: u16 = 0x8000;

pub const UMID_SIZE: usize = 64;

/// Byte ranges of the text fields, in record order
pub mod layout {
    use std::ops::Range;

    pub const DESCRIPTION: Range<usize> = 0..256;
    pub const ORIGINATOR: Range<usize> = 256..288;
    pub const ORIGINATOR_REFERENCE: Range<usize> = 288..320;
    pub const ORIGINATION_DATE: Range<usize> = 320..330;
    pub const ORIGINATION_TIME: Range<usize> = 330..338;
    pub const TIME_REFERENCE: usize = 338;
    pub const VERSION: usize = 346;
    pub const UMID: Range<usize> = 348..412;
    pub const LOUDNESS_VALUE: usize = 412;
    pub const LOUDNESS_RANGE: usize = 414;
    pub const MAX_TRUE_PEAK: usize = 416;
    pub const MAX_MOMENTARY_LOUDNESS: usize = 418;
    pub const MAX_SHORT_TERM_LOUDNESS: usize = 420;
    pub const CODING_HISTORY: usize = 602;
}

/// Decoded bext record.
///
/// Text fields hold the ASCII content up to the first NUL, unsanitized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BextRecord {
    pub description: String,
    pub originator: String,
    pub originator_reference: String,
    pub origination_date: String,
    pub origination_time: String,
    /// Sample count since midnight
    pub time_reference: u64,
    pub version: u16,
    #[serde(serialize_with = "serialize_umid")]
    pub umid: [u8; UMID_SIZE],
    /// Integrated loudness, LUFS
    pub loudness_value: Option<f64>,
    /// Loudness range, LU
    pub loudness_range: Option<f64>,
    /// Maximum true peak level, dBTP
    pub max_true_peak: Option<f64>,
    /// Maximum momentary loudness, LUFS
    pub max_momentary_loudness: Option<f64>,
    /// Maximum short-term loudness, LUFS
    pub max_short_term_loudness: Option<f64>,
    pub coding_history: String,
}

impl Default for BextRecord {
    fn default() -> Self {
        BextRecord {
            description: String::new(),
            originator: String::new(),
            originator_reference: String::new(),
            origination_date: String::new(),
            origination_time: String::new(),
            time_reference: 0,
            version: 0,
            umid: [0; UMID_SIZE],
            loudness_value: None,
            loudness_range: None,
            max_true_peak: None,
            max_momentary_loudness: None,
            max_short_term_loudness: None,
            coding_history: String::new(),
        }
    }
}

impl BextRecord {
    /// Decode a bext chunk payload.
    ///
    /// Returns `None` when the payload is shorter than the fixed 602-byte record.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        match Self::try_parse(payload) {
            Ok(record) => Some(record),
            Err(err) => {
                debug!("bext skipped: {}", err);
                None
            }
        }
    }

    /// Decode a bext chunk payload, reporting why it was rejected
    pub fn try_parse(payload: &[u8]) -> Result<Self, ParseError> {
        if payload.len() < BEXT_MIN_SIZE {
            return Err(ParseError::TooShort {
                what: "bext chunk",
                needed: BEXT_MIN_SIZE,
                actual: payload.len(),
            });
        }

        let version = le_u16(payload, layout::VERSION).unwrap_or(0);
        let mut umid = [0u8; UMID_SIZE];
        umid.copy_from_slice(&payload[layout::UMID]);

        let loudness = |offset: usize| {
            if version == 0 {
                return None;
            }
            le_u16(payload, offset).and_then(scale_loudness)
        };

        Ok(BextRecord {
            description: text_field(payload, layout::DESCRIPTION, "description"),
            originator: text_field(payload, layout::ORIGINATOR, "originator"),
            originator_reference: text_field(
                payload,
                layout::ORIGINATOR_REFERENCE,
                "originator_reference",
            ),
            origination_date: text_field(payload, layout::ORIGINATION_DATE, "origination_date"),
            origination_time: text_field(payload, layout::ORIGINATION_TIME, "origination_time"),
            time_reference: le_u64(payload, layout::TIME_REFERENCE).unwrap_or(0),
            version,
            umid,
            loudness_value: loudness(layout::LOUDNESS_VALUE),
            loudness_range: loudness(layout::LOUDNESS_RANGE),
            max_true_peak: loudness(layout::MAX_TRUE_PEAK),
            max_momentary_loudness: loudness(layout::MAX_MOMENTARY_LOUDNESS),
            max_short_term_loudness: loudness(layout::MAX_SHORT_TERM_LOUDNESS),
            coding_history: text_field(
                payload,
                layout::CODING_HISTORY..payload.len(),
                "coding_history",
            ),
        })
    }

    /// UMID as upper-case hex, empty when every byte is zero
    pub fn umid_hex(&self) -> String {
        umid_to_hex(&self.umid)
    }

    /// Origination date, accepting any single-character separator
    pub fn origination_date(&self) -> Option<NaiveDate> {
        let normalized = normalize_separators(&self.origination_date, '-');
        NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok()
    }

    /// Origination time, accepting any single-character separator
    pub fn origination_time(&self) -> Option<NaiveTime> {
        let normalized = normalize_separators(&self.origination_time, ':');
        NaiveTime::parse_from_str(&normalized, "%H:%M:%S").ok()
    }

    /// Whether any loudness field is present
    pub fn has_loudness(&self) -> bool {
        [
            self.loudness_value,
            self.loudness_range,
            self.max_true_peak,
            self.max_momentary_loudness,
            self.max_short_term_loudness,
        ]
        .iter()
        .any(Option::is_some)
    }

    /// Encode the record back into a bext payload
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; BEXT_MIN_SIZE];

        write_text(&mut out, layout::DESCRIPTION, &self.description);
        write_text(&mut out, layout::ORIGINATOR, &self.originator);
        write_text(&mut out, layout::ORIGINATOR_REFERENCE, &self.originator_reference);
        write_text(&mut out, layout::ORIGINATION_DATE, &self.origination_date);
        write_text(&mut out, layout::ORIGINATION_TIME, &self.origination_time);

        let time_reference = layout::TIME_REFERENCE;
        out[time_reference..time_reference + 8].copy_from_slice(&self.time_reference.to_le_bytes());
        out[layout::VERSION..layout::VERSION + 2].copy_from_slice(&self.version.to_le_bytes());
        out[layout::UMID].copy_from_slice(&self.umid);

        let loudness = [
            (layout::LOUDNESS_VALUE, self.loudness_value),
            (layout::LOUDNESS_RANGE, self.loudness_range),
            (layout::MAX_TRUE_PEAK, self.max_true_peak),
            (layout::MAX_MOMENTARY_LOUDNESS, self.max_momentary_loudness),
            (layout::MAX_SHORT_TERM_LOUDNESS, self.max_short_term_loudness),
        ];
        for (offset, value) in loudness {
            let raw = match value {
                Some(v) => ((v * 100.0).round() as i16) as u16,
                None => LOUDNESS_UNSET,
            };
            out[offset..offset + 2].copy_from_slice(&raw.to_le_bytes());
        }

        out.extend_from_slice(self.coding_history.as_bytes());
        out
    }
}

fn text_field(payload: &[u8], range: std::ops::Range<usize>, field: &str) -> String {
    let raw = until_nul(&payload[range]);
    if has_non_ascii(raw) {
        debug!(
            "{}",
            ParseError::UnrecognizedEncoding {
                field: field.to_string()
            }
        );
    }
    decode_fixed_ascii(raw)
}

fn write_text(out: &mut [u8], range: std::ops::Range<usize>, value: &str) {
    let bytes = value.as_bytes();
    let len = bytes.len().min(range.len());
    out[range.start..range.start + len].copy_from_slice(&bytes[..len]);
}

// The sentinel test runs on the raw word, before the sign is interpreted.
fn scale_loudness(raw: u16) -> Option<f64> {
    if raw == LOUDNESS_UNSET {
        return None;
    }
    Some(f64::from(raw as i16) / 100.0)
}

fn normalize_separators(value: &str, separator: char) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c.is_ascii_digit() { c } else { separator })
        .collect()
}

fn umid_to_hex(umid: &[u8]) -> String {
    if umid.iter().all(|&b| b == 0) {
        return String::new();
    }
    hex::encode_upper(umid)
}

fn serialize_umid<S: Serializer>(umid: &[u8; UMID_SIZE], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&umid_to_hex(umid))
}
