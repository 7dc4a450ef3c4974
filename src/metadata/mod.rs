// WAV metadata pipeline
//
// Raw bytes -> typed partitions (audio properties, BEXT, INFO, XML) ->
// one flat ordered map when crossing into downstream tooling.

pub mod map;

pub use map::MetadataMap;

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::bext::BextRecord;
use crate::config::ExtractorConfig;
use crate::error::{Error, Result};
use crate::field_mapping::{BextField, FieldMappings};
use crate::info::{parse_info_lists, InfoFields};
use crate::riff::{ids, AudioProperties, ChunkWalker, RiffHeader, WaveFormat};
use crate::utils::sanitize;
use crate::xml::{extract_xml_metadata, XmlFields};

/// Everything extracted from one WAV file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WavMetadata {
    pub audio: Option<AudioProperties>,
    pub bext: Option<BextRecord>,
    pub info: InfoFields,
    pub xml: Option<XmlFields>,
    /// Frame rate used for `duration_timecode`
    #[serde(skip)]
    timecode_fps: u32,
}

impl WavMetadata {
    /// Extract metadata from an in-memory file
    pub fn from_bytes(data: &[u8], config: &ExtractorConfig) -> Self {
        match RiffHeader::parse(data) {
            Ok(header) if !header.is_wave() => debug!(
                "RIFF form type {} is not WAVE; scanning anyway",
                String::from_utf8_lossy(&header.form_type)
            ),
            Ok(_) => {}
            Err(err) => debug!("{}; scanning anyway", err),
        }

        let mut metadata = WavMetadata {
            timecode_fps: config.timecode_fps,
            ..Default::default()
        };

        let mut format = None;
        let mut data_size = None;
        for chunk in ChunkWalker::top_level(data) {
            if chunk.is(ids::FMT) && config.parse_format && format.is_none() {
                format = WaveFormat::parse(chunk.payload)
                    .map_err(|err| debug!("fmt skipped: {}", err))
                    .ok();
            } else if chunk.is(ids::DATA) && data_size.is_none() {
                // The declared size, so a clamped data chunk still reports its length
                data_size = Some(u64::from(chunk.size));
            } else if chunk.is(ids::BEXT) && config.parse_bext && metadata.bext.is_none() {
                metadata.bext = BextRecord::parse(chunk.payload);
            }
        }

        if let Some(format) = format {
            metadata.audio = Some(AudioProperties::new(format, data_size.unwrap_or(0)));
        }
        if config.parse_info {
            metadata.info = parse_info_lists(data);
        }
        if config.parse_xml {
            metadata.xml = extract_xml_metadata(data, config);
        }

        debug!(
            audio = metadata.audio.is_some(),
            bext = metadata.bext.is_some(),
            info_tags = metadata.info.len(),
            xml = metadata.xml.is_some(),
            "metadata extracted"
        );
        metadata
    }

    /// Read and extract metadata from a file on disk
    pub fn read(path: impl AsRef<Path>, config: &ExtractorConfig) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(&data, config))
    }

    /// Whether nothing at all was found
    pub fn is_empty(&self) -> bool {
        self.audio.is_none()
            && self.bext.is_none()
            && self.info.is_empty()
            && self.xml.as_ref().map_or(true, XmlFields::is_empty)
    }

    /// Best available free-text description: BEXT, then INFO comment/title
    pub fn description(&self) -> Option<String> {
        let bext = self
            .bext
            .as_ref()
            .map(|bext| sanitize(&bext.description))
            .filter(|text| !text.is_empty());

        bext.or_else(|| {
            ["comment", "title"]
                .iter()
                .find_map(|name| self.info.get_named(name))
                .map(str::to_string)
        })
    }

    /// Merge all partitions into one flat map.
    ///
    /// Order: audio properties, BEXT fields, INFO tags, XML fields. Empty
    /// text values are omitted, as are absent loudness values.
    pub fn to_flat_map(&self) -> MetadataMap {
        let mut map = MetadataMap::new();

        if let Some(audio) = &self.audio {
            let format = &audio.format;
            map.insert(FieldMappings::SAMPLE_RATE, format.sample_rate.to_string());
            map.insert(FieldMappings::CHANNELS, format.channels.to_string());
            map.insert(FieldMappings::BITS_PER_SAMPLE, format.bits_per_sample.to_string());
            map.insert(FieldMappings::FRAMES, audio.frames.to_string());
            map.insert(
                FieldMappings::DURATION_SECONDS,
                format!("{:.3}", audio.duration_seconds),
            );
            map.insert(
                FieldMappings::DURATION_TIMECODE,
                audio.timecode(self.timecode_fps),
            );
        }

        if let Some(bext) = &self.bext {
            for field in BextField::ALL {
                if let Some(value) = bext_value(bext, field) {
                    map.insert(field.as_str(), value);
                }
            }
        }

        for (tag, value) in self.info.iter() {
            map.insert(tag, value);
        }

        if let Some(xml) = &self.xml {
            for (key, value) in xml.prefixed() {
                map.insert(key, value);
            }
        }

        map
    }
}

fn bext_value(bext: &BextRecord, field: BextField) -> Option<String> {
    let text = |value: &str| Some(sanitize(value)).filter(|v| !v.is_empty());
    let loudness = |value: Option<f64>| value.map(|v| format!("{:.2}", v));

    match field {
        BextField::Description => text(&bext.description),
        BextField::Originator => text(&bext.originator),
        BextField::OriginatorReference => text(&bext.originator_reference),
        BextField::OriginationDate => text(&bext.origination_date),
        BextField::OriginationTime => text(&bext.origination_time),
        BextField::TimeReference => Some(bext.time_reference.to_string()),
        BextField::Version => Some(bext.version.to_string()),
        BextField::Umid => Some(bext.umid_hex()).filter(|v| !v.is_empty()),
        BextField::LoudnessValue => loudness(bext.loudness_value),
        BextField::LoudnessRange => loudness(bext.loudness_range),
        BextField::MaxTruePeak => loudness(bext.max_true_peak),
        BextField::MaxMomentaryLoudness => loudness(bext.max_momentary_loudness),
        BextField::MaxShortTermLoudness => loudness(bext.max_short_term_loudness),
        BextField::CodingHistory => text(&bext.coding_history),
    }
}

/// Extract metadata from an in-memory file with default settings
pub fn extract_metadata(data: &[u8]) -> WavMetadata {
    WavMetadata::from_bytes(data, &ExtractorConfig::default())
}

/// Read metadata from a file with default settings
pub fn read_metadata(path: impl AsRef<Path>) -> Result<WavMetadata> {
    WavMetadata::read(path, &ExtractorConfig::default())
}
