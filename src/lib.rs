//! wavmeta - Broadcast WAV metadata extraction and UCS categorization
//!
//! Reads BEXT, LIST/INFO and embedded XML metadata from WAV files into one
//! flat ordered map, and classifies sound effects against a Universal
//! Category System taxonomy.

pub mod bext;
pub mod config;
pub mod error;
pub mod field_mapping;
pub mod info;
pub mod metadata;
pub mod riff;
pub mod ucs;
pub mod utils;
pub mod xml;

#[cfg(feature = "python")]
mod python;

use std::path::Path;

use serde::Serialize;

pub use bext::BextRecord;
pub use config::{CategorizerConfig, ExtractorConfig};
pub use error::{Error, ParseError, Result};
pub use info::InfoFields;
pub use metadata::{extract_metadata, read_metadata, MetadataMap, WavMetadata};
pub use riff::{AudioProperties, ChunkWalker};
pub use ucs::{categorize, Categorizer, ClassificationResult, Taxonomy, UcsCategory, UcsMatch};
pub use utils::sanitize;
pub use xml::{XmlDialect, XmlFields};

/// Metadata and classification of one file
#[derive(Debug, Clone, Serialize)]
pub struct Analysis<'a> {
    pub filename: String,
    pub metadata: WavMetadata,
    pub classification: ClassificationResult<'a>,
}

impl Analysis<'_> {
    /// Flat metadata map for downstream tooling
    pub fn flat_metadata(&self) -> MetadataMap {
        self.metadata.to_flat_map()
    }
}

/// Read a file, extract its metadata and classify it
pub fn analyze_file<'a>(
    path: impl AsRef<Path>,
    taxonomy: &'a Taxonomy,
    extractor: &ExtractorConfig,
    categorizer: &Categorizer,
) -> Result<Analysis<'a>> {
    let path = path.as_ref();
    let metadata = WavMetadata::read(path, extractor)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let classification = categorizer.classify(&filename, &metadata, taxonomy);

    Ok(Analysis {
        filename,
        metadata,
        classification,
    })
}
