// Universal Category System classification
//
// Order of precedence:
// 1. Filename starts with a taxonomy CatID -> that entry, score 100
// 2. Exact-only mode -> nothing
// 3. Fuzzy scoring over filename and description; best entry is primary,
//    close runners-up become alternatives
//
// `Categorizer::classify` additionally honors CatID/category hints found in
// the file's own metadata before any of the above.

pub mod resolve;
pub mod scoring;
pub mod taxonomy;

pub use resolve::resolve_from_metadata;
pub use scoring::{exact_id_match, score_entry, SearchText, EXACT_MATCH_SCORE};
pub use taxonomy::{Taxonomy, TaxonomyRow, UcsCategory};

use std::borrow::Cow;
use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::CategorizerConfig;
use crate::error::ParseError;
use crate::metadata::WavMetadata;

/// A taxonomy entry paired with its score.
///
/// Borrows the entry when it comes from the taxonomy; owns it when it was
/// built from file metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UcsMatch<'a> {
    #[serde(flatten)]
    pub category: Cow<'a, UcsCategory>,
    pub score: f64,
}

impl<'a> UcsMatch<'a> {
    pub fn new(category: Cow<'a, UcsCategory>, score: f64) -> Self {
        UcsMatch { category, score }
    }

    pub fn id(&self) -> &str {
        &self.category.id
    }

    pub fn into_owned(self) -> UcsMatch<'static> {
        UcsMatch {
            category: Cow::Owned(self.category.into_owned()),
            score: self.score,
        }
    }
}

/// How the primary category was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Filename starts with a CatID
    ExactId,
    /// CatID or category names found in the file's metadata
    Metadata,
    /// Keyword and name scoring
    Fuzzy,
}

/// Outcome of classifying one sound.
///
/// An empty result (no primary) means "no classification available".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationResult<'a> {
    pub primary: Option<UcsMatch<'a>>,
    pub alternatives: Vec<UcsMatch<'a>>,
    pub source: Option<MatchSource>,
}

impl<'a> ClassificationResult<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    fn single(found: UcsMatch<'a>, source: MatchSource) -> Self {
        ClassificationResult {
            primary: Some(found),
            alternatives: Vec::new(),
            source: Some(source),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
    }

    /// Whether the primary exists but scores below `min_score`
    pub fn is_low_confidence(&self, min_score: f64) -> bool {
        self.primary
            .as_ref()
            .map_or(false, |primary| primary.score < min_score)
    }

    pub fn into_owned(self) -> ClassificationResult<'static> {
        ClassificationResult {
            primary: self.primary.map(UcsMatch::into_owned),
            alternatives: self
                .alternatives
                .into_iter()
                .map(UcsMatch::into_owned)
                .collect(),
            source: self.source,
        }
    }
}

/// Classifies sounds against a taxonomy supplied per call
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    config: CategorizerConfig,
}

impl Categorizer {
    pub fn new(config: CategorizerConfig) -> Self {
        Categorizer { config }
    }

    pub fn config(&self) -> &CategorizerConfig {
        &self.config
    }

    /// Classify from filename and description alone
    pub fn categorize<'a>(
        &self,
        filename: &str,
        description: &str,
        taxonomy: &'a Taxonomy,
    ) -> ClassificationResult<'a> {
        if let Some(entry) = exact_id_match(filename, taxonomy) {
            debug!(filename, id = %entry.id, "filename carries CatID");
            return ClassificationResult::single(
                UcsMatch::new(Cow::Borrowed(entry), EXACT_MATCH_SCORE),
                MatchSource::ExactId,
            );
        }

        if !self.config.allow_guess {
            debug!(filename, "no CatID prefix and guessing disabled");
            return ClassificationResult::empty();
        }

        let search = SearchText::new(filename, description);
        let mut scored: Vec<UcsMatch<'a>> = taxonomy
            .iter()
            .filter_map(|entry| {
                let score = score_entry(&search, entry);
                (score > 0.0).then(|| UcsMatch::new(Cow::Borrowed(entry), score))
            })
            .collect();

        // Stable: equal scores keep taxonomy order
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let mut ranked = scored.into_iter();
        let Some(primary) = ranked.next() else {
            debug!(filename, "{}", ParseError::NoTaxonomyMatch);
            return ClassificationResult::empty();
        };

        let threshold = primary.score * self.config.alternative_ratio;
        let alternatives = ranked
            .take_while(|candidate| candidate.score >= threshold)
            .take(self.config.max_alternatives)
            .collect();

        ClassificationResult {
            primary: Some(primary),
            alternatives,
            source: Some(MatchSource::Fuzzy),
        }
    }

    /// Classify a file, letting metadata hints override name-based matching
    pub fn classify<'a>(
        &self,
        filename: &str,
        metadata: &WavMetadata,
        taxonomy: &'a Taxonomy,
    ) -> ClassificationResult<'a> {
        if self.config.honor_metadata_overrides {
            if let Some(found) = resolve_from_metadata(&metadata.to_flat_map(), taxonomy) {
                debug!(filename, id = found.id(), "classification taken from metadata");
                return ClassificationResult::single(found, MatchSource::Metadata);
            }
        }

        let description = metadata.description().unwrap_or_default();
        let result = self.categorize(filename, &description, taxonomy);

        if result.is_low_confidence(self.config.min_score) {
            if let Some(primary) = &result.primary {
                warn!(
                    filename,
                    id = primary.id(),
                    score = primary.score,
                    min_score = self.config.min_score,
                    "low-confidence classification"
                );
            }
        }
        result
    }
}

/// Classify with default settings, optionally restricted to CatID prefixes
pub fn categorize<'a>(
    filename: &str,
    description: &str,
    taxonomy: &'a Taxonomy,
    allow_guess: bool,
) -> ClassificationResult<'a> {
    let config = CategorizerConfig {
        allow_guess,
        ..CategorizerConfig::default()
    };
    Categorizer::new(config).categorize(filename, description, taxonomy)
}
