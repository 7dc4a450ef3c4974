// Error types
//
// Parsing is best-effort: `ParseError` values describe why a step produced an
// empty or partial result and are logged, never propagated to the caller.
// `Error` is reserved for failures the caller must see.

use std::path::PathBuf;

/// Recoverable outcomes of a single parser step
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A chunk declared more bytes than the buffer holds; the payload was clamped
    #[error("chunk '{id}' declares {declared} bytes but only {available} remain")]
    TruncatedChunk {
        id: String,
        declared: u32,
        available: usize,
    },

    /// A fixed-layout record is shorter than its minimum size
    #[error("{what} needs at least {needed} bytes, got {actual}")]
    TooShort {
        what: &'static str,
        needed: usize,
        actual: usize,
    },

    /// Text held bytes outside the expected encoding; they were decoded lossily
    #[error("field '{field}' contains bytes outside its encoding")]
    UnrecognizedEncoding { field: String },

    /// Strict XML parsing failed; the heuristic extractor takes over
    #[error("XML parse failure: {0}")]
    XmlParseFailure(String),

    /// No taxonomy entry scored above zero
    #[error("no taxonomy entry matched")]
    NoTaxonomyMatch,
}

/// Hard failures surfaced to the caller
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid taxonomy: {0}")]
    Taxonomy(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
