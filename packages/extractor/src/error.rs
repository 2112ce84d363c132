//! Error types for the extractor.
//!
//! Structural absence (a missing column, a missing demographic attribute, a
//! section that a bulk extraction asked for but the document lacks) is not an
//! error and is reported as an empty or `None` value. Only malformed input,
//! an explicitly requested section that does not exist, and failures of the
//! external summarization service surface here.

use thiserror::Error;

/// Main error type for the extractor library.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The input is empty, not UTF-8, or otherwise unusable as a document.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The input is not well-formed XML.
    #[error("Malformed document: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// No section carries the requested title.
    #[error("Section '{0}' not found")]
    SectionNotFound(String),

    /// The document path was rejected before reading.
    #[error("Invalid document path: '{0}'. Expected a file ending in .xml")]
    InvalidDocumentPath(String),

    /// The document exceeds the configured size limit.
    #[error("Document is {size} bytes, exceeding the limit of {max} bytes")]
    DocumentTooLarge { size: u64, max: u64 },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The summarization service could not produce a summary.
    #[error("Summarization unavailable: {0}")]
    SummarizationUnavailable(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ExtractorError {
    /// Whether this error only reports that a requested section is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SectionNotFound(_))
    }

    /// Whether this error belongs to the malformed-input category.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedDocument(_) | Self::XmlParse(_))
    }
}

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, ExtractorError>;
