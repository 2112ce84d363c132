//! Configuration constants, input validation, and summarizer settings.

use std::path::Path;

use crate::error::{ExtractorError, Result};

/// Default maximum document size in bytes (50 MB).
///
/// Large CCD exports rarely exceed a few megabytes. Can be overridden with
/// the CLI `--max-size` flag.
pub const DEFAULT_MAX_DOCUMENT_SIZE: u64 = 50 * 1024 * 1024;

/// HTTP timeout for summarization requests, in seconds.
pub const DEFAULT_SUMMARIZER_TIMEOUT_SECS: u64 = 60;

/// Maximum number of attempts for a summarization request.
pub const SUMMARIZER_MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff between summarization attempts (milliseconds).
pub const SUMMARIZER_RETRY_BASE_DELAY_MS: u64 = 500;

/// Output token budget for a single-section summary.
pub const SECTION_SUMMARY_MAX_TOKENS: u32 = 200;

/// Output token budget for each section of the medical-data summary.
pub const MEDICAL_SUMMARY_MAX_TOKENS: u32 = 150;

/// Default summarization endpoint base URL.
pub const DEFAULT_SUMMARIZER_BASE_URL: &str = "https://api.openai.com";

/// Default summarization model.
pub const DEFAULT_SUMMARIZER_MODEL: &str = "gpt-4o-mini";

/// Text wrap width for summaries printed by the CLI.
pub const TEXT_WRAP_WIDTH: usize = 100;

/// Validate that a document path names an XML file.
///
/// # Examples
/// ```
/// use ccd_extractor::config::validate_document_path;
///
/// assert!(validate_document_path("records/patient.xml").is_ok());
/// assert!(validate_document_path("records/PATIENT.XML").is_ok());
/// assert!(validate_document_path("records/patient.json").is_err());
/// ```
pub fn validate_document_path(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let is_xml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));

    if is_xml {
        Ok(())
    } else {
        Err(ExtractorError::InvalidDocumentPath(
            path.display().to_string(),
        ))
    }
}

/// Settings for the HTTP summarization service.
///
/// NOTE: Do NOT derive `Debug` on this struct: `api_key` would be exposed.
#[derive(Clone)]
pub struct SummarizerConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl SummarizerConfig {
    /// Load configuration from environment variables.
    ///
    /// `SUMMARIZER_API_KEY` is required. `SUMMARIZER_API_BASE_URL`,
    /// `SUMMARIZER_MODEL` and `SUMMARIZER_TIMEOUT_SECS` fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SUMMARIZER_API_KEY")
            .map_err(|_| ExtractorError::Config("SUMMARIZER_API_KEY not set".into()))?;

        let api_base_url = std::env::var("SUMMARIZER_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_SUMMARIZER_BASE_URL.into());

        let model =
            std::env::var("SUMMARIZER_MODEL").unwrap_or_else(|_| DEFAULT_SUMMARIZER_MODEL.into());

        let timeout_secs = std::env::var("SUMMARIZER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SUMMARIZER_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            api_base_url,
            model,
            timeout_secs,
        })
    }

    /// Config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_SUMMARIZER_BASE_URL.into(),
            model: DEFAULT_SUMMARIZER_MODEL.into(),
            timeout_secs: DEFAULT_SUMMARIZER_TIMEOUT_SECS,
        }
    }

    /// Override the endpoint base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
