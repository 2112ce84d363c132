//! Text summarization capability.
//!
//! Summaries come from an external service. The extraction code only sees
//! the [`Summarizer`] trait, so tests can substitute a fake and a failing
//! service never affects extraction results.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::{SummarizerConfig, SUMMARIZER_MAX_ATTEMPTS, SUMMARIZER_RETRY_BASE_DELAY_MS};
use crate::error::{ExtractorError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("ccd-extractor/", env!("CARGO_PKG_VERSION"));

/// Trait for summarization services, enabling mocking in tests.
pub trait Summarizer: Send + Sync {
    /// Summarize `prompt` in at most `max_output_tokens` tokens.
    ///
    /// Fails with [`ExtractorError::SummarizationUnavailable`] when the
    /// service cannot be reached or returns no usable text.
    fn summarize(&self, prompt: &str, max_output_tokens: u32) -> Result<String>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// NOTE: Do NOT derive `Debug` on this struct: `api_key` would be exposed.
pub struct HttpSummarizer {
    http: Client,
    api_key: String,
    api_base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl HttpSummarizer {
    /// Create a client from configuration.
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ExtractorError::SummarizationUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.clone(),
            model: config.model.clone(),
        })
    }
}

impl Summarizer for HttpSummarizer {
    fn summarize(&self, prompt: &str, max_output_tokens: u32) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.api_base_url);
        let body = serde_json::to_vec(&ChatRequest {
            model: &self.model,
            max_tokens: max_output_tokens,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        })?;

        let mut last_error: Option<String> = None;

        for attempt in 0..SUMMARIZER_MAX_ATTEMPTS {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1000ms, ...
                let delay = SUMMARIZER_RETRY_BASE_DELAY_MS * (1 << (attempt - 1));
                tracing::debug!(attempt, delay_ms = delay, "Retrying summarization after delay");
                thread::sleep(Duration::from_millis(delay));
            }

            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone())
                .send();

            match response {
                Ok(response) => {
                    let status = response.status();

                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        tracing::warn!(
                            status = %status,
                            attempt = attempt + 1,
                            max_attempts = SUMMARIZER_MAX_ATTEMPTS,
                            "Summarization service error, will retry"
                        );
                        last_error = Some(format!("service responded with {status}"));
                        continue;
                    }

                    // Other client errors won't succeed on retry
                    if !status.is_success() {
                        let text = response.text().unwrap_or_default();
                        return Err(ExtractorError::SummarizationUnavailable(format!(
                            "service responded with {status}: {text}"
                        )));
                    }

                    let bytes = response
                        .bytes()
                        .map_err(|e| ExtractorError::SummarizationUnavailable(e.to_string()))?;
                    return parse_completion(&bytes);
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_attempts = SUMMARIZER_MAX_ATTEMPTS,
                        "Connection to summarization service failed, will retry"
                    );
                    last_error = Some(e.to_string());
                }
                Err(e) => return Err(ExtractorError::SummarizationUnavailable(e.to_string())),
            }
        }

        Err(ExtractorError::SummarizationUnavailable(format!(
            "gave up after {SUMMARIZER_MAX_ATTEMPTS} attempts: {}",
            last_error.unwrap_or_else(|| "unknown error".to_string())
        )))
    }
}

/// Pull the trimmed completion text out of a chat-completions response body.
fn parse_completion(body: &[u8]) -> Result<String> {
    let response: ChatResponse = serde_json::from_slice(body).map_err(|e| {
        ExtractorError::SummarizationUnavailable(format!("unexpected response body: {e}"))
    })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            ExtractorError::SummarizationUnavailable("service returned an empty summary".into())
        })
}
