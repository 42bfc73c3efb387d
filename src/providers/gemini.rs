//! Gemini generate-content client: the terminal cloud summarization backend.
//!
//! See: <https://ai.google.dev/api/generate-content>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::traits::SummaryBackend;
use super::truncate_chars;
use crate::types::{ProviderTag, SummaryMode, SummaryParams};
use crate::{QuickGistError, Result};

/// Default base URL for the Gemini API
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Transcript characters sent to the model.
pub const MAX_TRANSCRIPT_CHARS: usize = 30_000;

/// Instruction line for each request mode.
fn template(mode: SummaryMode) -> &'static str {
    match mode {
        SummaryMode::Brief => "Summarize this YouTube transcript in 3–5 concise bullet points:",
        SummaryMode::Detailed => {
            "Summarize this YouTube transcript in 8–12 detailed bullet points with context and insights:"
        }
        SummaryMode::Actionable => {
            "Summarize this YouTube transcript in 5–8 bullet points focusing on actionable takeaways:"
        }
    }
}

/// Full prompt for `mode`, with the transcript cut to [`MAX_TRANSCRIPT_CHARS`].
pub fn build_prompt(mode: SummaryMode, transcript: &str) -> String {
    format!(
        "{}\n\n{}\n\nReturn the summary in markdown in {mode} format. \
         Remove any introductory or redundant phrases that refer to the transcript or the video. \
         Keep it focused purely on the content.",
        template(mode),
        truncate_chars(transcript, MAX_TRANSCRIPT_CHARS),
    )
}

/// Cloud summarization backend (`gemini-api`).
///
/// Always the last strategy in the chain, so a missing key surfaces as a
/// configuration error instead of being skipped.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            http: Client::new(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the concatenated candidate text, untrimmed.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            QuickGistError::Configuration(
                "Gemini API key not configured. Summaries require either an on-device model or a Gemini API key."
                    .to_string(),
            )
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| QuickGistError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QuickGistError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| QuickGistError::DataError(format!("Invalid Gemini API response: {e}")))?;

        Ok(body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl SummaryBackend for GeminiClient {
    fn tag(&self) -> ProviderTag {
        ProviderTag::GeminiApi
    }

    async fn probe(&self) -> bool {
        true
    }

    #[instrument(name = "gemini.summarize", skip(self, transcript, params), fields(model = %self.model, mode = %params.mode))]
    async fn summarize(&self, transcript: &str, params: &SummaryParams) -> Result<String> {
        let text = self.generate(&build_prompt(params.mode, transcript)).await?;
        let summary = text.trim();
        if summary.is_empty() {
            return Err(QuickGistError::EmptyResponse("Gemini API"));
        }
        debug!(chars = summary.len(), "gemini summary generated");
        Ok(summary.to_string())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
