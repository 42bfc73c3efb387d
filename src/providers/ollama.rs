//! Local Ollama server as an on-device model host.
//!
//! Serves both host capabilities: the summarizer via `/api/generate` and
//! the prompt session via `/api/chat`. Availability comes from the local
//! model list at `/api/tags`.
//!
//! See: <https://github.com/ollama/ollama/blob/main/docs/api.md>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{Availability, PromptHost, SummarizerHost, SummarizerOptions, SummaryKind};
use crate::types::SummaryLength;
use crate::{QuickGistError, Result};

/// Default base URL for a local Ollama server
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Availability checks are quick local calls; don't let a hung server stall the chain.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// On-device host backed by an Ollama model.
#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, model)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: Duration::from_secs(300),
        }
    }

    /// Per-request timeout for generation calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// `readily` if the model is pulled, `after-download` if the server is
    /// up without it, `no` if the server cannot be reached.
    pub async fn check_availability(&self) -> Availability {
        let response = match self
            .http
            .get(self.url("/api/tags"))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(status = %response.status(), "ollama tags request failed");
                return Availability::No;
            }
            Err(e) => {
                debug!(error = %e, "ollama unreachable");
                return Availability::No;
            }
        };

        let tags: TagsResponse = match response.json().await {
            Ok(tags) => tags,
            Err(e) => {
                debug!(error = %e, "unreadable ollama tags response");
                return Availability::No;
            }
        };

        if tags.models.iter().any(|m| model_matches(&m.name, &self.model)) {
            Availability::Readily
        } else {
            Availability::AfterDownload
        }
    }

    async fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
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

        response
            .json()
            .await
            .map_err(|e| QuickGistError::DataError(format!("Invalid Ollama response: {e}")))
    }
}

/// `llama3.2` matches `llama3.2:latest`; an explicit tag must match exactly.
fn model_matches(installed: &str, wanted: &str) -> bool {
    if installed == wanted {
        return true;
    }
    !wanted.contains(':') && installed.strip_suffix(":latest") == Some(wanted)
}

fn summarizer_instruction(options: &SummarizerOptions) -> String {
    let shape = match options.kind {
        SummaryKind::KeyPoints => "the key points of the following text as a list",
        SummaryKind::Tldr => "the following text as a short tl;dr",
    };
    let length = match options.length {
        SummaryLength::Short => "Keep it short.",
        SummaryLength::Medium => "Keep it to a moderate length.",
        SummaryLength::Long => "Be thorough.",
    };
    format!("Summarize {shape}, formatted as {}. {length}", options.format)
}

#[async_trait]
impl SummarizerHost for OllamaClient {
    async fn availability(&self) -> Result<Availability> {
        Ok(self.check_availability().await)
    }

    async fn summarize(&self, text: &str, options: &SummarizerOptions) -> Result<String> {
        let system = summarizer_instruction(options);
        let response: GenerateResponse = self
            .post(
                "/api/generate",
                &GenerateRequest {
                    model: &self.model,
                    system: &system,
                    prompt: text,
                    stream: false,
                },
            )
            .await?;
        Ok(response.response)
    }
}

#[async_trait]
impl PromptHost for OllamaClient {
    async fn availability(&self) -> Result<Availability> {
        Ok(self.check_availability().await)
    }

    async fn prompt(&self, system: &str, prompt: &str) -> Result<String> {
        let response: ChatResponse = self
            .post(
                "/api/chat",
                &ChatRequest {
                    model: &self.model,
                    messages: vec![
                        ChatMessage {
                            role: "system",
                            content: system,
                        },
                        ChatMessage {
                            role: "user",
                            content: prompt,
                        },
                    ],
                    stream: false,
                },
            )
            .await?;
        Ok(response.message.map(|m| m.content).unwrap_or_default())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}
