//! ScrapingDog YouTube transcript client.
//!
//! See: <https://docs.scrapingdog.com/youtube-scraper-api/youtube-transcripts-api>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::traits::TranscriptSource;
use crate::types::TranscriptRecord;
use crate::{QuickGistError, Result};

/// Default base URL for the ScrapingDog API
const DEFAULT_BASE_URL: &str = "https://api.scrapingdog.com";

const INVALID_DATA: &str = "Invalid transcript data received.";

/// Transcript source backed by ScrapingDog.
///
/// The API key is optional at construction so a missing credential can be
/// reported per request as a configuration error.
#[derive(Clone)]
pub struct ScrapingDogClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl ScrapingDogClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            http: Client::new(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TranscriptSource for ScrapingDogClient {
    fn name(&self) -> &str {
        "scrapingdog"
    }

    #[instrument(name = "scrapingdog.fetch_transcript", skip(self))]
    async fn fetch_transcript(&self, video_id: &str) -> Result<TranscriptRecord> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            QuickGistError::Configuration("ScrapingDog API key not configured.".to_string())
        })?;

        let url = format!(
            "{}/youtube/transcripts/",
            self.base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", api_key), ("v", video_id)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| QuickGistError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuickGistError::Api {
                status: status.as_u16(),
                message: format!("ScrapingDog API error: {status}"),
            });
        }

        let body: TranscriptResponse = response
            .json()
            .await
            .map_err(|_| QuickGistError::DataError(INVALID_DATA.to_string()))?;
        let segments = body
            .transcripts
            .ok_or_else(|| QuickGistError::DataError(INVALID_DATA.to_string()))?;

        let transcript = segments
            .iter()
            .map(|segment| segment.text.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        if transcript.is_empty() {
            return Err(QuickGistError::DataError(
                "Transcript text empty.".to_string(),
            ));
        }

        debug!(
            segments = segments.len(),
            chars = transcript.len(),
            "transcript fetched"
        );
        Ok(TranscriptRecord {
            video_id: video_id.to_string(),
            transcript,
        })
    }
}

#[derive(Deserialize)]
struct TranscriptResponse {
    transcripts: Option<Vec<TranscriptSegment>>,
}

#[derive(Deserialize)]
struct TranscriptSegment {
    #[serde(default)]
    text: Option<String>,
}
