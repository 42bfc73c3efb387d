//! Message router: the process-boundary entry point.
//!
//! Every request follows the same path:
//!
//! ```text
//! Idle ─► CacheCheck ─┬─ HIT  ─────────────────────────► Respond(cached: true)
//!                     └─ MISS ─► Fetch ─► CacheWrite ──► Respond(cached: false)
//!        (any error) ──────────────────────────────────► Respond(error)
//! ```
//!
//! The router keeps no per-request state. Failures never escape as `Err`
//! from [`MessageRouter::handle`]: they become `{success: false, error}`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::cache::{CacheStore, RequestCoalescer, summary_key};
use crate::orchestrator::SummaryOrchestrator;
use crate::providers::{BackendChain, TranscriptSource};
use crate::telemetry;
use crate::types::{
    Request, Response, ResponseData, Settings, SummaryMode, SummaryParams, SummaryRecord,
    SummaryReply, TranscriptRecord, TranscriptReply,
};
use crate::{QuickGistError, Result};

/// Store namespace holding the user's [`Settings`]. Read-only here.
pub const SETTINGS_NAMESPACE: &str = "settings";

/// Dispatches `getTranscript` / `getSummary` requests with write-through caching.
pub struct MessageRouter {
    cache: CacheStore,
    transcripts: Arc<dyn TranscriptSource>,
    orchestrator: SummaryOrchestrator,
    settings_override: Option<Settings>,
    transcript_flights: Option<RequestCoalescer<TranscriptRecord>>,
    summary_flights: Option<RequestCoalescer<SummaryRecord>>,
}

impl MessageRouter {
    pub fn new(
        cache: CacheStore,
        transcripts: Arc<dyn TranscriptSource>,
        chain: BackendChain,
    ) -> Self {
        Self {
            cache,
            orchestrator: SummaryOrchestrator::new(transcripts.clone(), chain),
            transcripts,
            settings_override: None,
            transcript_flights: None,
            summary_flights: None,
        }
    }

    /// Use fixed settings instead of reading the `settings` namespace.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings_override = Some(settings);
        self
    }

    /// Share one in-flight fetch between concurrent misses for the same key.
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        if enabled {
            self.transcript_flights = Some(RequestCoalescer::new());
            self.summary_flights = Some(RequestCoalescer::new());
        } else {
            self.transcript_flights = None;
            self.summary_flights = None;
        }
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn orchestrator(&self) -> &SummaryOrchestrator {
        &self.orchestrator
    }

    /// Handle a raw JSON message. Any `requestId` is echoed on the response.
    pub async fn handle(&self, message: Value) -> Response {
        let request_id = message.get("requestId").cloned();
        let response = match parse_request(message) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                debug!(error = %e, "rejected message");
                record_request("unknown", false);
                Response::error(e.to_string())
            }
        };
        response.with_request_id(request_id)
    }

    /// Handle a typed request.
    pub async fn handle_request(&self, request: Request) -> Response {
        let action = request.action();
        let result = match request {
            Request::GetTranscript { video_id } => {
                self.get_transcript(&video_id).await.map(ResponseData::from)
            }
            Request::GetSummary { video_id, mode } => self
                .get_summary(&video_id, mode)
                .await
                .map(ResponseData::from),
        };

        match result {
            Ok(data) => {
                record_request(action, true);
                Response::ok(data)
            }
            Err(e) => {
                warn!(action, error = %e, "request failed");
                record_request(action, false);
                Response::error(e.to_string())
            }
        }
    }

    /// Transcript for `video_id`, served from cache when fresh.
    #[instrument(skip(self))]
    pub async fn get_transcript(&self, video_id: &str) -> Result<TranscriptReply> {
        validate_video_id(video_id)?;

        if let Some(record) = self.cache.get_transcript(video_id).await {
            debug!("serving cached transcript");
            return Ok(TranscriptReply {
                transcript: record.transcript,
                video_id: video_id.to_string(),
                cached: true,
            });
        }

        let fetch = self.fetch_transcript_through(video_id);
        let record = match &self.transcript_flights {
            Some(flights) => flights.run(video_id, fetch).await?,
            None => fetch.await?,
        };

        Ok(TranscriptReply {
            transcript: record.transcript,
            video_id: record.video_id,
            cached: false,
        })
    }

    /// Summary for `video_id` in `mode` (default `brief`), served from cache when fresh.
    #[instrument(skip(self))]
    pub async fn get_summary(
        &self,
        video_id: &str,
        mode: Option<SummaryMode>,
    ) -> Result<SummaryReply> {
        validate_video_id(video_id)?;
        let mode = mode.unwrap_or_default();

        if let Some(record) = self.cache.get_summary(video_id, mode).await {
            debug!(%mode, "serving cached summary");
            return Ok(SummaryReply {
                summary: record.summary,
                video_id: video_id.to_string(),
                mode,
                source: record.source,
                cached: true,
            });
        }

        let settings = self.load_settings().await;
        let params = SummaryParams::resolve(Some(mode), &settings);
        let fetch = self.fetch_summary_through(video_id, params);
        let record = match &self.summary_flights {
            Some(flights) => flights.run(&summary_key(video_id, mode), fetch).await?,
            None => fetch.await?,
        };

        Ok(SummaryReply {
            summary: record.summary,
            video_id: record.video_id,
            mode: record.mode,
            source: record.source,
            cached: false,
        })
    }

    /// Settings in effect for the next request.
    ///
    /// A missing or unreadable `settings` namespace yields the defaults.
    pub async fn load_settings(&self) -> Settings {
        if let Some(settings) = self.settings_override {
            return settings;
        }
        match self.cache.store().get(SETTINGS_NAMESPACE).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "unreadable settings, using defaults");
                Settings::default()
            }),
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!(error = %e, "failed to read settings, using defaults");
                Settings::default()
            }
        }
    }

    async fn fetch_transcript_through(&self, video_id: &str) -> Result<TranscriptRecord> {
        let record = self.transcripts.fetch_transcript(video_id).await?;
        if !record.transcript.is_empty() {
            self.cache.set_transcript(&record).await;
        }
        Ok(record)
    }

    async fn fetch_summary_through(
        &self,
        video_id: &str,
        params: SummaryParams,
    ) -> Result<SummaryRecord> {
        let record = self.orchestrator.fetch_summary(video_id, &params).await?;
        if !record.summary.is_empty() {
            self.cache.set_summary(&record).await;
        }
        Ok(record)
    }
}

/// Parse a raw message, telling unknown actions apart from malformed ones.
fn parse_request(message: Value) -> Result<Request> {
    match message.get("action").and_then(Value::as_str) {
        Some("getTranscript" | "getSummary") => {}
        Some(other) => return Err(QuickGistError::UnknownAction(other.to_string())),
        None => return Err(QuickGistError::UnknownAction(String::new())),
    }
    serde_json::from_value(message).map_err(|e| QuickGistError::InvalidInput(e.to_string()))
}

fn validate_video_id(video_id: &str) -> Result<()> {
    if video_id.trim().is_empty() {
        return Err(QuickGistError::InvalidInput(
            "videoId is required".to_string(),
        ));
    }
    Ok(())
}

fn record_request(action: &'static str, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "action" => action,
        "status" => status,
    )
    .increment(1);
}
