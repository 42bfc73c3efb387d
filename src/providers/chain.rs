//! Ordered summarization fallback chain.
//!
//! Backends are tried in registration order. The first one to produce
//! non-empty text wins; nothing is retried and nothing is merged.
//!
//! # Fallback Triggers
//!
//! For every backend except the last, any of these falls through:
//! - `probe()` returns `false`
//! - `summarize()` returns an error
//! - `summarize()` returns blank text
//!
//! The last backend is terminal: its failure is the chain's failure. A
//! last backend whose probe is `false` surfaces `CapabilityUnavailable`.
//!
//! ```text
//!   chrome-ai ──fail──► prompt-api ──fail──► gemini-api ──fail──► Err
//!      │ ok                │ ok                  │ ok
//!      ▼                   ▼                     ▼
//!   (text, tag)        (text, tag)          (text, tag)
//! ```

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use super::traits::SummaryBackend;
use crate::telemetry;
use crate::types::{ProviderTag, SummaryParams};
use crate::{QuickGistError, Result};

/// Summarization strategies in priority order (index 0 = highest).
#[derive(Clone, Default)]
pub struct BackendChain {
    backends: Vec<Arc<dyn SummaryBackend>>,
}

impl BackendChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a backend at the lowest priority.
    pub fn push(&mut self, backend: Arc<dyn SummaryBackend>) {
        self.backends.push(backend);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, backend: Arc<dyn SummaryBackend>) -> Self {
        self.push(backend);
        self
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Tags in the order they will be tried.
    pub fn tags(&self) -> Vec<ProviderTag> {
        self.backends.iter().map(|b| b.tag()).collect()
    }

    /// Run the chain. Returns the summary and the tag of the backend that produced it.
    #[instrument(skip(self, transcript, params), fields(mode = %params.mode, transcript_chars = transcript.len()))]
    pub async fn summarize(
        &self,
        transcript: &str,
        params: &SummaryParams,
    ) -> Result<(String, ProviderTag)> {
        let last = self
            .backends
            .len()
            .checked_sub(1)
            .ok_or(QuickGistError::NoBackend)?;

        for (index, backend) in self.backends.iter().enumerate() {
            let tag = backend.tag();
            let terminal = index == last;

            if !backend.probe().await {
                Self::record_attempt(tag, "unavailable", None);
                if terminal {
                    return Err(QuickGistError::CapabilityUnavailable(tag.as_str()));
                }
                debug!(backend = %tag, "backend unavailable, trying next");
                Self::record_fallback(tag);
                continue;
            }

            let start = Instant::now();
            let outcome = match backend.summarize(transcript, params).await {
                Ok(text) if text.trim().is_empty() => {
                    Err(QuickGistError::EmptyResponse(tag.as_str()))
                }
                other => other,
            };

            match outcome {
                Ok(text) => {
                    Self::record_attempt(tag, "ok", Some(start));
                    debug!(backend = %tag, chars = text.len(), "summary produced");
                    return Ok((text, tag));
                }
                Err(e) => {
                    Self::record_attempt(tag, "error", Some(start));
                    if terminal {
                        return Err(e);
                    }
                    warn!(backend = %tag, error = %e, "backend failed, falling back");
                    Self::record_fallback(tag);
                }
            }
        }

        Err(QuickGistError::NoBackend)
    }

    /// Record one backend attempt (counter, plus duration when it ran).
    fn record_attempt(tag: ProviderTag, status: &'static str, start: Option<Instant>) {
        metrics::counter!(telemetry::BACKEND_ATTEMPTS_TOTAL,
            "backend" => tag.as_str(),
            "status" => status,
        )
        .increment(1);
        if let Some(start) = start {
            metrics::histogram!(telemetry::BACKEND_DURATION_SECONDS,
                "backend" => tag.as_str(),
            )
            .record(start.elapsed().as_secs_f64());
        }
    }

    fn record_fallback(tag: ProviderTag) {
        metrics::counter!(telemetry::FALLBACKS_TOTAL, "backend" => tag.as_str()).increment(1);
    }
}
