//! Summary orchestration: transcript, then the backend chain.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::providers::{BackendChain, TranscriptSource};
use crate::types::{SummaryParams, SummaryRecord};
use crate::{QuickGistError, Result};

/// Produces a [`SummaryRecord`] for a video.
///
/// Stateless and cache-unaware: the transcript is always fetched fresh from
/// the source, and the caller decides what to cache.
pub struct SummaryOrchestrator {
    transcripts: Arc<dyn TranscriptSource>,
    chain: BackendChain,
}

impl SummaryOrchestrator {
    pub fn new(transcripts: Arc<dyn TranscriptSource>, chain: BackendChain) -> Self {
        Self { transcripts, chain }
    }

    pub fn chain(&self) -> &BackendChain {
        &self.chain
    }

    /// Fetch the transcript and summarize it with the first backend that succeeds.
    ///
    /// An empty transcript fails before any backend is invoked.
    #[instrument(skip(self, params), fields(mode = %params.mode))]
    pub async fn fetch_summary(
        &self,
        video_id: &str,
        params: &SummaryParams,
    ) -> Result<SummaryRecord> {
        let transcript = self.transcripts.fetch_transcript(video_id).await?;
        if transcript.transcript.trim().is_empty() {
            return Err(QuickGistError::DataError(
                "No transcript available".to_string(),
            ));
        }

        let (summary, source) = self
            .chain
            .summarize(&transcript.transcript, params)
            .await?;
        info!(%source, chars = summary.len(), "summary generated");

        Ok(SummaryRecord {
            video_id: video_id.to_string(),
            mode: params.mode,
            summary,
            source,
        })
    }
}
