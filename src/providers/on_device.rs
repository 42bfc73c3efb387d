//! On-device summarization backends (`chrome-ai`, `prompt-api`).
//!
//! Both wrap a host capability and translate [`SummaryParams`] into the
//! host's vocabulary. Probing never fails: a host error while checking
//! availability reads as "not available".

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::traits::{PromptHost, SummarizerHost, SummarizerOptions, SummaryBackend};
use super::truncate_chars;
use crate::Result;
use crate::types::{ProviderTag, SummaryLength, SummaryParams, SummaryStyle};

/// System instruction for every prompt session.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes YouTube video transcripts.";

/// Transcript characters embedded in a prompt-session prompt.
pub const MAX_PROMPT_CHARS: usize = 10_000;

// ============================================================================
// Dedicated summarizer
// ============================================================================

/// First strategy: a dedicated on-device summarizer model.
pub struct OnDeviceSummarizer {
    host: Arc<dyn SummarizerHost>,
}

impl OnDeviceSummarizer {
    pub fn new(host: Arc<dyn SummarizerHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl SummaryBackend for OnDeviceSummarizer {
    fn tag(&self) -> ProviderTag {
        ProviderTag::ChromeAi
    }

    async fn probe(&self) -> bool {
        match self.host.availability().await {
            Ok(availability) => {
                debug!(%availability, "summarizer availability");
                availability.is_usable()
            }
            Err(e) => {
                warn!(error = %e, "summarizer availability check failed");
                false
            }
        }
    }

    #[instrument(name = "on_device.summarize", skip_all, fields(style = params.style.as_str(), length = params.length.as_str()))]
    async fn summarize(&self, transcript: &str, params: &SummaryParams) -> Result<String> {
        let options = SummarizerOptions::for_params(params);
        self.host.summarize(transcript, &options).await
    }
}

// ============================================================================
// Prompt session
// ============================================================================

fn style_phrase(style: SummaryStyle) -> &'static str {
    match style {
        SummaryStyle::Bullet => "as bullet points",
        SummaryStyle::Paragraph => "as flowing paragraphs",
        SummaryStyle::Detailed => "with detailed analysis and context",
    }
}

fn length_phrase(length: SummaryLength) -> &'static str {
    match length {
        SummaryLength::Short => "3-5 key points",
        SummaryLength::Medium => "5-8 key points",
        SummaryLength::Long => "8-12 key points",
    }
}

/// Prompt for a general prompt session, embedding the first
/// [`MAX_PROMPT_CHARS`] characters of `transcript`.
pub fn build_prompt(transcript: &str, params: &SummaryParams) -> String {
    format!(
        "Summarize this YouTube video transcript {}, providing {}:\n\n{}\n\nProvide a clear, concise summary.",
        style_phrase(params.style),
        length_phrase(params.length),
        truncate_chars(transcript, MAX_PROMPT_CHARS),
    )
}

/// Second strategy: a general on-device prompt session.
pub struct PromptSessionBackend {
    host: Arc<dyn PromptHost>,
}

impl PromptSessionBackend {
    pub fn new(host: Arc<dyn PromptHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl SummaryBackend for PromptSessionBackend {
    fn tag(&self) -> ProviderTag {
        ProviderTag::PromptApi
    }

    async fn probe(&self) -> bool {
        match self.host.availability().await {
            Ok(availability) => {
                debug!(%availability, "prompt session availability");
                availability.is_usable()
            }
            Err(e) => {
                warn!(error = %e, "prompt session availability check failed");
                false
            }
        }
    }

    #[instrument(name = "prompt_session.summarize", skip_all, fields(style = params.style.as_str(), length = params.length.as_str()))]
    async fn summarize(&self, transcript: &str, params: &SummaryParams) -> Result<String> {
        self.host
            .prompt(SYSTEM_PROMPT, &build_prompt(transcript, params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::traits::Availability;
    use crate::types::{Settings, SummaryMode};
    use crate::QuickGistError;

    struct FixedHost(Result<Availability>);

    #[async_trait]
    impl SummarizerHost for FixedHost {
        async fn availability(&self) -> Result<Availability> {
            match &self.0 {
                Ok(a) => Ok(*a),
                Err(_) => Err(QuickGistError::CapabilityUnavailable("Summarizer")),
            }
        }

        async fn summarize(&self, _text: &str, options: &SummarizerOptions) -> Result<String> {
            Ok(format!("{} {}", options.kind.as_str(), options.length.as_str()))
        }
    }

    #[test]
    fn prompt_embeds_style_and_length_phrases() {
        let settings = Settings::new(SummaryStyle::Paragraph, SummaryLength::Long);
        let params = SummaryParams::resolve(Some(SummaryMode::Brief), &settings);
        let prompt = build_prompt("the transcript", &params);
        assert_eq!(
            prompt,
            "Summarize this YouTube video transcript as flowing paragraphs, providing 8-12 key points:\n\nthe transcript\n\nProvide a clear, concise summary."
        );
    }

    #[test]
    fn prompt_truncates_to_limit() {
        let transcript = "é".repeat(MAX_PROMPT_CHARS + 10);
        let prompt = build_prompt(&transcript, &SummaryParams::default());
        assert_eq!(prompt.matches('é').count(), MAX_PROMPT_CHARS);
    }

    #[tokio::test]
    async fn probe_maps_availability() {
        let ready = OnDeviceSummarizer::new(Arc::new(FixedHost(Ok(Availability::AfterDownload))));
        assert!(ready.probe().await);

        let absent = OnDeviceSummarizer::new(Arc::new(FixedHost(Ok(Availability::No))));
        assert!(!absent.probe().await);

        let broken = OnDeviceSummarizer::new(Arc::new(FixedHost(Err(
            QuickGistError::CapabilityUnavailable("Summarizer"),
        ))));
        assert!(!broken.probe().await);
    }

    #[tokio::test]
    async fn summarizer_receives_mapped_options() {
        let backend = OnDeviceSummarizer::new(Arc::new(FixedHost(Ok(Availability::Readily))));
        let settings = Settings::new(SummaryStyle::Paragraph, SummaryLength::Short);
        let params = SummaryParams::resolve(None, &settings);
        assert_eq!(backend.summarize("text", &params).await.unwrap(), "tl;dr short");
    }
}
