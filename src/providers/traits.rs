//! Capability traits for transcript sources, summarization backends and
//! the on-device hosts that back them.
//!
//! Backends implement one small trait rather than a "god trait":
//! - [`TranscriptSource`]: fetches a transcript for a video id
//! - [`SummaryBackend`]: one strategy in the summarization fallback chain
//!
//! On-device backends do not talk to a model directly; they wrap a host
//! capability ([`SummarizerHost`], [`PromptHost`]) that may or may not be
//! present on this machine.
//!
//! # Fallback Semantics
//!
//! [`SummaryBackend::probe`] answers "is an attempt worthwhile?", never
//! "will it succeed?". The chain skips backends whose probe is `false` and
//! falls through on any error, except from the final backend.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::types::{ProviderTag, SummaryLength, SummaryParams, SummaryStyle, TranscriptRecord};

// ============================================================================
// Transcript Source
// ============================================================================

/// Source of video transcripts.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Source name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch the full transcript of `video_id`. One attempt, no retry.
    ///
    /// Never returns an empty transcript: empty text is a `DataError`.
    async fn fetch_transcript(&self, video_id: &str) -> Result<TranscriptRecord>;
}

// ============================================================================
// Summary Backend
// ============================================================================

/// One interchangeable summarization strategy.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Provenance tag recorded on summaries this backend produces.
    fn tag(&self) -> ProviderTag;

    /// Whether an attempt is worthwhile. Must not fail.
    async fn probe(&self) -> bool;

    /// Summarize `transcript`.
    async fn summarize(&self, transcript: &str, params: &SummaryParams) -> Result<String>;
}

// ============================================================================
// On-device hosts
// ============================================================================

/// Host-reported availability of an on-device model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    /// Model is present and ready.
    Readily,
    /// Model can be used once downloaded; the first call may be slow.
    AfterDownload,
    /// Capability is not available on this device.
    No,
}

impl Availability {
    /// `readily` and `after-download` are both worth attempting.
    pub fn is_usable(self) -> bool {
        !matches!(self, Availability::No)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Readily => "readily",
            Availability::AfterDownload => "after-download",
            Availability::No => "no",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of summary requested from a [`SummarizerHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    KeyPoints,
    Tldr,
}

impl SummaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryKind::KeyPoints => "key-points",
            SummaryKind::Tldr => "tl;dr",
        }
    }
}

/// Options passed to a dedicated summarizer model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizerOptions {
    pub kind: SummaryKind,
    pub length: SummaryLength,
    /// Always markdown for QuickGist.
    pub format: &'static str,
}

impl SummarizerOptions {
    /// Paragraph style asks for a `tl;dr`; everything else for key points.
    pub fn for_params(params: &SummaryParams) -> Self {
        let kind = match params.style {
            SummaryStyle::Paragraph => SummaryKind::Tldr,
            SummaryStyle::Bullet | SummaryStyle::Detailed => SummaryKind::KeyPoints,
        };
        Self {
            kind,
            length: params.length,
            format: "markdown",
        }
    }
}

/// A dedicated on-device summarization model.
#[async_trait]
pub trait SummarizerHost: Send + Sync {
    async fn availability(&self) -> Result<Availability>;

    async fn summarize(&self, text: &str, options: &SummarizerOptions) -> Result<String>;
}

/// A general on-device prompt session.
#[async_trait]
pub trait PromptHost: Send + Sync {
    async fn availability(&self) -> Result<Availability>;

    /// One-shot prompt in a fresh session seeded with `system`.
    async fn prompt(&self, system: &str, prompt: &str) -> Result<String>;
}
