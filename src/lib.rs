//! QuickGist - cached transcript fetching and tiered summarization for
//! YouTube videos.
//!
//! A [`MessageRouter`] answers two requests, `getTranscript` and
//! `getSummary`, with a uniform `{success, data?, error?}` envelope.
//! Transcripts come from ScrapingDog. Summaries come from the first
//! backend in a fixed fallback chain that produces text: an on-device
//! summarizer, an on-device prompt session, then the Gemini API. Both are
//! cached for 24 hours per video (and per mode, for summaries).
//!
//! # Example
//!
//! ```rust,no_run
//! use quickgist::{QuickGist, SummaryMode};
//!
//! #[tokio::main]
//! async fn main() -> quickgist::Result<()> {
//!     let router = QuickGist::builder()
//!         .scrapingdog("your-scrapingdog-key")
//!         .gemini("your-gemini-api-key")
//!         .build()?;
//!
//!     let reply = router
//!         .get_summary("dQw4w9WgXcQ", Some(SummaryMode::Actionable))
//!         .await?;
//!     println!("[{}] {}", reply.source, reply.summary);
//!     Ok(())
//! }
//! ```
//!
//! # Raw messages
//!
//! ```rust,no_run
//! # async fn run(router: quickgist::MessageRouter) {
//! let response = router
//!     .handle(serde_json::json!({"action": "getTranscript", "videoId": "dQw4w9WgXcQ"}))
//!     .await;
//! assert!(response.success || response.error.is_some());
//! # }
//! ```

pub mod cache;
pub mod clock;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod providers;
#[cfg(feature = "cli")]
pub mod server;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheInfo, CacheStore, FileStore, KeyValueStore, MemoryStore, Namespace};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{QuickGistError, Result};
pub use gateway::{MessageRouter, QuickGist, QuickGistBuilder};
pub use orchestrator::SummaryOrchestrator;
pub use providers::{BackendChain, SummaryBackend, TranscriptSource};

pub use types::{
    ProviderTag, Request, Response, ResponseData, Settings, SummaryLength, SummaryMode,
    SummaryParams, SummaryRecord, SummaryReply, SummaryStyle, TranscriptRecord, TranscriptReply,
    extract_video_id, normalize_video_id,
};
