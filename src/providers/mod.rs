//! Transcript source and summarization backends.
//!
//! - [`ScrapingDogClient`]: the transcript source
//! - [`OnDeviceSummarizer`] (`chrome-ai`) and [`PromptSessionBackend`]
//!   (`prompt-api`): wrap on-device host capabilities
//! - [`GeminiClient`] (`gemini-api`): the terminal cloud backend
//! - [`OllamaClient`]: a concrete on-device host on a local Ollama server
//! - [`BackendChain`]: runs backends in priority order with fallback

pub mod chain;
pub mod gemini;
pub mod ollama;
pub mod on_device;
pub mod scrapingdog;
pub mod traits;

pub use chain::BackendChain;
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use on_device::{OnDeviceSummarizer, PromptSessionBackend};
pub use scrapingdog::ScrapingDogClient;
pub use traits::{
    Availability, PromptHost, SummarizerHost, SummarizerOptions, SummaryBackend, SummaryKind,
    TranscriptSource,
};

/// First `max` characters of `text`, never splitting a character.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
