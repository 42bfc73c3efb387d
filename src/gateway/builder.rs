//! Builder for wiring a [`MessageRouter`]

use std::sync::Arc;
use std::time::Duration;

use super::MessageRouter;
use crate::cache::{CacheStore, KeyValueStore, MemoryStore};
use crate::clock::{Clock, SystemClock};
use crate::providers::{
    BackendChain, GeminiClient, OllamaClient, OnDeviceSummarizer, PromptHost,
    PromptSessionBackend, ScrapingDogClient, SummarizerHost, TranscriptSource,
};
use crate::types::Settings;
use crate::{QuickGistError, Result};

/// Shortest credential accepted after trimming.
pub const MIN_API_KEY_LEN: usize = 10;

/// Normalize a credential: blank means "not configured", anything shorter
/// than [`MIN_API_KEY_LEN`] is rejected.
pub fn validate_api_key(provider: &str, key: &str) -> Result<Option<String>> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.len() < MIN_API_KEY_LEN {
        return Err(QuickGistError::Configuration(format!(
            "Invalid {provider} API key format"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Main entry point for creating a QuickGist router.
pub struct QuickGist;

impl QuickGist {
    /// Create a new builder.
    pub fn builder() -> QuickGistBuilder {
        QuickGistBuilder::new()
    }
}

/// Builder for configuring a [`MessageRouter`].
///
/// The summarization chain is assembled in fixed priority order:
/// on-device summarizer, on-device prompt session, then Gemini. Gemini is
/// always present as the terminal backend, even without a key, so that a
/// missing key is reported instead of silently skipped.
#[derive(Default)]
pub struct QuickGistBuilder {
    scrapingdog_key: Option<String>,
    scrapingdog_base_url: Option<String>,
    gemini_key: Option<String>,
    gemini_model: Option<String>,
    gemini_base_url: Option<String>,
    summarizer_host: Option<Arc<dyn SummarizerHost>>,
    prompt_host: Option<Arc<dyn PromptHost>>,
    transcript_source: Option<Arc<dyn TranscriptSource>>,
    store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    timeout_secs: Option<u64>,
    coalesce_requests: bool,
    settings: Option<Settings>,
}

impl QuickGistBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// ScrapingDog API key for transcripts.
    pub fn scrapingdog(mut self, api_key: impl Into<String>) -> Self {
        self.scrapingdog_key = Some(api_key.into());
        self
    }

    pub fn scrapingdog_base_url(mut self, url: impl Into<String>) -> Self {
        self.scrapingdog_base_url = Some(url.into());
        self
    }

    /// Gemini API key for the cloud backend.
    pub fn gemini(mut self, api_key: impl Into<String>) -> Self {
        self.gemini_key = Some(api_key.into());
        self
    }

    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = Some(model.into());
        self
    }

    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = Some(url.into());
        self
    }

    /// Use a local Ollama server as both on-device hosts.
    pub fn ollama(mut self, url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Arc::new(OllamaClient::with_base_url(url, model));
        self.summarizer_host = Some(client.clone());
        self.prompt_host = Some(client);
        self
    }

    /// Host for the `chrome-ai` backend.
    pub fn summarizer_host(mut self, host: Arc<dyn SummarizerHost>) -> Self {
        self.summarizer_host = Some(host);
        self
    }

    /// Host for the `prompt-api` backend.
    pub fn prompt_host(mut self, host: Arc<dyn PromptHost>) -> Self {
        self.prompt_host = Some(host);
        self
    }

    /// Replace the ScrapingDog transcript source.
    pub fn transcript_source(mut self, source: Arc<dyn TranscriptSource>) -> Self {
        self.transcript_source = Some(source);
        self
    }

    /// Persistence for caches and settings (default: in-memory).
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Per-request timeout for outbound HTTP calls (seconds).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Enable in-flight request coalescing (default: off).
    pub fn coalesce_requests(mut self, enabled: bool) -> Self {
        self.coalesce_requests = enabled;
        self
    }

    /// Fixed settings, bypassing the store's `settings` namespace.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the router.
    pub fn build(self) -> Result<MessageRouter> {
        let scrapingdog_key = match &self.scrapingdog_key {
            Some(key) => validate_api_key("ScrapingDog", key)?,
            None => None,
        };
        let gemini_key = match &self.gemini_key {
            Some(key) => validate_api_key("Gemini", key)?,
            None => None,
        };
        let timeout = self.timeout_secs.map(Duration::from_secs);

        let transcripts: Arc<dyn TranscriptSource> = match self.transcript_source {
            Some(source) => source,
            None => {
                let mut client = match self.scrapingdog_base_url {
                    Some(url) => ScrapingDogClient::with_base_url(scrapingdog_key, url),
                    None => ScrapingDogClient::new(scrapingdog_key),
                };
                if let Some(timeout) = timeout {
                    client = client.with_timeout(timeout);
                }
                Arc::new(client)
            }
        };

        // =====================================================================
        // On-device backends first, Gemini last
        // =====================================================================

        let mut chain = BackendChain::new();
        if let Some(host) = self.summarizer_host {
            chain.push(Arc::new(OnDeviceSummarizer::new(host)));
        }
        if let Some(host) = self.prompt_host {
            chain.push(Arc::new(PromptSessionBackend::new(host)));
        }

        let mut gemini = match self.gemini_base_url {
            Some(url) => GeminiClient::with_base_url(gemini_key, url),
            None => GeminiClient::new(gemini_key),
        };
        if let Some(model) = self.gemini_model {
            gemini = gemini.with_model(model);
        }
        if let Some(timeout) = timeout {
            gemini = gemini.with_timeout(timeout);
        }
        chain.push(Arc::new(gemini));

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let mut router = MessageRouter::new(CacheStore::new(store, clock), transcripts, chain)
            .with_coalescing(self.coalesce_requests);
        if let Some(settings) = self.settings {
            router = router.with_settings(settings);
        }
        Ok(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderTag;

    #[test]
    fn short_keys_are_rejected() {
        let err = validate_api_key("Gemini", "  abc  ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Gemini API key format");
        assert!(err.is_configuration());
    }

    #[test]
    fn keys_are_trimmed_and_blank_means_absent() {
        assert_eq!(
            validate_api_key("Gemini", "  0123456789  ").unwrap().as_deref(),
            Some("0123456789")
        );
        assert_eq!(validate_api_key("Gemini", "   ").unwrap(), None);
    }

    #[test]
    fn build_rejects_invalid_key() {
        assert!(QuickGist::builder().scrapingdog("short").build().is_err());
    }

    #[test]
    fn chain_order_is_fixed() {
        let router = QuickGist::builder()
            .ollama("http://127.0.0.1:11434", "llama3.2")
            .build()
            .unwrap();
        assert_eq!(
            router.orchestrator().chain().tags(),
            vec![
                ProviderTag::ChromeAi,
                ProviderTag::PromptApi,
                ProviderTag::GeminiApi
            ]
        );
    }

    #[test]
    fn gemini_is_always_present() {
        let router = QuickGist::builder().build().unwrap();
        assert_eq!(
            router.orchestrator().chain().tags(),
            vec![ProviderTag::GeminiApi]
        );
    }
}
