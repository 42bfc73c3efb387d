//! Configuration loading for the `quickgist` binary.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.quickgist/config.toml` (user)
//! 3. Built-in defaults
//!
//! Secrets are loaded separately with mandatory permission checks from
//! `~/.quickgist/secrets.toml` (must be 0600 or 0400), each key falling
//! back to its environment variable.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::{FileStore, KeyValueStore, MemoryStore};
use crate::gateway::{QuickGist, QuickGistBuilder};
use crate::types::Settings;
use crate::{QuickGistError, Result};

/// Name of the per-user directory under `$HOME`.
const APP_DIR: &str = ".quickgist";

/// Binary configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Overrides the `settings` namespace of the store when present.
    #[serde(default)]
    pub settings: Option<Settings>,
}

/// Where caches and settings are persisted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Store directory (default: `~/.quickgist/store`).
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Provider configurations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub scrapingdog: Option<ScrapingDogConfig>,
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
    #[serde(default)]
    pub ollama: Option<OllamaConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapingDogConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model id (default: `gemini-2.5-flash`).
    #[serde(default)]
    pub model: Option<String>,
}

/// Ollama as the on-device host. Both on-device backends are enabled
/// when this section is present.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Ollama base URL (default: http://localhost:11434).
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

/// Resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Outbound request timeout in seconds (default: 60).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Share in-flight fetches between concurrent identical requests.
    #[serde(default)]
    pub coalesce_requests: bool,
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub scrapingdog: Option<ApiKeySecret>,
    #[serde(default)]
    pub gemini: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Provider name → environment variable name mapping.
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("scrapingdog", "SCRAPINGDOG_API_KEY"),
    ("gemini", "GEMINI_API_KEY"),
];

fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR))
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, a missing user config
    /// yields the defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Config::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            QuickGistError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            QuickGistError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(QuickGistError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Ok(app_dir()
            .map(|dir| dir.join("config.toml"))
            .filter(|path| path.exists()))
    }

    /// Store directory, if one can be determined.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage
            .dir
            .clone()
            .or_else(|| app_dir().map(|dir| dir.join("store")))
    }

    /// Persistent store when a directory is known, in-memory otherwise.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        match self.storage_dir() {
            Some(dir) => Arc::new(FileStore::new(dir)),
            None => Arc::new(MemoryStore::new()),
        }
    }

    /// A router builder with everything from this config and `secrets` applied.
    pub fn builder(&self, secrets: &Secrets) -> QuickGistBuilder {
        let mut builder = QuickGist::builder()
            .store(self.store())
            .timeout(self.limits.request_timeout_secs)
            .coalesce_requests(self.cache.coalesce_requests);

        if let Some(key) = secrets.api_key("scrapingdog") {
            builder = builder.scrapingdog(key);
        }
        if let Some(key) = secrets.api_key("gemini") {
            builder = builder.gemini(key);
        }
        if let Some(url) = self
            .providers
            .scrapingdog
            .as_ref()
            .and_then(|c| c.base_url.clone())
        {
            builder = builder.scrapingdog_base_url(url);
        }
        if let Some(gemini) = &self.providers.gemini {
            if let Some(url) = &gemini.base_url {
                builder = builder.gemini_base_url(url);
            }
            if let Some(model) = &gemini.model {
                builder = builder.gemini_model(model);
            }
        }
        if let Some(ollama) = &self.providers.ollama {
            builder = builder.ollama(&ollama.base_url, &ollama.model);
        }
        if let Some(settings) = self.settings {
            builder = builder.settings(settings);
        }
        builder
    }
}

impl Secrets {
    /// Load secrets from `~/.quickgist/secrets.toml` with permission checks.
    ///
    /// Returns empty secrets if no file exists (keys may come from env vars).
    pub fn load() -> Result<Self> {
        match app_dir().map(|dir| dir.join("secrets.toml")) {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Secrets::default()),
        }
    }

    /// Load secrets from a specific file with permission checks.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            QuickGistError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            QuickGistError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            QuickGistError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(QuickGistError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key for a provider, falling back to the corresponding environment variable.
    pub fn api_key(&self, provider: &str) -> Option<String> {
        let from_file = match provider {
            "scrapingdog" => self.scrapingdog.as_ref(),
            "gemini" => self.gemini.as_ref(),
            _ => None,
        }
        .map(|s| s.api_key.clone());

        from_file.or_else(|| {
            PROVIDER_ENV_VARS
                .iter()
                .find(|(name, _)| *name == provider)
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
        })
    }
}
