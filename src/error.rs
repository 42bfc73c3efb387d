//! QuickGist error types

use std::sync::Arc;

/// QuickGist error types.
///
/// `Display` output is what crosses the process boundary in a failure
/// envelope, so every message is a short human-readable sentence.
#[derive(Debug, thiserror::Error)]
pub enum QuickGistError {
    // Configuration errors
    /// A required credential or setting is missing. Terminal.
    #[error("{0}")]
    Configuration(String),

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request failed with status code: {status}")]
    Api { status: u16, message: String },

    // Data errors
    /// Provider answered, but the payload was malformed or empty.
    #[error("{0}")]
    DataError(String),

    /// A summarization backend returned no text.
    #[error("Empty summary returned from {0}.")]
    EmptyResponse(&'static str),

    /// An on-device capability is not exposed by the host.
    /// The backend chain treats this as a reason to try the next strategy.
    #[error("{0} is not available on this device")]
    CapabilityUnavailable(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown action")]
    UnknownAction(String),

    #[error("no summarization backend configured")]
    NoBackend,

    /// Error produced by an in-flight request another caller was awaiting.
    #[error(transparent)]
    Shared(Arc<QuickGistError>),
}

impl QuickGistError {
    /// Whether this is a missing-credential / missing-setting error.
    pub fn is_configuration(&self) -> bool {
        match self {
            QuickGistError::Configuration(_) => true,
            QuickGistError::Shared(inner) => inner.is_configuration(),
            _ => false,
        }
    }

    /// Whether the upstream service failed (transport or non-success status).
    pub fn is_provider(&self) -> bool {
        match self {
            QuickGistError::Http(_) | QuickGistError::Api { .. } => true,
            QuickGistError::Shared(inner) => inner.is_provider(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for QuickGistError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => QuickGistError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => QuickGistError::Http(err.to_string()),
        }
    }
}

impl From<std::io::Error> for QuickGistError {
    fn from(err: std::io::Error) -> Self {
        QuickGistError::Storage(err.to_string())
    }
}

/// Result type alias for QuickGist operations
pub type Result<T> = std::result::Result<T, QuickGistError>;
