use std::sync::Arc;

use quickgist::{QuickGistError, Result};

#[test]
fn test_error_display() {
    let err = QuickGistError::Api {
        status: 429,
        message: "slow down".into(),
    };
    assert_eq!(err.to_string(), "Request failed with status code: 429");
}

#[test]
fn test_empty_response_names_backend() {
    let err = QuickGistError::EmptyResponse("Gemini API");
    assert_eq!(err.to_string(), "Empty summary returned from Gemini API.");
}

#[test]
fn test_unknown_action_hides_action_name() {
    let err = QuickGistError::UnknownAction("dropTables".into());
    assert_eq!(err.to_string(), "Unknown action");
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(QuickGistError::NoBackend)
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn configuration_errors() {
    assert!(QuickGistError::Configuration("missing key".into()).is_configuration());
    assert!(!QuickGistError::Http("reset".into()).is_configuration());
    assert!(!QuickGistError::DataError("bad".into()).is_configuration());
}

#[test]
fn provider_errors() {
    assert!(QuickGistError::Http("connection reset".into()).is_provider());
    assert!(
        QuickGistError::Api {
            status: 500,
            message: "internal".into()
        }
        .is_provider()
    );
    assert!(!QuickGistError::EmptyResponse("Gemini API").is_provider());
    assert!(!QuickGistError::Configuration("x".into()).is_provider());
}

#[test]
fn shared_errors_keep_classification_and_message() {
    let inner = QuickGistError::Configuration("ScrapingDog API key not configured.".into());
    let shared = QuickGistError::Shared(Arc::new(inner));
    assert!(shared.is_configuration());
    assert_eq!(shared.to_string(), "ScrapingDog API key not configured.");

    let shared = QuickGistError::Shared(Arc::new(QuickGistError::Api {
        status: 503,
        message: String::new(),
    }));
    assert!(shared.is_provider());
}

// ============================================================================
// Conversions
// ============================================================================

#[test]
fn io_errors_are_storage_errors() {
    let err: QuickGistError = std::io::Error::other("disk full").into();
    assert!(matches!(err, QuickGistError::Storage(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn json_errors_convert() {
    let err: QuickGistError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, QuickGistError::Json(_)));
}
