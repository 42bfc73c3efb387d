//! Wiremock tests for the Gemini backend.

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quickgist::providers::{GeminiClient, SummaryBackend};
use quickgist::types::{ProviderTag, Settings, SummaryMode, SummaryParams};
use quickgist::QuickGistError;

const KEY: &str = "gm-test-key-0001";

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::with_base_url(Some(KEY.to_string()), server.uri())
}

fn params(mode: SummaryMode) -> SummaryParams {
    SummaryParams::resolve(Some(mode), &Settings::default())
}

fn candidate(parts: serde_json::Value) -> serde_json::Value {
    json!({"candidates": [{"content": {"role": "model", "parts": parts}, "finishReason": "STOP"}]})
}

#[tokio::test]
async fn summary_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", KEY))
        .and(body_string_contains(
            "Summarize this YouTube transcript in 3–5 concise bullet points:",
        ))
        .and(body_string_contains("in markdown in brief format."))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate(json!([{"text": "- one\n"}, {"text": "- two\n"}]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = client(&server);
    assert_eq!(backend.tag(), ProviderTag::GeminiApi);
    let summary = backend
        .summarize("a transcript", &params(SummaryMode::Brief))
        .await
        .unwrap();
    assert_eq!(summary, "- one\n- two");
}

#[tokio::test]
async fn prompt_is_a_single_user_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": quickgist::providers::gemini::build_prompt(
                SummaryMode::Actionable,
                "do the dishes",
            )}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(json!([{"text": "- wash"}]))))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client(&server)
        .summarize("do the dishes", &params(SummaryMode::Actionable))
        .await
        .unwrap();
    assert_eq!(summary, "- wash");
}

#[tokio::test]
async fn custom_model_changes_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(json!([{"text": "ok"}]))))
        .expect(1)
        .mount(&server)
        .await;

    let backend = client(&server).with_model("gemini-2.0-flash");
    assert_eq!(backend.model(), "gemini-2.0-flash");
    backend
        .summarize("text", &params(SummaryMode::Brief))
        .await
        .unwrap();
}

#[tokio::test]
async fn blank_candidate_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(json!([{"text": "  \n "}]))))
        .mount(&server)
        .await;

    let err = client(&server)
        .summarize("text", &params(SummaryMode::Brief))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Empty summary returned from Gemini API.");
}

#[tokio::test]
async fn no_candidates_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"promptFeedback": {}})))
        .mount(&server)
        .await;

    let err = client(&server)
        .summarize("text", &params(SummaryMode::Detailed))
        .await
        .unwrap_err();
    assert!(matches!(err, QuickGistError::EmptyResponse("Gemini API")));
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let err = client(&server)
        .summarize("text", &params(SummaryMode::Brief))
        .await
        .unwrap_err();
    match err {
        QuickGistError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "backend exploded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = GeminiClient::with_base_url(None, server.uri())
        .summarize("text", &params(SummaryMode::Brief))
        .await
        .unwrap_err();
    assert!(err.is_configuration());
}
