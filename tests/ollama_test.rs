//! Wiremock tests for the Ollama on-device host.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quickgist::providers::on_device::SYSTEM_PROMPT;
use quickgist::providers::{
    Availability, OllamaClient, OnDeviceSummarizer, PromptHost, PromptSessionBackend,
    SummarizerHost, SummarizerOptions, SummaryBackend, SummaryKind,
};
use quickgist::types::{Settings, SummaryLength, SummaryParams, SummaryStyle};

async fn mount_tags(server: &MockServer, names: &[&str]) {
    let models: Vec<_> = names.iter().map(|name| json!({"name": name})).collect();
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": models})))
        .mount(server)
        .await;
}

// ============================================================================
// Availability
// ============================================================================

#[tokio::test]
async fn pulled_model_is_readily_available() {
    let server = MockServer::start().await;
    mount_tags(&server, &["mistral:7b", "llama3.2:latest"]).await;

    let client = OllamaClient::with_base_url(server.uri(), "llama3.2");
    assert_eq!(client.check_availability().await, Availability::Readily);
}

#[tokio::test]
async fn missing_model_is_available_after_download() {
    let server = MockServer::start().await;
    mount_tags(&server, &["mistral:7b"]).await;

    let client = OllamaClient::with_base_url(server.uri(), "llama3.2");
    assert_eq!(
        client.check_availability().await,
        Availability::AfterDownload
    );
}

#[tokio::test]
async fn failing_tags_endpoint_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri(), "llama3.2");
    assert_eq!(client.check_availability().await, Availability::No);
    let backend = OnDeviceSummarizer::new(Arc::new(client));
    assert!(!backend.probe().await);
}

// ============================================================================
// Generation
// ============================================================================

#[tokio::test]
async fn summarizer_uses_generate_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "prompt": "the transcript",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "response": "- point",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri(), "llama3.2");
    let options = SummarizerOptions {
        kind: SummaryKind::KeyPoints,
        length: SummaryLength::Medium,
        format: "markdown",
    };
    let text = SummarizerHost::summarize(&client, "the transcript", &options)
        .await
        .unwrap();
    assert_eq!(text, "- point");
}

#[tokio::test]
async fn prompt_session_sends_system_and_user_messages() {
    let server = MockServer::start().await;
    mount_tags(&server, &["llama3.2:latest"]).await;

    let settings = Settings::new(SummaryStyle::Detailed, SummaryLength::Short);
    let params = SummaryParams::resolve(None, &settings);
    let expected_prompt = quickgist::providers::on_device::build_prompt("words words", &params);

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": expected_prompt}
            ],
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "- local summary"},
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(OllamaClient::with_base_url(server.uri(), "llama3.2"));
    let backend = PromptSessionBackend::new(client);
    assert!(backend.probe().await);
    let text = backend.summarize("words words", &params).await.unwrap();
    assert_eq!(text, "- local summary");
}

#[tokio::test]
async fn chat_error_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri(), "llama3.2");
    let err = client.prompt("system", "user").await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status code: 404");
}
