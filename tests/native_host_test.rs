//! Native-messaging host tests over in-memory pipes.

#![cfg(feature = "cli")]

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::AsyncWriteExt;

use quickgist::QuickGist;
use quickgist::server::native::{MAX_OUTBOUND_BYTES, read_message, serve, write_message};
use quickgist::types::Response;

async fn frame_raw(writer: &mut tokio::io::DuplexStream, payload: &[u8]) {
    writer
        .write_all(&(payload.len() as u32).to_ne_bytes())
        .await
        .unwrap();
    writer.write_all(payload).await.unwrap();
}

/// Feed `inbound` frames to a host and collect every reply until it exits.
async fn run_host(inbound: Vec<Vec<u8>>) -> Vec<Value> {
    let router = Arc::new(QuickGist::builder().build().unwrap());
    let (mut to_host, host_in) = tokio::io::duplex(64 * 1024);
    let (host_out, mut from_host) = tokio::io::duplex(64 * 1024);

    let host = tokio::spawn(serve(router, host_in, host_out));

    for payload in &inbound {
        frame_raw(&mut to_host, payload).await;
    }
    drop(to_host);

    let mut replies = Vec::new();
    while let Some(payload) = read_message(&mut from_host).await.unwrap() {
        replies.push(serde_json::from_slice(&payload).unwrap());
    }
    host.await.unwrap().unwrap();
    replies
}

fn by_request_id<'a>(replies: &'a [Value], id: &Value) -> &'a Value {
    replies
        .iter()
        .find(|r| r.get("requestId") == Some(id))
        .unwrap_or_else(|| panic!("no reply for {id}"))
}

#[tokio::test]
async fn every_message_gets_a_correlated_reply() {
    let replies = run_host(vec![
        serde_json::to_vec(&json!({"action": "explode", "requestId": 1})).unwrap(),
        serde_json::to_vec(&json!({"action": "getTranscript", "videoId": "v1", "requestId": "b"}))
            .unwrap(),
        serde_json::to_vec(&json!({"action": "getSummary", "videoId": "", "requestId": 3}))
            .unwrap(),
    ])
    .await;
    assert_eq!(replies.len(), 3);

    assert_eq!(
        by_request_id(&replies, &json!(1)),
        &json!({"success": false, "error": "Unknown action", "requestId": 1})
    );
    assert_eq!(
        by_request_id(&replies, &json!("b")),
        &json!({
            "success": false,
            "error": "ScrapingDog API key not configured.",
            "requestId": "b"
        })
    );
    assert_eq!(by_request_id(&replies, &json!(3))["success"], json!(false));
}

#[tokio::test]
async fn unparseable_message_is_answered_and_host_keeps_going() {
    let replies = run_host(vec![
        b"{not json".to_vec(),
        serde_json::to_vec(&json!({"action": "nope", "requestId": 9})).unwrap(),
    ])
    .await;
    assert_eq!(replies.len(), 2);

    let invalid = replies
        .iter()
        .find(|r| r.get("requestId").is_none())
        .unwrap();
    assert!(
        invalid["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid message: ")
    );
    assert_eq!(by_request_id(&replies, &json!(9))["error"], "Unknown action");
}

#[tokio::test]
async fn immediate_eof_exits_cleanly() {
    assert!(run_host(Vec::new()).await.is_empty());
}

#[tokio::test]
async fn oversized_reply_is_refused() {
    let mut buf = Vec::new();
    let huge = Response::error("x".repeat(MAX_OUTBOUND_BYTES));
    assert!(write_message(&mut buf, &huge).await.is_err());
    assert!(buf.is_empty());
}
