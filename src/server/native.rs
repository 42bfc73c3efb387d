//! Browser native-messaging host.
//!
//! Each message on stdin/stdout is a 4-byte length in native byte order
//! followed by that many bytes of UTF-8 JSON. Every inbound message is
//! handled as its own task, so responses may be written out of order; a
//! `requestId` on the request is echoed back for correlation.

use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::gateway::MessageRouter;
use crate::types::Response;
use crate::{QuickGistError, Result};

/// Largest message accepted from the browser.
pub const MAX_INBOUND_BYTES: usize = 64 * 1024 * 1024;

/// Largest message the browser accepts from a host.
pub const MAX_OUTBOUND_BYTES: usize = 1024 * 1024;

/// Read one framed message. `Ok(None)` on a clean EOF between messages.
pub async fn read_message<R>(reader: &mut R) -> Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_ne_bytes(len_buf) as usize;
    if len > MAX_INBOUND_BYTES {
        return Err(QuickGistError::InvalidInput(format!(
            "message of {len} bytes exceeds limit"
        )));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

/// Write one framed JSON message and flush.
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = serde_json::to_vec(message)?;
    if payload.len() > MAX_OUTBOUND_BYTES {
        return Err(QuickGistError::InvalidInput(format!(
            "response of {} bytes exceeds limit",
            payload.len()
        )));
    }
    let len = u32::try_from(payload.len())
        .map_err(|_| QuickGistError::InvalidInput("response too large".to_string()))?;
    writer.write_all(&len.to_ne_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Serve until `reader` reaches EOF, then wait for in-flight requests.
pub async fn serve<R, W>(router: Arc<MessageRouter>, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Response>();

    let writer_task = tokio::spawn(async move {
        while let Some(response) = rx.recv().await {
            match write_message(&mut writer, &response).await {
                Ok(()) => {}
                Err(QuickGistError::InvalidInput(reason)) => {
                    warn!(%reason, "response dropped");
                    let fallback = Response::error("Response too large")
                        .with_request_id(response.request_id.clone());
                    write_message(&mut writer, &fallback).await?;
                }
                Err(e) => return Err(e),
            }
        }
        Ok::<_, QuickGistError>(())
    });

    info!("native messaging host started");
    while let Some(payload) = read_message(&mut reader).await? {
        let tx = tx.clone();
        match serde_json::from_slice::<serde_json::Value>(&payload) {
            Ok(message) => {
                let router = router.clone();
                tokio::spawn(async move {
                    let response = router.handle(message).await;
                    let _ = tx.send(response);
                });
            }
            Err(e) => {
                debug!(error = %e, "unparseable message");
                let _ = tx.send(Response::error(format!("Invalid message: {e}")));
            }
        }
    }
    drop(tx);
    info!("stdin closed, draining");

    writer_task
        .await
        .map_err(|e| QuickGistError::Storage(format!("writer task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn framing_uses_native_endian_length() {
        let mut buf = Vec::new();
        write_message(&mut buf, &serde_json::json!({"a": 1})).await.unwrap();
        let body = br#"{"a":1}"#;
        assert_eq!(&buf[..4], &(body.len() as u32).to_ne_bytes());
        assert_eq!(&buf[4..], body);

        let mut reader = &buf[..];
        let payload = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(payload, body);
        assert!(read_message(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn oversized_inbound_length_is_rejected() {
        let len = (MAX_INBOUND_BYTES as u32 + 1).to_ne_bytes();
        let mut reader = &len[..];
        assert!(read_message(&mut reader).await.is_err());
    }

    #[tokio::test]
    async fn truncated_payload_is_an_error() {
        let mut buf = 10u32.to_ne_bytes().to_vec();
        buf.extend_from_slice(b"{}");
        let mut reader = &buf[..];
        assert!(read_message(&mut reader).await.is_err());
    }
}
