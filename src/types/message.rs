//! Process-boundary request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ProviderTag, SummaryMode};

/// A request understood by the [`MessageRouter`](crate::MessageRouter).
///
/// ```
/// # use quickgist::types::{Request, SummaryMode};
/// let req: Request = serde_json::from_str(
///     r#"{"action":"getSummary","videoId":"dQw4w9WgXcQ","mode":"detailed"}"#,
/// ).unwrap();
/// assert_eq!(
///     req,
///     Request::GetSummary { video_id: "dQw4w9WgXcQ".into(), mode: Some(SummaryMode::Detailed) },
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "getTranscript", rename_all = "camelCase")]
    GetTranscript { video_id: String },

    #[serde(rename = "getSummary", rename_all = "camelCase")]
    GetSummary {
        video_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<SummaryMode>,
    },
}

impl Request {
    /// Action name as it appears on the wire.
    pub fn action(&self) -> &'static str {
        match self {
            Request::GetTranscript { .. } => "getTranscript",
            Request::GetSummary { .. } => "getSummary",
        }
    }

    pub fn video_id(&self) -> &str {
        match self {
            Request::GetTranscript { video_id } | Request::GetSummary { video_id, .. } => video_id,
        }
    }
}

/// Payload of a successful `getTranscript`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptReply {
    pub transcript: String,
    pub video_id: String,
    pub cached: bool,
}

/// Payload of a successful `getSummary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReply {
    pub summary: String,
    pub video_id: String,
    pub mode: SummaryMode,
    pub source: ProviderTag,
    pub cached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Summary(SummaryReply),
    Transcript(TranscriptReply),
}

impl From<TranscriptReply> for ResponseData {
    fn from(reply: TranscriptReply) -> Self {
        ResponseData::Transcript(reply)
    }
}

impl From<SummaryReply> for ResponseData {
    fn from(reply: SummaryReply) -> Self {
        ResponseData::Summary(reply)
    }
}

/// Uniform success/error envelope returned for every message.
///
/// `request_id` is copied from the inbound message when present so that
/// a host multiplexing several in-flight requests can match replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Value>,
}

impl Response {
    pub fn ok(data: impl Into<ResponseData>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
            request_id: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: Option<Value>) -> Self {
        self.request_id = id;
        self
    }

    pub fn transcript(&self) -> Option<&TranscriptReply> {
        match &self.data {
            Some(ResponseData::Transcript(t)) => Some(t),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&SummaryReply> {
        match &self.data {
            Some(ResponseData::Summary(s)) => Some(s),
            _ => None,
        }
    }
}
