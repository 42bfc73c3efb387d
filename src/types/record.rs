//! Cached artifacts and their provenance.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::SummaryMode;

/// Which summarization backend produced a summary.
///
/// Callers use this to tell confidence/cost tiers apart, so the wire
/// labels are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderTag {
    /// On-device summarizer model.
    #[serde(rename = "chrome-ai")]
    ChromeAi,
    /// On-device general prompt session.
    #[serde(rename = "prompt-api")]
    PromptApi,
    /// Cloud language-model API.
    #[serde(rename = "gemini-api")]
    GeminiApi,
}

impl ProviderTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTag::ChromeAi => "chrome-ai",
            ProviderTag::PromptApi => "prompt-api",
            ProviderTag::GeminiApi => "gemini-api",
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fetched transcript. `transcript` is never empty for a valid record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRecord {
    pub video_id: String,
    pub transcript: String,
}

/// A generated summary together with the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub video_id: String,
    pub mode: SummaryMode,
    pub summary: String,
    pub source: ProviderTag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_tags_use_wire_labels() {
        let json = serde_json::to_value([
            ProviderTag::ChromeAi,
            ProviderTag::PromptApi,
            ProviderTag::GeminiApi,
        ])
        .unwrap();
        assert_eq!(json, serde_json::json!(["chrome-ai", "prompt-api", "gemini-api"]));
    }

    #[test]
    fn summary_record_uses_camel_case() {
        let record = SummaryRecord {
            video_id: "v1".into(),
            mode: SummaryMode::Brief,
            summary: "X".into(),
            source: ProviderTag::GeminiApi,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "videoId": "v1",
                "mode": "brief",
                "summary": "X",
                "source": "gemini-api"
            })
        );
    }
}
