//! Summary settings and the resolved per-request parameter object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::QuickGistError;

/// Presentation style chosen in the settings panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    #[default]
    Bullet,
    Paragraph,
    Detailed,
}

impl SummaryStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Bullet => "bullet",
            SummaryStyle::Paragraph => "paragraph",
            SummaryStyle::Detailed => "detailed",
        }
    }
}

impl FromStr for SummaryStyle {
    type Err = QuickGistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bullet" => Ok(SummaryStyle::Bullet),
            "paragraph" => Ok(SummaryStyle::Paragraph),
            "detailed" => Ok(SummaryStyle::Detailed),
            other => Err(QuickGistError::InvalidInput(format!(
                "unknown summary style: {other}"
            ))),
        }
    }
}

/// Target length chosen in the settings panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }
}

impl FromStr for SummaryLength {
    type Err = QuickGistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(SummaryLength::Short),
            "medium" => Ok(SummaryLength::Medium),
            "long" => Ok(SummaryLength::Long),
            other => Err(QuickGistError::InvalidInput(format!(
                "unknown summary length: {other}"
            ))),
        }
    }
}

/// Summary mode requested per message. Drives the cache key and the
/// cloud prompt template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    #[default]
    Brief,
    Detailed,
    Actionable,
}

impl SummaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMode::Brief => "brief",
            SummaryMode::Detailed => "detailed",
            SummaryMode::Actionable => "actionable",
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryMode {
    type Err = QuickGistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brief" => Ok(SummaryMode::Brief),
            "detailed" => Ok(SummaryMode::Detailed),
            "actionable" => Ok(SummaryMode::Actionable),
            other => Err(QuickGistError::InvalidInput(format!(
                "unknown summary mode: {other}"
            ))),
        }
    }
}

/// User settings owned by the settings panel. Read-only to this crate.
///
/// Unknown or missing values fall back to the defaults (`bullet`, `medium`)
/// instead of failing the whole read, since the panel may store values
/// from a newer build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, deserialize_with = "lenient")]
    pub summary_style: SummaryStyle,
    #[serde(default, deserialize_with = "lenient")]
    pub summary_length: SummaryLength,
}

impl Settings {
    pub fn new(summary_style: SummaryStyle, summary_length: SummaryLength) -> Self {
        Self {
            summary_style,
            summary_length,
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

/// Everything a summarization backend needs besides the transcript,
/// resolved once at the router boundary.
///
/// | consumer             | field    | mapping                                        |
/// |----------------------|----------|------------------------------------------------|
/// | cache key            | `mode`   | `videoId:brief` / `:detailed` / `:actionable`  |
/// | on-device summarizer | `style`  | paragraph → tl;dr, otherwise key-points        |
/// | on-device summarizer | `length` | passed through                                 |
/// | prompt session       | `style`  | phrasing ("as bullet points", ...)             |
/// | prompt session       | `length` | 3-5 / 5-8 / 8-12 key points                    |
/// | cloud API            | `mode`   | prompt template                                |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SummaryParams {
    pub mode: SummaryMode,
    pub style: SummaryStyle,
    pub length: SummaryLength,
}

impl SummaryParams {
    /// Combine a request mode (default `brief`) with the stored settings.
    pub fn resolve(mode: Option<SummaryMode>, settings: &Settings) -> Self {
        Self {
            mode: mode.unwrap_or_default(),
            style: settings.summary_style,
            length: settings.summary_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults_are_bullet_medium() {
        let settings = Settings::default();
        assert_eq!(settings.summary_style, SummaryStyle::Bullet);
        assert_eq!(settings.summary_length, SummaryLength::Medium);
    }

    #[test]
    fn settings_parse_from_panel_json() {
        let json = serde_json::json!({
            "summaryStyle": "paragraph",
            "summaryLength": "long",
            "theme": "dark"
        });
        let settings: Settings = serde_json::from_value(json).unwrap();
        assert_eq!(settings.summary_style, SummaryStyle::Paragraph);
        assert_eq!(settings.summary_length, SummaryLength::Long);
    }

    #[test]
    fn settings_unknown_values_fall_back_to_defaults() {
        let json = serde_json::json!({ "summaryStyle": "haiku", "summaryLength": 3 });
        let settings: Settings = serde_json::from_value(json).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn settings_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn params_resolve_defaults_mode_to_brief() {
        let settings = Settings::new(SummaryStyle::Detailed, SummaryLength::Short);
        let params = SummaryParams::resolve(None, &settings);
        assert_eq!(params.mode, SummaryMode::Brief);
        assert_eq!(params.style, SummaryStyle::Detailed);
        assert_eq!(params.length, SummaryLength::Short);
    }

    #[test]
    fn mode_parse_rejects_settings_vocabulary() {
        assert_eq!("actionable".parse::<SummaryMode>().unwrap(), SummaryMode::Actionable);
        assert!("medium".parse::<SummaryMode>().is_err());
    }
}
