//! Public types for the QuickGist API.

mod message;
mod record;
mod settings;
mod video;

pub use message::{Request, Response, ResponseData, SummaryReply, TranscriptReply};
pub use record::{ProviderTag, SummaryRecord, TranscriptRecord};
pub use settings::{Settings, SummaryLength, SummaryMode, SummaryParams, SummaryStyle};
pub use video::{extract_video_id, normalize_video_id};
