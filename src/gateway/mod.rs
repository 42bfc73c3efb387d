//! Router and its builder

mod builder;
mod router;

pub use builder::{MIN_API_KEY_LEN, QuickGist, QuickGistBuilder, validate_api_key};
pub use router::{MessageRouter, SETTINGS_NAMESPACE};
