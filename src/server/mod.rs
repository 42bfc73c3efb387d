//! Process-level surfaces for the `quickgist` binary: configuration and
//! the native-messaging host loop.

pub mod config;
pub mod native;

pub use config::{Config, Secrets};
pub use native::serve;
