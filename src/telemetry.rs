//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus,
//! statsd); without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `quickgist_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `action`: router action (`"getTranscript"`, `"getSummary"`, `"unknown"`)
//! - `backend`: provenance tag of a summarization backend (e.g. `"chrome-ai"`)
//! - `namespace`: cache namespace (`"transcriptCache"`, `"summaryCache"`)
//! - `status`: outcome: `"ok"`, `"error"`, or for backends also `"unavailable"`

/// Total messages handled by the router.
///
/// Labels: `action`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "quickgist_requests_total";

/// Total attempts made against a summarization backend.
///
/// Labels: `backend`, `status` ("ok" | "error" | "unavailable").
pub const BACKEND_ATTEMPTS_TOTAL: &str = "quickgist_backend_attempts_total";

/// Backend call duration in seconds (probe excluded).
///
/// Labels: `backend`.
pub const BACKEND_DURATION_SECONDS: &str = "quickgist_backend_duration_seconds";

/// Total times the chain moved past a backend to the next one.
///
/// Labels: `backend` (the one that was skipped or failed).
pub const FALLBACKS_TOTAL: &str = "quickgist_fallbacks_total";

/// Total cache hits.
///
/// Labels: `namespace`.
pub const CACHE_HITS_TOTAL: &str = "quickgist_cache_hits_total";

/// Total cache misses (absent key, unreadable entry, or expired entry).
///
/// Labels: `namespace`.
pub const CACHE_MISSES_TOTAL: &str = "quickgist_cache_misses_total";

/// Total entries pruned because a read found them stale.
///
/// Labels: `namespace`.
pub const CACHE_EXPIRED_TOTAL: &str = "quickgist_cache_expired_total";
