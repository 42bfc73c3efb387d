//! Caching subsystem.
//!
//! - [`CacheStore`]: namespaced, timestamped entries with a fixed 24h TTL
//!   on top of any [`KeyValueStore`]. Expiry is lazy: a read that finds a
//!   stale entry deletes it from the persisted map and reports a miss.
//!   There is no background sweep and no capacity eviction.
//!
//! - [`RequestCoalescer`]: opt-in sharing of one in-flight execution
//!   between concurrent misses for the same key.
//!
//! Each namespace is persisted as a single JSON object and
//! read-modify-written on every `set`. Concurrent writers to the same
//! namespace are last-write-wins; one of two racing writes may be lost.
//! Every persistence failure is logged and swallowed: `get` reports a miss
//! and `set` becomes a no-op, so caching never fails the primary request.
//! A namespace holding something other than a JSON object reads as empty
//! and is replaced by the next `set`.

pub mod coalesce;
pub mod file;
pub mod store;

pub use coalesce::RequestCoalescer;
pub use file::FileStore;
pub use store::{KeyValueStore, MemoryStore};

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::telemetry;
use crate::types::{SummaryMode, SummaryRecord, TranscriptRecord};
use crate::{QuickGistError, Result};

/// Lifetime of every cache entry.
pub const TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Named top-level maps in the key-value store owned by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `videoId -> CacheEntry<TranscriptRecord>`
    Transcripts,
    /// `videoId:mode -> CacheEntry<SummaryRecord>`
    Summaries,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::Transcripts, Namespace::Summaries];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Transcripts => "transcriptCache",
            Namespace::Summaries => "summaryCache",
        }
    }
}

/// A cached value and its write time in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: i64,
}

impl<T> CacheEntry<T> {
    /// Valid iff `now - timestamp <= ttl`.
    pub fn is_fresh(&self, now_millis: i64, ttl: Duration) -> bool {
        now_millis.saturating_sub(self.timestamp) <= ttl.as_millis() as i64
    }
}

/// Entry counts per namespace, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    pub transcripts: usize,
    pub summaries: usize,
}

/// Key for a summary entry: `videoId:mode`.
pub fn summary_key(video_id: &str, mode: SummaryMode) -> String {
    format!("{video_id}:{}", mode.as_str())
}

/// TTL cache over a [`KeyValueStore`].
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Cache over a fresh [`MemoryStore`] and the system clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    async fn load_map(&self, namespace: Namespace) -> Result<Map<String, Value>> {
        match self.store.get(namespace.as_str()).await? {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(QuickGistError::DataError(format!(
                "{} is not a JSON object",
                namespace.as_str()
            ))),
        }
    }

    /// Look up `key`. Stale entries are deleted from the persisted map.
    #[instrument(skip(self), fields(namespace = namespace.as_str()))]
    pub async fn get<T: DeserializeOwned>(&self, namespace: Namespace, key: &str) -> Option<T> {
        self.get_where(namespace, key, |_: &T| true).await
    }

    /// Like [`get`](Self::get), but a fresh entry rejected by `keep` is
    /// reported (and counted) as a miss.
    async fn get_where<T: DeserializeOwned>(
        &self,
        namespace: Namespace,
        key: &str,
        keep: impl Fn(&T) -> bool,
    ) -> Option<T> {
        let found = self.lookup(namespace, key).await.filter(|data| keep(data));
        let ns = namespace.as_str();
        if found.is_some() {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "namespace" => ns).increment(1);
        } else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "namespace" => ns).increment(1);
        }
        found
    }

    async fn lookup<T: DeserializeOwned>(&self, namespace: Namespace, key: &str) -> Option<T> {
        let mut map = match self.load_map(namespace).await {
            Ok(map) => map,
            Err(e) => {
                error!(error = %e, "failed to read cache");
                return None;
            }
        };

        let Some(raw) = map.get(key) else {
            debug!(key, "cache miss");
            return None;
        };

        let entry: CacheEntry<Value> = match serde_json::from_value(raw.clone()) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "unreadable cache entry");
                return None;
            }
        };

        if !entry.is_fresh(self.clock.now_millis(), TTL) {
            debug!(key, "cache entry expired");
            metrics::counter!(telemetry::CACHE_EXPIRED_TOTAL, "namespace" => namespace.as_str())
                .increment(1);
            map.remove(key);
            if let Err(e) = self.store.set(namespace.as_str(), Value::Object(map)).await {
                error!(key, error = %e, "failed to prune expired cache entry");
            }
            return None;
        }

        match serde_json::from_value(entry.data) {
            Ok(data) => {
                debug!(key, "cache hit");
                Some(data)
            }
            Err(e) => {
                warn!(key, error = %e, "cached data has unexpected shape");
                None
            }
        }
    }

    /// Write `data` at `key` stamped with the current time. Best effort.
    #[instrument(skip(self, data), fields(namespace = namespace.as_str()))]
    pub async fn set<T: Serialize>(&self, namespace: Namespace, key: &str, data: &T) {
        if let Err(e) = self.try_set(namespace, key, data).await {
            error!(key, error = %e, "failed to write cache");
        }
    }

    async fn try_set<T: Serialize>(&self, namespace: Namespace, key: &str, data: &T) -> Result<()> {
        let entry = CacheEntry {
            data: serde_json::to_value(data)?,
            timestamp: self.clock.now_millis(),
        };
        let mut map = match self.store.get(namespace.as_str()).await? {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                warn!(key, "cache namespace is not a JSON object, starting it over");
                Map::new()
            }
        };
        map.insert(key.to_owned(), serde_json::to_value(entry)?);
        self.store.set(namespace.as_str(), Value::Object(map)).await?;
        debug!(key, "cached");
        Ok(())
    }

    /// Drop the named namespaces entirely. Best effort.
    pub async fn clear(&self, namespaces: &[Namespace]) {
        let names: Vec<&str> = namespaces.iter().map(Namespace::as_str).collect();
        match self.store.remove(&names).await {
            Ok(()) => debug!(?names, "cache cleared"),
            Err(e) => error!(?names, error = %e, "failed to clear cache"),
        }
    }

    /// Entry counts per namespace. Unreadable namespaces count as empty.
    pub async fn info(&self) -> CacheInfo {
        let mut info = CacheInfo::default();
        for namespace in Namespace::ALL {
            let count = match self.load_map(namespace).await {
                Ok(map) => map.len(),
                Err(e) => {
                    error!(namespace = namespace.as_str(), error = %e, "failed to read cache info");
                    0
                }
            };
            match namespace {
                Namespace::Transcripts => info.transcripts = count,
                Namespace::Summaries => info.summaries = count,
            }
        }
        info
    }

    /// Cached transcript for `video_id`. An empty transcript counts as absent.
    pub async fn get_transcript(&self, video_id: &str) -> Option<TranscriptRecord> {
        self.get_where(Namespace::Transcripts, video_id, |record: &TranscriptRecord| {
            !record.transcript.trim().is_empty()
        })
        .await
    }

    pub async fn set_transcript(&self, record: &TranscriptRecord) {
        self.set(Namespace::Transcripts, &record.video_id, record)
            .await
    }

    /// Cached summary for `video_id` in `mode`. An empty summary counts as absent.
    pub async fn get_summary(&self, video_id: &str, mode: SummaryMode) -> Option<SummaryRecord> {
        self.get_where(
            Namespace::Summaries,
            &summary_key(video_id, mode),
            |record: &SummaryRecord| !record.summary.trim().is_empty(),
        )
        .await
    }

    pub async fn set_summary(&self, record: &SummaryRecord) {
        self.set(
            Namespace::Summaries,
            &summary_key(&record.video_id, record.mode),
            record,
        )
        .await
    }
}
