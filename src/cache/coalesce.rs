//! Opt-in in-flight request sharing.
//!
//! Without coalescing, two concurrent misses for the same cache key both
//! run the full fetch path and the last cache write wins. With a
//! [`RequestCoalescer`], the second caller awaits the first caller's
//! execution instead.
//!
//! Built on moka's `try_get_with`, which runs at most one `init` future
//! per key and hands its result to every waiter. The entry is invalidated
//! as soon as the execution finishes: the persisted [`CacheStore`](super::CacheStore)
//! remains the only place results live beyond a single request.

use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;

use crate::{QuickGistError, Result};

/// Shares one in-flight execution between concurrent callers of the same key.
pub struct RequestCoalescer<V> {
    inflight: Cache<String, V>,
}

impl<V> RequestCoalescer<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inflight: Cache::builder().build(),
        }
    }

    /// Run `init` for `key`, or join an execution already in flight.
    ///
    /// Errors are shared too: every waiter of a failed execution receives
    /// the same error (wrapped in [`QuickGistError::Shared`] when more than
    /// one caller still holds it).
    pub async fn run<F>(&self, key: &str, init: F) -> Result<V>
    where
        F: Future<Output = Result<V>>,
    {
        let result = self.inflight.try_get_with(key.to_owned(), init).await;
        self.inflight.invalidate(key).await;
        result.map_err(|e| Arc::try_unwrap(e).unwrap_or_else(QuickGistError::Shared))
    }
}

impl<V> Default for RequestCoalescer<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
