//! Key-value persistence seam for the cache.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::Result;

/// Namespace-granular persistence: each namespace holds one JSON value
/// that is read and replaced wholesale.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store name for logging/debugging.
    fn name(&self) -> &str;

    /// Current value of `namespace`, or `None` if it was never written.
    async fn get(&self, namespace: &str) -> Result<Option<Value>>;

    /// Replace the whole value of `namespace`.
    async fn set(&self, namespace: &str, value: Value) -> Result<()>;

    /// Remove the named namespaces. Missing ones are ignored.
    async fn remove(&self, namespaces: &[&str]) -> Result<()>;
}

/// In-process store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    namespaces: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, namespace: &str) -> Result<Option<Value>> {
        Ok(self.namespaces.read().await.get(namespace).cloned())
    }

    async fn set(&self, namespace: &str, value: Value) -> Result<()> {
        self.namespaces
            .write()
            .await
            .insert(namespace.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, namespaces: &[&str]) -> Result<()> {
        let mut guard = self.namespaces.write().await;
        for namespace in namespaces {
            guard.remove(*namespace);
        }
        Ok(())
    }
}
