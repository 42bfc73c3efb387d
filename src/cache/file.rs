//! Directory-backed [`KeyValueStore`]: one `<namespace>.json` per namespace.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::store::KeyValueStore;
use crate::{QuickGistError, Result};

/// Persists each namespace as a JSON file under `dir`.
///
/// Writes go to a uniquely named temp file that is then renamed over the
/// target, so readers never observe a half-written namespace.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    tmp_seq: AtomicU64,
}

impl FileStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            tmp_seq: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, namespace: &str) -> Result<PathBuf> {
        let valid = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(QuickGistError::InvalidInput(format!(
                "invalid namespace name: {namespace:?}"
            )));
        }
        Ok(self.dir.join(format!("{namespace}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, namespace: &str) -> Result<Option<Value>> {
        let path = self.path_for(namespace)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuickGistError::Storage(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn set(&self, namespace: &str, value: Value) -> Result<()> {
        let path = self.path_for(namespace)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .dir
            .join(format!(".{namespace}.{}.{seq}.tmp", std::process::id()));
        tokio::fs::write(&tmp, serde_json::to_vec(&value)?).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(QuickGistError::Storage(format!(
                "failed to replace {}: {e}",
                path.display()
            )));
        }
        Ok(())
    }

    async fn remove(&self, namespaces: &[&str]) -> Result<()> {
        for namespace in namespaces {
            let path = self.path_for(namespace)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
