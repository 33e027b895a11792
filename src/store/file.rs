//! Directory-backed store.
//!
//! Each key lives in its own file under the store directory. File names
//! are the SHA-256 of the key so arbitrary key strings never hit
//! filesystem restrictions.

use super::KeyValueStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create store dir {}", root.display()))?;
        debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        self.root.join(format!("{hash}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read {key} from {}", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        // Stage then rename: readers never observe a partial record.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value.as_bytes())
            .await
            .with_context(|| format!("write {key} to {}", staging.display()))?;
        fs::rename(&staging, &path)
            .await
            .with_context(|| format!("commit {key} to {}", path.display()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove {key} at {}", path.display())),
        }
    }
}
