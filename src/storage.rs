use std::path::PathBuf;

use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;

/// File-intake collaborator: persists an uploaded document and reports the
/// path clients can use to reference it.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn save(&self, key: &str, body: Bytes) -> anyhow::Result<String>;
}

/// Writes uploads under a root directory on the local disk.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStore for DiskStore {
    async fn save(&self, key: &str, body: Bytes) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create upload dir {}", self.root.display()))?;
        let path = self.root.join(key);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        Ok(path.to_string_lossy().into_owned())
    }
}
