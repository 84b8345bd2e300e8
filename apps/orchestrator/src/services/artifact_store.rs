//! Storage backend for reconciliation CSV exports and OTA build archives.
//! `ArtifactStore` is the seam between the nightly partition-archive job
//! (and the admin CSV export endpoint) and wherever bytes actually land.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    #[error("artifact write failed: {0}")]
    Write(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persists `bytes` under `key` and returns a URL a caller can use to
    /// retrieve it, e.g. a presigned download link or a local file URI.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, ArtifactStoreError>;
    fn presign_url(&self, key: &str) -> String;
}

/// Local filesystem implementation rooted at `ARTIFACT_STORE_ROOT`.
/// Grounded on the vendor-adapter pattern the rest of this module follows:
/// one small struct wrapping an external concern, swappable behind the
/// trait for tests.
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    #[instrument(skip(self, bytes))]
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, ArtifactStoreError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ArtifactStoreError::Write(e.to_string()))?;
        }
        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| ArtifactStoreError::Write(e.to_string()))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| ArtifactStoreError::Write(e.to_string()))?;
        Ok(self.presign_url(key))
    }

    fn presign_url(&self, key: &str) -> String {
        format!("file://{}", self.root.join(key).display())
    }
}

pub struct FakeArtifactStore {
    pub written: tokio::sync::Mutex<Vec<(String, Vec<u8>)>>,
}

impl FakeArtifactStore {
    pub fn new() -> Self {
        Self {
            written: tokio::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for FakeArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for FakeArtifactStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, ArtifactStoreError> {
        self.written.lock().await.push((key.to_string(), bytes));
        Ok(self.presign_url(key))
    }

    fn presign_url(&self, key: &str) -> String {
        format!("fake://artifacts/{key}")
    }
}
