//! # File Snapshot Store
//!
//! Persistent snapshot store with one directory per region. Each entry is a
//! body file named by the sha256 of its URL plus a `.meta` JSON sidecar for
//! status and headers; writes go to temporary files first and are renamed
//! into place.

use std::path::PathBuf;

use bytes::Bytes;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io;
use tracing::{debug, warn};
use url::Url;

use crate::snapshot::providers::provider::SnapshotStore;
use crate::snapshot::types::{ResponseMeta, StoreResult, StoredResponse};

#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    root: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store rooted at the given directory. Region directories are
    /// created lazily on first write.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn entry_filename(url: &Url) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        let digest = hasher.finalize();
        format!("{digest:x}")
    }

    fn data_path(&self, region: &str, url: &Url) -> PathBuf {
        self.root.join(region).join(Self::entry_filename(url))
    }

    fn meta_path(&self, region: &str, url: &Url) -> PathBuf {
        let mut path = self.data_path(region, url);
        path.set_extension("meta");
        path
    }

    async fn read_entry(
        &self,
        data_path: &PathBuf,
        meta_path: &PathBuf,
    ) -> StoreResult<Option<StoredResponse>> {
        if !fs::try_exists(data_path).await? || !fs::try_exists(meta_path).await? {
            return Ok(None);
        }

        let meta_bytes = match fs::read(meta_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = ?meta_path, error = %e, "failed to read snapshot meta file");
                return Ok(None);
            }
        };

        let meta: ResponseMeta = match serde_json::from_slice(&meta_bytes) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = ?meta_path, error = %e, "discarding entry with unparseable meta");
                let _ = fs::remove_file(data_path).await;
                let _ = fs::remove_file(meta_path).await;
                return Ok(None);
            }
        };

        let body = match fs::read(data_path).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                warn!(path = ?data_path, error = %e, "failed to read snapshot data file");
                return Ok(None);
            }
        };

        Ok(Some(StoredResponse { meta, body }))
    }
}

#[async_trait::async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn contains(&self, region: &str, url: &Url) -> StoreResult<bool> {
        let data_exists = fs::try_exists(self.data_path(region, url)).await?;
        let meta_exists = fs::try_exists(self.meta_path(region, url)).await?;
        Ok(data_exists && meta_exists)
    }

    async fn get(&self, region: &str, url: &Url) -> StoreResult<Option<StoredResponse>> {
        let data_path = self.data_path(region, url);
        let meta_path = self.meta_path(region, url);
        self.read_entry(&data_path, &meta_path).await
    }

    async fn put(&self, region: &str, url: &Url, response: StoredResponse) -> StoreResult<()> {
        let data_path = self.data_path(region, url);
        let meta_path = self.meta_path(region, url);

        if let Some(parent) = data_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let meta_json = serde_json::to_vec(&response.meta).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to serialize response meta: {e}"),
            )
        })?;

        // Write to temporary files then rename so a crashed build never
        // leaves a half-written entry behind.
        let temp_data_path = data_path.with_extension("tmp");
        let temp_meta_path = meta_path.with_extension("mtmp");

        fs::write(&temp_data_path, &response.body).await?;

        if let Err(e) = fs::write(&temp_meta_path, &meta_json).await {
            let _ = fs::remove_file(&temp_data_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_data_path, &data_path).await {
            let _ = fs::remove_file(&temp_data_path).await;
            let _ = fs::remove_file(&temp_meta_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_meta_path, &meta_path).await {
            let _ = fs::remove_file(&data_path).await;
            let _ = fs::remove_file(&temp_meta_path).await;
            return Err(e);
        }

        debug!(region = region, url = %url, "stored entry in file region");
        Ok(())
    }

    async fn match_any(&self, url: &Url) -> StoreResult<Option<StoredResponse>> {
        if !fs::try_exists(&self.root).await? {
            return Ok(None);
        }

        // Scan regions in sorted order so the lookup is deterministic.
        let mut regions = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                regions.push(entry.path());
            }
        }
        regions.sort();

        let filename = Self::entry_filename(url);
        for region_path in regions {
            let data_path = region_path.join(&filename);
            let mut meta_path = data_path.clone();
            meta_path.set_extension("meta");

            if let Some(response) = self.read_entry(&data_path, &meta_path).await? {
                return Ok(Some(response));
            }
        }

        Ok(None)
    }
}
