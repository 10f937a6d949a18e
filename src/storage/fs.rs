//! Filesystem blob store
//!
//! Lays blobs out as `<root>/<container>/<blob>`, e.g.
//! `<root>/snippets/myTestSnippet.json`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{BlobKey, BlobStore, StoreError, StoreResult};

pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default root: `<data dir>/mcp-snippets/blobs`, falling back to `./.mcp-snippets/blobs`
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("mcp-snippets").join("blobs"))
            .unwrap_or_else(|| PathBuf::from(".mcp-snippets").join("blobs"))
    }

    fn path_for(&self, key: &BlobKey) -> PathBuf {
        self.root.join(key.relative_path())
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn put(&self, key: &BlobKey, value: &[u8]) -> StoreResult<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so readers never observe a half-written blob
        let tmp = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, value).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> StoreResult<Vec<u8>> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.clone())),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_round_trip_on_disk() {
        let dir = tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let key = BlobKey::snippet("greeting").unwrap();

        store.put(&key, b"hello\nworld").await.unwrap();

        let on_disk = dir.path().join("snippets").join("greeting.json");
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"hello\nworld");
        assert_eq!(store.get(&key).await.unwrap(), b"hello\nworld");
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let key = BlobKey::snippet("x").unwrap();

        store.put(&key, b"one").await.unwrap();
        store.put(&key, b"two").await.unwrap();

        assert_eq!(store.get(&key).await.unwrap(), b"two");
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("snippets"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_blob_is_not_found() {
        let dir = tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let key = BlobKey::snippet("absent").unwrap();
        assert!(store.get(&key).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unwritable_root_is_io_error() {
        let dir = tempdir().unwrap();
        // A regular file where the root directory should be
        let blocker = dir.path().join("root");
        std::fs::write(&blocker, b"").unwrap();
        let store = FsBlobStore::new(&blocker);
        let key = BlobKey::snippet("x").unwrap();

        let err = store.put(&key, b"data").await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
