//! Process-local blob store

use async_trait::async_trait;
use dashmap::DashMap;

use super::{BlobKey, BlobStore, StoreError, StoreResult};

/// Blob store backed by a concurrent hash map. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<BlobKey, Vec<u8>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &BlobKey, value: &[u8]) -> StoreResult<()> {
        self.blobs.insert(key.clone(), value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> StoreResult<Vec<u8>> {
        self.blobs
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }
}
