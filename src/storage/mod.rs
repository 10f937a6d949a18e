//! Blob storage for snippets
//!
//! Snippets live one blob per name under the `snippets` container, stored as
//! the raw snippet text. Two backends implement [`BlobStore`]:
//! - [`FsBlobStore`]: a directory on local disk (the default)
//! - [`MemoryBlobStore`]: process-local, used by tests and `serve --in-memory`

mod fs;
mod key;
mod memory;

pub use fs::FsBlobStore;
pub use key::{BlobKey, KeyError, SNIPPET_CONTAINER};
pub use memory::MemoryBlobStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a blob store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("blob not found: {0}")]
    NotFound(BlobKey),

    #[error("blob store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value byte storage used by the snippet tools.
///
/// A single call is one request/response: implementations do not retry, and
/// concurrent writers to the same key race with last-writer-wins semantics.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Name of this backend (for logging)
    fn name(&self) -> &str;

    /// Create or overwrite the blob at `key`
    async fn put(&self, key: &BlobKey, value: &[u8]) -> StoreResult<()>;

    /// Read the blob at `key`, `StoreError::NotFound` if absent
    async fn get(&self, key: &BlobKey) -> StoreResult<Vec<u8>>;
}
