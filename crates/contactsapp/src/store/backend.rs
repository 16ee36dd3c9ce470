use crate::error::Result;
use async_trait::async_trait;

/// Abstract interface for raw blob I/O.
///
/// A backend stores named blobs of text and knows nothing about contacts;
/// [`super::csv_storage::CsvStorage`] layers the codec on top. Every method
/// suspends, even when the implementation could answer immediately, so
/// callers never branch on whether a result is ready.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the blob stored under `name`.
    /// Returns Ok(None) if nothing has been stored yet (normal on first run).
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    async fn get(&self, name: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `name`.
    async fn set(&self, name: &str, text: &str) -> Result<()>;

    /// Delete the blob. Deleting a blob that does not exist succeeds.
    async fn remove(&self, name: &str) -> Result<()>;

    /// Human readable location of the blob, for diagnostics.
    /// For FsBackend this is the real path. For MemBackend a virtual one.
    fn location(&self, name: &str) -> String;
}

#[async_trait]
impl<B: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<B> {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        (**self).get(name).await
    }

    async fn set(&self, name: &str, text: &str) -> Result<()> {
        (**self).set(name, text).await
    }

    async fn remove(&self, name: &str) -> Result<()> {
        (**self).remove(name).await
    }

    fn location(&self, name: &str) -> String {
        (**self).location(name)
    }
}
