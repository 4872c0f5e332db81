//! Blob storage behind the upload endpoint.
//!
//! Object storage itself is an external collaborator; the server only
//! needs "store these bytes, give me back a URL".

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

/// A stored blob's public coordinates.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub url: String,
    pub pathname: String,
}

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Blob store error: {0}")]
    Backend(String),
}

/// Write interface to the object store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        pathname: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredBlob, BlobError>;
}

/// In-memory blob store for tests and the zero-config default.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, (String, Vec<u8>)>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored bytes for a pathname, if any.
    pub async fn get(&self, pathname: &str) -> Option<Vec<u8>> {
        let blobs = self.blobs.read().await;
        blobs.get(pathname).map(|(_, bytes)| bytes.clone())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        pathname: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredBlob, BlobError> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(pathname.to_string(), (content_type.to_string(), bytes));
        Ok(StoredBlob {
            url: format!("memory://{pathname}"),
            pathname: pathname.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get() {
        let store = MemoryBlobStore::new();
        let blob = store
            .put("products/x-cover.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(blob.url, "memory://products/x-cover.png");
        assert_eq!(store.get("products/x-cover.png").await, Some(vec![1, 2, 3]));
    }
}
