//! Engine service backed by the object_store crate

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use object_store::{ObjectStore, path::Path as StoragePath};
use std::path::Path;
use std::sync::Arc;

use super::{EngineError, EngineService};

/// Serves raw objects as base64 text
#[derive(Debug, Clone)]
pub struct ObjectStoreEngineService {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreEngineService {
    /// Wrap any object_store backend
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// In-memory store for testing/development
    pub fn in_memory() -> Self {
        Self::new(Arc::new(object_store::memory::InMemory::new()))
    }

    /// Local directory store; `root` must exist
    pub fn local(root: &Path) -> Result<Self, EngineError> {
        let store = object_store::local::LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Store raw bytes under `path`
    pub async fn put(&self, path: &str, data: Bytes) -> Result<(), EngineError> {
        let size = data.len();
        self.store.put(&StoragePath::from(path), data.into()).await?;

        tracing::info!(path, size, "Stored object");
        Ok(())
    }
}

#[async_trait]
impl EngineService for ObjectStoreEngineService {
    async fn get(&self, path: &str) -> Result<String, EngineError> {
        let result = match self.store.get(&StoragePath::from(path)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(EngineError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = result.bytes().await?;

        tracing::debug!(path, size = bytes.len(), "Read object");

        Ok(STANDARD.encode(&bytes))
    }
}
