//! Content sources consulted by [`FileHandle::load`](crate::file::FileHandle::load)
//!
//! Two seams, both object-safe so callers can inject their own:
//!
//! - [`LocalReader`] - reads raw bytes from a filesystem path
//! - [`EngineService`] - fetches base64-encoded content by remote path
//!
//! Timeouts, retries and size limits are properties of the concrete
//! engine service, never of the file handle.

mod http;
mod local;
mod store;

pub use http::HttpEngineService;
pub use local::FsReader;
pub use store::ObjectStoreEngineService;

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{EngineConfig, EngineProvider};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine request failed: {0}")]
    RequestFailed(String),

    #[error("engine request timed out")]
    Timeout,

    #[error("invalid engine URL: {0}")]
    InvalidUrl(String),

    #[error("remote content not found: {0}")]
    NotFound(String),

    #[error("response of {actual} bytes exceeds limit of {limit} bytes")]
    TooLarge { actual: u64, limit: u64 },

    #[error("engine misconfigured: {0}")]
    Misconfigured(String),

    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

/// Remote content service addressed by path
#[async_trait]
pub trait EngineService: Send + Sync {
    /// Fetch the content stored at `path` as standard base64 text
    async fn get(&self, path: &str) -> Result<String, EngineError>;
}

/// Filesystem read collaborator
#[async_trait]
pub trait LocalReader: Send + Sync {
    async fn read_file(&self, path: &Path) -> std::io::Result<Bytes>;
}

/// Build the engine service selected by configuration
pub fn engine_from_config(config: &EngineConfig) -> Result<Arc<dyn EngineService>, EngineError> {
    match config.provider {
        EngineProvider::Http => Ok(Arc::new(HttpEngineService::new(config)?)),
        EngineProvider::Local => {
            let root = config.root.as_ref().ok_or_else(|| {
                EngineError::Misconfigured("local provider requires engine.root".to_string())
            })?;
            Ok(Arc::new(ObjectStoreEngineService::local(root)?))
        }
        EngineProvider::Memory => Ok(Arc::new(ObjectStoreEngineService::in_memory())),
    }
}
