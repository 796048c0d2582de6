//! Deferred-loading file handle
//!
//! A [`FileHandle`] is built synchronously from [`FileOptions`] naming where
//! its content lives, then filled once by [`FileHandle::load`]:
//!
//! 1. `remote_path` - fetched through the [`EngineService`], base64-decoded
//! 2. `local_path` - read through the [`LocalReader`], used as-is
//! 3. `typed_value` - the embedded envelope's `value`, base64-decoded
//!
//! The first source present wins. Once loaded, [`FileHandle::create_typed_value`]
//! projects content and metadata into a [`TypedValue`].
//!
//! ```no_run
//! use typedfile::file::{FileHandle, FileOptions};
//!
//! # async fn example() -> typedfile::file::Result<()> {
//! let file = FileHandle::new(
//!     FileOptions::builder()
//!         .local_path("report.json")
//!         .mimetype("application/json")
//!         .build(),
//! )?;
//! let typed = file.load().await?.create_typed_value()?;
//! println!("{}", typed.value);
//! # Ok(())
//! # }
//! ```

mod error;
mod typed_value;

pub use error::{FileError, Result};
pub use typed_value::{TypedValue, ValueInfo, ValueKind};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::source::{EngineService, FsReader, LocalReader};

/// Construction options for [`FileHandle`]
///
/// At least one of `local_path`, `remote_path` or `typed_value` is required.
#[derive(Default, bon::Builder)]
pub struct FileOptions {
    #[builder(into)]
    pub local_path: Option<PathBuf>,
    #[builder(into)]
    pub remote_path: Option<String>,
    #[builder(into)]
    pub filename: Option<String>,
    #[builder(into)]
    pub mimetype: Option<String>,
    #[builder(into)]
    pub encoding: Option<String>,
    /// Required with `remote_path`
    pub engine_service: Option<Arc<dyn EngineService>>,
    pub typed_value: Option<TypedValue>,
    /// Defaults to [`FsReader`]
    pub reader: Option<Arc<dyn LocalReader>>,
}

/// Single file whose content is loaded lazily, at most once
pub struct FileHandle {
    local_path: Option<PathBuf>,
    remote_path: Option<String>,
    filename: Option<String>,
    mimetype: Option<String>,
    encoding: Option<String>,
    engine_service: Option<Arc<dyn EngineService>>,
    typed_value: Option<TypedValue>,
    reader: Arc<dyn LocalReader>,
    content: OnceCell<Bytes>,
}

impl FileHandle {
    /// Validate options and build an unloaded handle. Performs no I/O.
    ///
    /// Explicit metadata takes precedence over the embedded typed value's
    /// `valueInfo`.
    pub fn new(options: FileOptions) -> Result<Self> {
        let FileOptions {
            local_path,
            remote_path,
            filename,
            mimetype,
            encoding,
            engine_service,
            typed_value,
            reader,
        } = options;

        if local_path.is_none() && remote_path.is_none() && typed_value.is_none() {
            return Err(FileError::MissingFileOptions);
        }
        if remote_path.is_some() && engine_service.is_none() {
            return Err(FileError::MissingEngineService);
        }

        let embedded = typed_value
            .as_ref()
            .map(|typed| typed.value_info.clone())
            .unwrap_or_default();

        Ok(Self {
            local_path,
            remote_path,
            filename: filename.or(embedded.filename),
            mimetype: mimetype.or(embedded.mimetype),
            encoding: encoding.or(embedded.encoding),
            engine_service,
            typed_value,
            reader: reader.unwrap_or_else(|| Arc::new(FsReader)),
            content: OnceCell::new(),
        })
    }

    /// Handle backed only by an existing envelope
    pub fn from_typed_value(typed_value: TypedValue) -> Result<Self> {
        Self::new(FileOptions {
            typed_value: Some(typed_value),
            ..Default::default()
        })
    }

    /// Populate `content` from the configured source.
    ///
    /// Idempotent: once content is set, later calls return immediately.
    /// Concurrent callers on a shared handle wait for the first fetch
    /// instead of issuing their own. Source errors are returned unchanged
    /// and leave the handle unloaded.
    pub async fn load(&self) -> Result<&Self> {
        self.content.get_or_try_init(|| self.fetch()).await?;
        Ok(self)
    }

    async fn fetch(&self) -> Result<Bytes> {
        if let Some(remote_path) = &self.remote_path {
            let engine = self
                .engine_service
                .as_ref()
                .ok_or(FileError::MissingEngineService)?;
            let encoded = engine.get(remote_path).await?;
            let content = STANDARD.decode(encoded.as_bytes())?;

            debug!(remote_path = %remote_path, size = content.len(), "Loaded content from engine service");
            return Ok(Bytes::from(content));
        }

        if let Some(local_path) = &self.local_path {
            let content = self.reader.read_file(local_path).await?;

            debug!(local_path = %local_path.display(), size = content.len(), "Loaded content from local path");
            return Ok(content);
        }

        match &self.typed_value {
            Some(typed) => Ok(Bytes::from(typed.decode_value()?)),
            None => Err(FileError::MissingFileOptions),
        }
    }

    /// Serialize content and metadata. Fails with [`FileError::NotLoaded`]
    /// before [`load`](Self::load) has completed.
    pub fn create_typed_value(&self) -> Result<TypedValue> {
        self.loaded()
            .map(|loaded| loaded.typed_value())
            .ok_or(FileError::NotLoaded)
    }

    /// Loaded view of this handle, if content is present
    pub fn loaded(&self) -> Option<LoadedFile<'_>> {
        self.content.get().map(|content| LoadedFile {
            handle: self,
            content,
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.content.initialized()
    }

    pub fn content(&self) -> Option<&Bytes> {
        self.content.get()
    }

    /// Consume the handle, keeping only its content
    pub fn into_content(self) -> Option<Bytes> {
        self.content.into_inner()
    }

    pub fn value_info(&self) -> ValueInfo {
        ValueInfo {
            filename: self.filename.clone(),
            mimetype: self.mimetype.clone(),
            encoding: self.encoding.clone(),
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        self.local_path.as_deref()
    }

    pub fn remote_path(&self) -> Option<&str> {
        self.remote_path.as_deref()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("local_path", &self.local_path)
            .field("remote_path", &self.remote_path)
            .field("filename", &self.filename)
            .field("mimetype", &self.mimetype)
            .field("encoding", &self.encoding)
            .field("has_engine_service", &self.engine_service.is_some())
            .field("has_typed_value", &self.typed_value.is_some())
            .field("content_len", &self.content.get().map(Bytes::len))
            .finish()
    }
}

/// A [`FileHandle`] known to hold content
#[derive(Debug, Clone, Copy)]
pub struct LoadedFile<'a> {
    handle: &'a FileHandle,
    content: &'a Bytes,
}

impl<'a> LoadedFile<'a> {
    pub fn content(&self) -> &'a Bytes {
        self.content
    }

    pub fn handle(&self) -> &'a FileHandle {
        self.handle
    }

    pub fn typed_value(&self) -> TypedValue {
        TypedValue::new(self.content, self.handle.value_info())
    }
}
