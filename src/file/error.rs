use thiserror::Error;

use crate::source::EngineError;

/// File handle errors
///
/// Source failures are wrapped transparently: their message and `source()`
/// chain are exactly those of the collaborator that failed.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("missing file options: local_path, remote_path or typed_value is required")]
    MissingFileOptions,

    #[error("remote_path was given without an engine service")]
    MissingEngineService,

    #[error("file content is not loaded")]
    NotLoaded,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid base64 content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, FileError>;
