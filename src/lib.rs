pub mod config;
pub mod file;
pub mod humanize;
pub mod source;

pub use file::{FileError, FileHandle, FileOptions, LoadedFile, TypedValue, ValueInfo};
pub use source::{EngineError, EngineService, LocalReader};
