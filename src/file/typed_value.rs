//! Typed-value envelope: base64 content plus file metadata
//!
//! Wire shape:
//!
//! ```json
//! {
//!   "value": "aGVsbG8=",
//!   "type": "file",
//!   "valueInfo": { "filename": "a.txt", "mimetype": "text/plain", "encoding": "utf-8" }
//! }
//! ```

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Type discriminator. Only `"file"` is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    #[default]
    #[serde(rename = "file")]
    File,
}

/// Descriptive metadata carried next to the payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl ValueInfo {
    pub fn new(
        filename: impl Into<String>,
        mimetype: impl Into<String>,
        encoding: impl Into<String>,
    ) -> Self {
        Self {
            filename: Some(filename.into()),
            mimetype: Some(mimetype.into()),
            encoding: Some(encoding.into()),
        }
    }
}

/// Serialized file envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedValue {
    /// Standard, padded base64 of the file content
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: ValueKind,
    #[serde(rename = "valueInfo", default)]
    pub value_info: ValueInfo,
}

impl TypedValue {
    /// Encode raw bytes into a new envelope
    pub fn new(content: &[u8], value_info: ValueInfo) -> Self {
        Self {
            value: STANDARD.encode(content),
            kind: ValueKind::File,
            value_info,
        }
    }

    /// Decode `value` back into raw bytes
    pub fn decode_value(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.value.as_bytes())
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
