//! Encoding between a record's field mapping and the bytes kept in a store.
//!
//! A [`Codec`] must round-trip: `decode(encode(m))` yields `m` for every
//! supported value. Empty input and a top-level null both decode to an empty
//! mapping, so a freshly created (or truncated) file loads as an empty record.

mod json;
mod msgpack;
mod yaml;

pub use json::JsonCodec;
pub use msgpack::MessagePackCodec;
pub use yaml::YamlCodec;

use crate::core::{Fields, Value};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("MessagePack encode error: {0}")]
    MessagePackEncode(#[from] rmp_serde::encode::Error),

    #[error("MessagePack decode error: {0}")]
    MessagePackDecode(#[from] rmp_serde::decode::Error),

    #[error("Expected a mapping at the top level, found {0}")]
    NotAMapping(String),
}

/// Converts a field mapping to bytes and back.
pub trait Codec {
    fn encode(&self, fields: &Fields) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<Fields, CodecError>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn encode(&self, fields: &Fields) -> Result<Vec<u8>, CodecError> {
        (**self).encode(fields)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Fields, CodecError> {
        (**self).decode(bytes)
    }
}

/// Turn a decoded document into a field mapping.
pub(crate) fn into_fields(document: Value) -> Result<Fields, CodecError> {
    match document {
        Value::Object(fields) => Ok(fields),
        Value::Null => Ok(Fields::new()),
        Value::Bool(_) => Err(CodecError::NotAMapping("a boolean".to_string())),
        Value::Number(_) => Err(CodecError::NotAMapping("a number".to_string())),
        Value::String(_) => Err(CodecError::NotAMapping("a string".to_string())),
        Value::Array(_) => Err(CodecError::NotAMapping("a sequence".to_string())),
    }
}

pub(crate) fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

// ============================================================================
// Runtime-selected format
// ============================================================================

/// Codec chosen at runtime, e.g. from a file extension or a CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
    MessagePack,
}

impl Format {
    /// Infer the format from a path's extension, falling back to JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Format::Yaml,
            Some("msgpack") | Some("mp") => Format::MessagePack,
            _ => Format::Json,
        }
    }
}

impl Codec for Format {
    fn encode(&self, fields: &Fields) -> Result<Vec<u8>, CodecError> {
        match self {
            Format::Json => JsonCodec::pretty().encode(fields),
            Format::Yaml => YamlCodec.encode(fields),
            Format::MessagePack => MessagePackCodec.encode(fields),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Fields, CodecError> {
        match self {
            Format::Json => JsonCodec::default().decode(bytes),
            Format::Yaml => YamlCodec.decode(bytes),
            Format::MessagePack => MessagePackCodec.decode(bytes),
        }
    }
}
