use super::{Codec, CodecError, into_fields, is_blank};
use crate::core::{Fields, Value};

/// JSON documents via serde_json. Compact by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl JsonCodec {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn encode(&self, fields: &Fields) -> Result<Vec<u8>, CodecError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(fields)?
        } else {
            serde_json::to_vec(fields)?
        };
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Fields, CodecError> {
        if is_blank(bytes) {
            return Ok(Fields::new());
        }
        let document: Value = serde_json::from_slice(bytes)?;
        into_fields(document)
    }
}
