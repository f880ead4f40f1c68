use super::{Codec, CodecError, into_fields};
use crate::core::{Fields, Value};

/// Compact binary documents via rmp-serde. Maps are written with named keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessagePackCodec;

impl Codec for MessagePackCodec {
    fn encode(&self, fields: &Fields) -> Result<Vec<u8>, CodecError> {
        Ok(rmp_serde::to_vec_named(fields)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Fields, CodecError> {
        if bytes.is_empty() {
            return Ok(Fields::new());
        }
        let document: Value = rmp_serde::from_slice(bytes)?;
        into_fields(document)
    }
}
