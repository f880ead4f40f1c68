use super::{Codec, CodecError, into_fields, is_blank};
use crate::core::{Fields, Value};

/// YAML documents via serde_yaml, for records meant to be read and edited by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn encode(&self, fields: &Fields) -> Result<Vec<u8>, CodecError> {
        Ok(serde_yaml::to_string(fields)?.into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Fields, CodecError> {
        if is_blank(bytes) {
            return Ok(Fields::new());
        }
        let document: Value = serde_yaml::from_slice(bytes)?;
        into_fields(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fields_from;

    #[test]
    fn test_encode_is_plain_mapping() {
        let fields = fields_from([("foo", Value::from("bar")), ("count", Value::from(2))]);
        let text = String::from_utf8(YamlCodec.encode(&fields).unwrap()).unwrap();
        assert_eq!(text, "foo: bar\ncount: 2\n");
    }

    #[test]
    fn test_decode_hand_written_document() {
        let fields = YamlCodec
            .decode(b"---\nname: widget\ntags:\n  - a\n  - b\n")
            .unwrap();
        assert_eq!(fields["name"], Value::from("widget"));
        assert_eq!(fields["tags"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_decode_sequence_is_rejected() {
        let err = YamlCodec.decode(b"- 1\n- 2\n").unwrap_err();
        assert!(matches!(err, CodecError::NotAMapping(_)));
    }
}
