//! MsgPack codec using `rmp-serde`.
//!
//! Always `to_vec_named`, never `to_vec`: events are keyed by field name,
//! and positional arrays would not survive a host that reorders or omits
//! fields.

use crate::error::Result;

/// MessagePack codec for structured data.
///
/// Structs are serialized as maps (with field names) rather than arrays.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Handle;
    use crate::unit::CompletionEvent;
    use serde::Serialize;

    #[test]
    fn test_encode_decode_event() {
        let event = CompletionEvent::new(42, 200)
            .with_text("hello")
            .with_error("dns", "lookup failed");

        let encoded = MsgPackCodec::encode(&event).unwrap();
        let decoded: CompletionEvent = MsgPackCodec::decode(&encoded).unwrap();

        assert_eq!(decoded, event);
    }

    #[test]
    fn test_to_vec_named_produces_map_format() {
        let encoded = MsgPackCodec::encode(&CompletionEvent::new(1, 200)).unwrap();

        // map16 (0xDE) or fixmap (0x8X); arrays would be 0xDC / 0x9X
        assert!(
            encoded[0] == 0xDE || encoded[0] & 0xF0 == 0x80,
            "Expected map format, got {:02X}",
            encoded[0]
        );
    }

    #[test]
    fn test_decode_partial_event() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Partial {
            handle: u32,
            response_code: i32,
        }

        let encoded = MsgPackCodec::encode(&Partial {
            handle: 9,
            response_code: 204,
        })
        .unwrap();
        let decoded: CompletionEvent = MsgPackCodec::decode(&encoded).unwrap();

        assert_eq!(decoded.handle, Handle(9));
        assert_eq!(decoded.response_code, 204);
        assert!(decoded.text.is_empty());
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let invalid = b"not valid msgpack";
        let result: Result<CompletionEvent> = MsgPackCodec::decode(invalid);
        assert!(result.is_err());
    }
}
