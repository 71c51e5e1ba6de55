//! JSON codec using `serde_json`.

use crate::error::Result;

/// JSON codec for structured data.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to JSON bytes.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Decode JSON bytes to a value.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Handle;
    use crate::error::SlotwireError;
    use crate::unit::CompletionEvent;

    #[test]
    fn test_encode_uses_camel_case() {
        let event = CompletionEvent::new(1, 200);
        let json = String::from_utf8(JsonCodec::encode(&event).unwrap()).unwrap();

        assert!(json.contains("\"responseCode\":200"));
        assert!(json.contains("\"isError\":false"));
        assert!(json.contains("\"type\":null"));
    }

    #[test]
    fn test_decode_event() {
        let event: CompletionEvent = JsonCodec::decode(
            br#"{"handle":12,"responseCode":500,"isError":true,"errorType":"http","errorMessage":"boom"}"#,
        )
        .unwrap();

        assert_eq!(event.handle, Handle(12));
        assert_eq!(event.response_code, 500);
        assert!(event.is_error);
        assert_eq!(event.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let result: Result<CompletionEvent> = JsonCodec::decode(b"{");
        assert!(matches!(result, Err(SlotwireError::Json(_))));
    }
}
