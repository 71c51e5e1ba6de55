//! Immutable outcome of a completed request.
//!
//! A [`Response`] is mapped from exactly one
//! [`CompletionEvent`](crate::unit::CompletionEvent) and never changes
//! afterwards. A non-200 status is not an error at this layer: `ok()` is
//! simply `false`, and transfer failures show up through `is_error()`,
//! `error_type()` and `error_message()`.
//!
//! Fields are private, so a response cannot be modified once delivered:
//!
//! ```compile_fail
//! use slotwire::{Response, unit::CompletionEvent};
//!
//! let mut response = Response::from_event(&CompletionEvent::new(1, 200));
//! response.response_code = 404;
//! ```
//!
//! Nor can one be built other than from an event:
//!
//! ```compile_fail
//! let response: slotwire::Response = serde_json::from_str(r#"{"responseCode":200}"#).unwrap();
//! ```

use crate::unit::CompletionEvent;

/// HTTP status that marks a response as `ok`.
pub const STATUS_OK: i32 = 200;

/// Snapshot of a completed request.
///
/// Only constructed from a [`CompletionEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    response_code: i32,
    content_type: Option<String>,
    error_message: Option<String>,
    error_type: Option<String>,
    is_error: bool,
    text: String,
    kind: Option<String>,
}

impl Response {
    /// Map a raw completion event.
    pub fn from_event(event: &CompletionEvent) -> Self {
        Self {
            response_code: event.response_code,
            content_type: event.content_type.clone(),
            error_message: event.error_message.clone(),
            error_type: event.error_type.clone(),
            is_error: event.is_error,
            text: event.text.clone(),
            kind: event.kind.clone(),
        }
    }

    /// `true` when the status code is exactly 200.
    #[inline]
    pub fn ok(&self) -> bool {
        self.response_code == STATUS_OK
    }

    #[inline]
    pub fn response_code(&self) -> i32 {
        self.response_code
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref()
    }

    /// Whether the device reported a transfer failure.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Response body as text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Device-reported response type.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
}

impl From<&CompletionEvent> for Response {
    fn from(event: &CompletionEvent) -> Self {
        Self::from_event(event)
    }
}

impl From<CompletionEvent> for Response {
    fn from(event: CompletionEvent) -> Self {
        Self {
            response_code: event.response_code,
            content_type: event.content_type,
            error_message: event.error_message,
            error_type: event.error_type,
            is_error: event.is_error,
            text: event.text,
            kind: event.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_only_for_200() {
        assert!(Response::from_event(&CompletionEvent::new(1, 200)).ok());
        assert!(!Response::from_event(&CompletionEvent::new(1, 201)).ok());
        assert!(!Response::from_event(&CompletionEvent::new(1, 404)).ok());
        assert!(!Response::from_event(&CompletionEvent::new(1, 0)).ok());
    }

    #[test]
    fn test_maps_every_field() {
        let event = CompletionEvent {
            content_type: Some("text/html".into()),
            kind: Some("text".into()),
            ..CompletionEvent::new(3, 503).with_text("down").with_error("http", "unavailable")
        };

        let response = Response::from_event(&event);

        assert_eq!(response.response_code(), 503);
        assert_eq!(response.content_type(), Some("text/html"));
        assert_eq!(response.error_message(), Some("unavailable"));
        assert_eq!(response.error_type(), Some("http"));
        assert!(response.is_error());
        assert_eq!(response.text(), "down");
        assert_eq!(response.kind(), Some("text"));
        assert!(!response.ok());
    }

    #[test]
    fn test_owned_and_borrowed_mapping_agree() {
        let event = CompletionEvent::new(8, 200).with_text("body");
        assert_eq!(Response::from(&event), Response::from(event));
    }

    #[test]
    fn test_error_with_200_is_still_ok() {
        // ok() reflects the status code only
        let response = Response::from_event(&CompletionEvent::new(1, 200).with_error("x", "y"));
        assert!(response.ok());
        assert!(response.is_error());
    }
}
