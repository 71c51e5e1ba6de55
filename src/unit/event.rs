//! Raw completion notification.

use serde::{Deserialize, Serialize};

use crate::device::Handle;

/// Completion notification delivered by the host for one finished request.
///
/// Every field except `handle` is optional on the wire and defaults to its
/// empty value. Field names are camelCase when serialized, `kind` travels as
/// `type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    /// Handle of the request that finished.
    pub handle: Handle,
    /// HTTP status code, or a device-specific value when the transfer failed.
    #[serde(default)]
    pub response_code: i32,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub is_error: bool,
    /// Response body as text.
    #[serde(default)]
    pub text: String,
    /// Device-reported response type.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl CompletionEvent {
    /// Event for `handle` with the given status code and nothing else set.
    pub fn new(handle: impl Into<Handle>, response_code: i32) -> Self {
        Self {
            handle: handle.into(),
            response_code,
            ..Self::default()
        }
    }

    /// Set the response body.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Mark the event as a transfer failure.
    pub fn with_error(mut self, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        self.is_error = true;
        self.error_type = Some(error_type.into());
        self.error_message = Some(message.into());
        self
    }
}
