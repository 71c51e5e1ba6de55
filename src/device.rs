//! Network device capability.
//!
//! The device performs the actual transfer. Every `issue_*` call starts a
//! request and returns an opaque [`Handle`]; the outcome arrives later as a
//! [`CompletionEvent`](crate::unit::CompletionEvent) on the channel the
//! client bound.
//!
//! Bodies, headers and form fields are passed through unchanged.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque numeric identifier of an in-flight request.
///
/// Unique among the requests currently pending on one device.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Handle(pub u32);

impl Handle {
    /// Raw numeric value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Handle {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request with an arbitrary method, headers and body.
///
/// # Example
///
/// ```
/// use slotwire::CustomRequest;
///
/// let req = CustomRequest::new("PATCH")
///     .header("X-Token", "abc")
///     .content("application/json", r#"{"on":true}"#);
///
/// assert_eq!(req.method(), "PATCH");
/// assert_eq!(req.headers().len(), 1);
/// assert_eq!(req.content_type(), Some("application/json"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRequest {
    method: String,
    headers: Vec<(String, String)>,
    content_type: Option<String>,
    content: Option<Bytes>,
}

impl CustomRequest {
    /// Start a request with the given HTTP method.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            headers: Vec::new(),
            content_type: None,
            content: None,
        }
    }

    /// Append a header. Order and duplicates are preserved.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body together with its content type.
    pub fn content(mut self, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.content_type = Some(content_type.into());
        self.content = Some(data.into());
        self
    }

    /// Set the body without declaring a content type.
    pub fn body(mut self, data: impl Into<Bytes>) -> Self {
        self.content = Some(data.into());
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Declared content type, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Body bytes, if any.
    pub fn content_data(&self) -> Option<&Bytes> {
        self.content.as_ref()
    }
}

/// Capability implemented by the host's network device.
///
/// Transport, retries, timeouts and connection reuse all belong to the
/// device.
pub trait Device: Send + Sync {
    /// Start a GET request.
    fn issue_get(&self, url: &str) -> Result<Handle>;

    /// Start a POST request with a text body.
    fn issue_post(&self, url: &str, data: &str) -> Result<Handle>;

    /// Start a POST request with a binary body.
    fn issue_post_data(&self, url: &str, content_type: Option<&str>, data: &[u8])
        -> Result<Handle>;

    /// Start a POST request with url-encoded form fields.
    fn issue_post_form(&self, url: &str, form: &[(String, String)]) -> Result<Handle>;

    /// Start a request with an arbitrary method.
    fn issue_custom_request(&self, url: &str, request: &CustomRequest) -> Result<Handle>;

    /// Abort a pending request. Returns the device's success indicator.
    fn abort(&self, handle: Handle) -> bool;

    /// Current upload progress for `handle`.
    ///
    /// The value for a handle that is no longer pending is device-defined.
    fn upload_progress(&self, handle: Handle) -> f64;

    /// Current download progress for `handle`.
    fn download_progress(&self, handle: Handle) -> f64;

    /// Drop every cached cookie.
    fn clear_cookie_cache(&self);

    /// Drop the cookies cached for one URL.
    fn clear_url_cookie_cache(&self, url: &str);

    /// Whether the host denied this program network access.
    fn access_denied(&self) -> bool;
}
