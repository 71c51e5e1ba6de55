//! Client builder and request façade.
//!
//! The [`ClientBuilder`] resolves the device and processing unit, binds a
//! channel and produces a [`Client`]. The [`Client`] then:
//! 1. Issues verb-specific calls to the device
//! 2. Registers the returned handle with its dispatcher
//! 3. Hands back a [`Request`] view immediately
//!
//! Completion arrives later through the bound channel, either as a callback
//! or by polling the request.
//!
//! # Example
//!
//! ```ignore
//! use slotwire::Client;
//!
//! let client = Client::builder()
//!     .device(nic)
//!     .unit(cpu)
//!     .channel(2)
//!     .build()?;
//!
//! let request = client
//!     .get("http://example.com/status")
//!     .on_complete(|response| println!("{}: {}", response.response_code(), response.text()))
//!     .send()?;
//!
//! assert!(!request.ready());
//! ```
//!
//! The client exposes no mutable state:
//!
//! ```compile_fail
//! # fn check(client: slotwire::Client) {
//! client.access_denied = true;
//! # }
//! ```
//!
//! Completion events reach a client only through its bound channel; its
//! dispatcher is not reachable from outside:
//!
//! ```compile_fail
//! # fn check(client: slotwire::Client) {
//! client.dispatcher().on_event(slotwire::unit::CompletionEvent::new(1, 200));
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::binder::{self, Channel};
use crate::device::{CustomRequest, Device};
use crate::dispatcher::Dispatcher;
use crate::error::{ConfigError, Result};
use crate::host::Host;
use crate::request::{Callback, Request};
use crate::response::Response;
use crate::unit::ProcessingUnit;

/// Owner identity recorded on the channel when none is configured.
pub const DEFAULT_OWNER: &str = "slotwire";

/// Builder for configuring and creating a client.
///
/// Every component is optional: a missing device or unit is taken from the
/// configured [`Host`], and a missing channel is the unit's lowest free one.
pub struct ClientBuilder {
    device: Option<Arc<dyn Device>>,
    unit: Option<Arc<dyn ProcessingUnit>>,
    channel: Option<u16>,
    owner: String,
    host: Option<Arc<dyn Host>>,
}

impl ClientBuilder {
    /// Create a new client builder.
    pub fn new() -> Self {
        Self {
            device: None,
            unit: None,
            channel: None,
            owner: DEFAULT_OWNER.to_string(),
            host: None,
        }
    }

    /// Use this network device.
    pub fn device(mut self, device: Arc<dyn Device>) -> Self {
        self.device = Some(device);
        self
    }

    /// Bind on this processing unit.
    pub fn unit(mut self, unit: Arc<dyn ProcessingUnit>) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Bind this channel instead of the lowest free one.
    ///
    /// Must be within `1..=channel_count` of the unit.
    pub fn channel(mut self, channel: u16) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Identity recorded as the channel's owner.
    ///
    /// Default: `"slotwire"`
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Where to look up a device or unit that was not given explicitly.
    pub fn host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    /// Resolve defaults, bind the channel and build the client.
    ///
    /// Fails with [`ConfigError::DeviceNotFound`] / [`ConfigError::UnitNotFound`]
    /// when a component is neither given nor offered by the host, and with
    /// the channel binder's errors when no channel can be bound.
    pub fn build(self) -> Result<Client> {
        let device = match self.device {
            Some(device) => device,
            None => self
                .host
                .as_ref()
                .and_then(|host| host.primary_device())
                .ok_or(ConfigError::DeviceNotFound)?,
        };

        let unit = match self.unit {
            Some(unit) => unit,
            None => self
                .host
                .as_ref()
                .and_then(|host| host.primary_unit())
                .ok_or(ConfigError::UnitNotFound)?,
        };

        let dispatcher = Dispatcher::new();
        let channel = binder::register(&unit, self.channel, &self.owner, dispatcher.dispatch_fn())?;

        tracing::debug!(
            "Client {} ready on channel {} of unit {}",
            self.owner,
            channel.number(),
            unit.name()
        );

        Ok(Client {
            device,
            channel,
            dispatcher,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client bound to one device, one unit and one channel.
///
/// Immutable after construction. Each client has its own dispatcher;
/// clients on different channels share nothing.
pub struct Client {
    device: Arc<dyn Device>,
    channel: Channel,
    dispatcher: Dispatcher,
}

impl Client {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Prepare a GET request.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.prepare(url, Payload::Get)
    }

    /// Prepare a POST request with a text body.
    pub fn post(&self, url: impl Into<String>, data: impl Into<String>) -> RequestBuilder<'_> {
        self.prepare(url, Payload::Text(data.into()))
    }

    /// Prepare a POST request with a binary body.
    pub fn post_data(
        &self,
        url: impl Into<String>,
        content_type: Option<&str>,
        data: impl Into<Bytes>,
    ) -> RequestBuilder<'_> {
        self.prepare(
            url,
            Payload::Data {
                content_type: content_type.map(str::to_string),
                data: data.into(),
            },
        )
    }

    /// Prepare a PUT request.
    pub fn put(&self, url: impl Into<String>, data: impl Into<Bytes>) -> RequestBuilder<'_> {
        self.prepare(url, Payload::Custom(CustomRequest::new("PUT").body(data)))
    }

    /// Prepare a POST request with form fields, kept in the given order.
    pub fn post_form<I, K, V>(&self, url: impl Into<String>, form: I) -> RequestBuilder<'_>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let form = form
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.prepare(url, Payload::Form(form))
    }

    /// Prepare a request with an arbitrary method, headers and body.
    pub fn request(&self, url: impl Into<String>, request: CustomRequest) -> RequestBuilder<'_> {
        self.prepare(url, Payload::Custom(request))
    }

    /// Drop every cookie cached by the device.
    pub fn clear_cookie_cache(&self) {
        self.device.clear_cookie_cache();
    }

    /// Drop the cookies the device cached for `url`.
    pub fn clear_url_cookie_cache(&self, url: &str) {
        self.device.clear_url_cookie_cache(url);
    }

    /// Whether the host denied network access.
    pub fn access_denied(&self) -> bool {
        self.device.access_denied()
    }

    /// The channel this client is bound to.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Number of issued requests still waiting for completion.
    pub fn pending_requests(&self) -> usize {
        self.dispatcher.pending_count()
    }

    fn prepare(&self, url: impl Into<String>, payload: Payload) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            url: url.into(),
            payload,
            callback: None,
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("channel", &self.channel)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// What to hand the device when the request is sent.
enum Payload {
    Get,
    Text(String),
    Data {
        content_type: Option<String>,
        data: Bytes,
    },
    Form(Vec<(String, String)>),
    Custom(CustomRequest),
}

impl Payload {
    fn method(&self) -> &str {
        match self {
            Payload::Get => "GET",
            Payload::Text(_) | Payload::Data { .. } | Payload::Form(_) => "POST",
            Payload::Custom(request) => request.method(),
        }
    }
}

/// A request that has been prepared but not yet issued.
#[must_use = "requests are only issued by `send`"]
pub struct RequestBuilder<'a> {
    client: &'a Client,
    url: String,
    payload: Payload,
    callback: Option<Callback>,
}

impl RequestBuilder<'_> {
    /// Invoke `callback` with the response when the request completes.
    ///
    /// Not invoked if the request is aborted first.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&Response) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Issue the request to the device.
    ///
    /// Returns as soon as the device hands out a handle; the request is
    /// `InProgress` at that point. A device refusal is returned as an error
    /// and leaves nothing pending.
    pub fn send(self) -> Result<Request> {
        let device = &self.client.device;
        let url = self.url.as_str();

        let handle = match &self.payload {
            Payload::Get => device.issue_get(url),
            Payload::Text(data) => device.issue_post(url, data),
            Payload::Data { content_type, data } => {
                device.issue_post_data(url, content_type.as_deref(), data)
            }
            Payload::Form(form) => device.issue_post_form(url, form),
            Payload::Custom(request) => device.issue_custom_request(url, request),
        }?;

        tracing::debug!("Issued {} {} as request {}", self.payload.method(), url, handle);

        Ok(self
            .client
            .dispatcher
            .add_request(device.clone(), handle, self.callback))
    }
}
