//! # slotwire
//!
//! Asynchronous HTTP requests over a shared hardware notification channel.
//!
//! A host provides a network [`Device`] that performs transfers and a
//! [`ProcessingUnit`](unit::ProcessingUnit) with numbered notification
//! channels. Completion of a transfer is reported out of band, on a channel,
//! identified only by an opaque [`Handle`]. This crate turns those raw
//! notifications into per-request [`Request`] objects with callback delivery
//! and poll-based status.
//!
//! ## Architecture
//!
//! - **Channel binder** ([`binder`]): claims one channel, installs the dispatch function
//! - **Dispatcher** ([`dispatcher`]): pending handle table, routes each event once
//! - **Request** ([`Request`]): live progress, readiness, cached [`Response`], `abort`
//! - **Client** ([`Client`]): verb calls to the device, threaded into the dispatcher
//!
//! ## Example
//!
//! ```ignore
//! use slotwire::Client;
//!
//! let client = Client::builder()
//!     .device(nic)
//!     .unit(cpu)
//!     .build()?;
//!
//! let request = client.get("http://example.com/").send()?;
//!
//! // ... host ticks, the completion event arrives on the bound channel ...
//!
//! if let Some(response) = request.result() {
//!     println!("{} {}", response.response_code(), response.text());
//! }
//! ```

pub mod binder;
pub mod codec;
pub mod device;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod unit;

mod client;
mod request;
mod response;

#[cfg(test)]
mod testing;

pub use client::{Client, ClientBuilder, RequestBuilder, DEFAULT_OWNER};
pub use device::{CustomRequest, Device, Handle};
pub use error::{ConfigError, Result, SlotwireError};
pub use request::{Callback, Request, Status};
pub use response::{Response, STATUS_OK};
