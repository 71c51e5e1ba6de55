//! Codec module - decoding completion events delivered as bytes.
//!
//! Hosts that marshal completion events across a boundary (an IPC bridge,
//! a scripting runtime) hand them over serialized. Two formats are
//! supported:
//!
//! - [`MsgPackCodec`] - MessagePack using `rmp-serde` (struct-as-map)
//! - [`JsonCodec`] - JSON using `serde_json`
//!
//! Both expect the camelCase field names of
//! [`CompletionEvent`](crate::unit::CompletionEvent).
//!
//! # Example
//!
//! ```
//! use slotwire::codec::{JsonCodec, MsgPackCodec};
//! use slotwire::unit::CompletionEvent;
//!
//! let event = CompletionEvent::new(5, 200).with_text("ok");
//!
//! let packed = MsgPackCodec::encode(&event).unwrap();
//! let decoded: CompletionEvent = MsgPackCodec::decode(&packed).unwrap();
//! assert_eq!(decoded, event);
//!
//! let decoded: CompletionEvent =
//!     JsonCodec::decode(br#"{"handle":5,"responseCode":200,"text":"ok"}"#).unwrap();
//! assert_eq!(decoded, event);
//! ```

mod json;
mod msgpack;

pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;
