//! Request dispatcher - routes completion events to pending requests.
//!
//! The dispatcher owns the table of pending requests for one client, keyed
//! by device [`Handle`]. Its [`dispatch_fn`](Dispatcher::dispatch_fn) is the
//! function bound on the client's channel, so every completion event for
//! the client arrives through [`Dispatcher::on_event`].
//!
//! Each entry is consumed at most once: the entry is removed from the table
//! before it is delivered, and an event whose handle is not in the table is
//! dropped.
//!
//! # Example
//!
//! ```
//! # use std::sync::Arc;
//! # use slotwire::{CustomRequest, Device, Handle, Result};
//! # struct Nic;
//! # impl Device for Nic {
//! #     fn issue_get(&self, _: &str) -> Result<Handle> { Ok(Handle(5)) }
//! #     fn issue_post(&self, _: &str, _: &str) -> Result<Handle> { Ok(Handle(5)) }
//! #     fn issue_post_data(&self, _: &str, _: Option<&str>, _: &[u8]) -> Result<Handle> { Ok(Handle(5)) }
//! #     fn issue_post_form(&self, _: &str, _: &[(String, String)]) -> Result<Handle> { Ok(Handle(5)) }
//! #     fn issue_custom_request(&self, _: &str, _: &CustomRequest) -> Result<Handle> { Ok(Handle(5)) }
//! #     fn abort(&self, _: Handle) -> bool { true }
//! #     fn upload_progress(&self, _: Handle) -> f64 { 0.0 }
//! #     fn download_progress(&self, _: Handle) -> f64 { 0.0 }
//! #     fn clear_cookie_cache(&self) {}
//! #     fn clear_url_cookie_cache(&self, _: &str) {}
//! #     fn access_denied(&self) -> bool { false }
//! # }
//! use slotwire::dispatcher::Dispatcher;
//! use slotwire::unit::CompletionEvent;
//!
//! let dispatcher = Dispatcher::new();
//! let request = dispatcher.add_request(Arc::new(Nic), Handle(5), None);
//!
//! assert!(dispatcher.on_event(CompletionEvent::new(5, 200).with_text("ok")));
//! assert!(request.ready());
//! assert_eq!(request.result().unwrap().text(), "ok");
//!
//! // duplicate event: handle already consumed
//! assert!(!dispatcher.on_event(CompletionEvent::new(5, 200)));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::device::{Device, Handle};
use crate::request::{Callback, Request};
use crate::response::Response;
use crate::unit::{CompletionEvent, DispatchFn};

/// Wrapper run exactly once when a request's completion event arrives.
type Deliver = Box<dyn FnOnce(CompletionEvent) + Send>;

/// Table of pending requests for one client.
///
/// Cloning shares the table.
#[derive(Clone, Default)]
pub struct Dispatcher {
    pending: Arc<Mutex<HashMap<Handle, Deliver>>>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly issued request and return its view.
    ///
    /// The returned request is `InProgress`. When the completion event for
    /// `handle` arrives, the event is mapped to a [`Response`], the request
    /// moves to `Completed` with the response cached, and `callback` (if
    /// any) is invoked with it.
    ///
    /// If `handle` is already pending the older registration is replaced and
    /// will never complete.
    pub fn add_request(
        &self,
        device: Arc<dyn Device>,
        handle: Handle,
        callback: Option<Callback>,
    ) -> Request {
        let request = Request::new(handle, device, self.clone());
        let lifecycle = request.lifecycle();

        let deliver: Deliver = Box::new(move |event: CompletionEvent| {
            let response = Response::from(event);
            if let Some(response) = lifecycle.complete(response) {
                if let Some(callback) = callback {
                    callback(&response);
                }
            }
        });

        if self.lock().insert(handle, deliver).is_some() {
            tracing::warn!(
                "Handle {} registered while still pending, replacing older request",
                handle
            );
        }
        tracing::debug!("Request {} pending", handle);

        request
    }

    /// Route one completion event.
    ///
    /// Returns `true` if a pending request consumed it. Events for unknown
    /// handles (never issued here, already delivered, or aborted) are
    /// dropped and return `false`.
    pub fn on_event(&self, event: CompletionEvent) -> bool {
        tracing::trace!(
            "Completion event for {} (code {})",
            event.handle,
            event.response_code
        );

        // Lock is released before delivery so callbacks can issue requests.
        let deliver = self.lock().remove(&event.handle);

        match deliver {
            Some(deliver) => {
                tracing::debug!("Delivering completion for request {}", event.handle);
                deliver(event);
                true
            }
            None => {
                tracing::debug!("Dropping event for unknown handle {}", event.handle);
                false
            }
        }
    }

    /// Function to bind on a channel; forwards every event to [`on_event`](Self::on_event).
    pub fn dispatch_fn(&self) -> DispatchFn {
        let dispatcher = self.clone();
        Arc::new(move |event| {
            dispatcher.on_event(event);
        })
    }

    /// Whether `handle` is waiting for its completion event.
    pub fn is_pending(&self, handle: Handle) -> bool {
        self.lock().contains_key(&handle)
    }

    /// Number of requests waiting for completion.
    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    /// Remove `handle` without delivering it.
    pub(crate) fn forget(&self, handle: Handle) -> bool {
        self.lock().remove(&handle).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Handle, Deliver>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending", &self.pending_count())
            .finish()
    }
}
