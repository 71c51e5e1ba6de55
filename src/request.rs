//! Per-request view returned by every client verb.
//!
//! A [`Request`] is handed back synchronously, before the device has done
//! any work. Its accessors are evaluated on each call:
//!
//! - `upload_progress` / `download_progress` query the device live
//! - `ready` / `status` / `result` read the cached lifecycle state
//! - `wait` resolves once the request leaves [`Status::InProgress`]
//!
//! The only operation that changes anything is [`Request::abort`]. Nothing
//! else is writable:
//!
//! ```compile_fail
//! # fn check(request: slotwire::Request) {
//! request.ready = true;
//! # }
//! ```
//!
//! # Lifecycle
//!
//! ```text
//! InProgress ──(completion event)──► Completed(Response)
//!      │
//!      └──────────(abort)──────────► Aborted
//! ```
//!
//! Both terminal states are final.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::device::{Device, Handle};
use crate::dispatcher::Dispatcher;
use crate::response::Response;

/// User callback invoked once with the mapped response.
pub type Callback = Box<dyn FnOnce(&Response) + Send>;

/// Lifecycle status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Issued, no completion event seen yet.
    InProgress,
    /// Completion event delivered; a response is cached.
    Completed,
    /// Aborted by the caller before completion.
    Aborted,
}

impl Status {
    /// Whether this is a final state.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::InProgress)
    }
}

#[derive(Debug, Clone)]
enum State {
    InProgress,
    Completed(Arc<Response>),
    Aborted,
}

impl State {
    fn status(&self) -> Status {
        match self {
            State::InProgress => Status::InProgress,
            State::Completed(_) => Status::Completed,
            State::Aborted => Status::Aborted,
        }
    }

    fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    fn response(&self) -> Option<Arc<Response>> {
        match self {
            State::Completed(response) => Some(response.clone()),
            _ => None,
        }
    }
}

/// Shared lifecycle cell of one request.
///
/// Transitions only ever leave `InProgress`; a second transition attempt
/// is a no-op.
pub(crate) struct Lifecycle {
    tx: watch::Sender<State>,
}

impl Lifecycle {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(State::InProgress);
        Self { tx }
    }

    /// Cache `response` and move to `Completed`.
    ///
    /// Returns the cached response if this call performed the transition.
    pub(crate) fn complete(&self, response: Response) -> Option<Arc<Response>> {
        let response = Arc::new(response);
        let cached = response.clone();
        let moved = self.tx.send_if_modified(move |state| {
            if state.is_terminal() {
                return false;
            }
            *state = State::Completed(cached);
            true
        });
        moved.then_some(response)
    }

    /// Move to `Aborted`. Returns whether this call performed the transition.
    fn abort(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_terminal() {
                return false;
            }
            *state = State::Aborted;
            true
        })
    }

    fn status(&self) -> Status {
        self.tx.borrow().status()
    }

    fn response(&self) -> Option<Arc<Response>> {
        self.tx.borrow().response()
    }
}

/// Live view of one issued request.
///
/// Cloning yields another view of the same request.
#[derive(Clone)]
pub struct Request {
    handle: Handle,
    device: Arc<dyn Device>,
    dispatcher: Dispatcher,
    lifecycle: Arc<Lifecycle>,
}

impl Request {
    pub(crate) fn new(handle: Handle, device: Arc<dyn Device>, dispatcher: Dispatcher) -> Self {
        Self {
            handle,
            device,
            dispatcher,
            lifecycle: Arc::new(Lifecycle::new()),
        }
    }

    pub(crate) fn lifecycle(&self) -> Arc<Lifecycle> {
        self.lifecycle.clone()
    }

    /// Device handle this request was issued under.
    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Current lifecycle status.
    pub fn status(&self) -> Status {
        self.lifecycle.status()
    }

    /// `true` once the request has completed or been aborted.
    pub fn ready(&self) -> bool {
        self.status().is_terminal()
    }

    /// The cached response, present only after completion.
    pub fn result(&self) -> Option<Arc<Response>> {
        self.lifecycle.response()
    }

    /// Upload progress, queried from the device on every call.
    ///
    /// Once `ready()` is true the device may no longer know the handle and
    /// the returned value is whatever the device reports for it.
    pub fn upload_progress(&self) -> f64 {
        self.device.upload_progress(self.handle)
    }

    /// Download progress, queried from the device on every call.
    pub fn download_progress(&self) -> f64 {
        self.device.download_progress(self.handle)
    }

    /// Abort the request.
    ///
    /// An in-progress request moves to [`Status::Aborted`] and its handle
    /// leaves the dispatcher, regardless of what the device answers. A
    /// completion event arriving afterwards is dropped. On a request that is
    /// already terminal the status is unchanged.
    ///
    /// The abort is forwarded to the device on every call; the return value
    /// is the device's success indicator.
    pub fn abort(&self) -> bool {
        if self.lifecycle.abort() {
            self.dispatcher.forget(self.handle);
            tracing::debug!("Aborted request {}", self.handle);
        }
        self.device.abort(self.handle)
    }

    /// Wait until the request leaves `InProgress`.
    ///
    /// Resolves to the response on completion and to `None` on abort.
    pub async fn wait(&self) -> Option<Arc<Response>> {
        let mut rx = self.lifecycle.tx.subscribe();
        let finished = rx.wait_for(State::is_terminal).await;
        finished.ok().and_then(|state| state.response())
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("handle", &self.handle)
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDevice;
    use crate::unit::CompletionEvent;

    fn request(device: &Arc<MockDevice>) -> (Dispatcher, Request) {
        let dispatcher = Dispatcher::new();
        let request = dispatcher.add_request(device.clone(), Handle(5), None);
        (dispatcher, request)
    }

    #[test]
    fn test_new_request_in_progress() {
        let device = Arc::new(MockDevice::new());
        let (_, request) = request(&device);

        assert_eq!(request.handle(), Handle(5));
        assert_eq!(request.status(), Status::InProgress);
        assert!(!request.ready());
        assert!(request.result().is_none());
    }

    #[test]
    fn test_lifecycle_complete_once() {
        let lifecycle = Lifecycle::new();

        let first = lifecycle.complete(Response::from_event(&CompletionEvent::new(1, 200)));
        let second = lifecycle.complete(Response::from_event(&CompletionEvent::new(1, 500)));

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(lifecycle.response().unwrap().response_code(), 200);
    }

    #[test]
    fn test_lifecycle_abort_after_complete_is_noop() {
        let lifecycle = Lifecycle::new();
        lifecycle.complete(Response::from_event(&CompletionEvent::new(1, 200)));

        assert!(!lifecycle.abort());
        assert_eq!(lifecycle.status(), Status::Completed);
    }

    #[test]
    fn test_abort_returns_device_result_and_marks_aborted() {
        let device = Arc::new(MockDevice::new());
        device.set_abort_result(false);
        let (dispatcher, request) = request(&device);

        assert!(!request.abort());
        assert_eq!(request.status(), Status::Aborted);
        assert!(request.ready());
        assert!(request.result().is_none());
        assert!(!dispatcher.is_pending(Handle(5)));
        assert_eq!(device.aborted(), vec![Handle(5)]);
    }

    #[test]
    fn test_repeated_abort_reaches_device_each_time() {
        let device = Arc::new(MockDevice::new());
        let (_, request) = request(&device);

        assert!(request.abort());
        assert!(request.abort());

        assert_eq!(request.status(), Status::Aborted);
        assert_eq!(device.aborted(), vec![Handle(5), Handle(5)]);
    }

    #[test]
    fn test_progress_is_queried_live() {
        let device = Arc::new(MockDevice::new());
        let (_, request) = request(&device);

        device.set_progress(Handle(5), 10.0, 0.0);
        assert_eq!(request.upload_progress(), 10.0);
        assert_eq!(request.download_progress(), 0.0);

        device.set_progress(Handle(5), 100.0, 42.0);
        assert_eq!(request.upload_progress(), 100.0);
        assert_eq!(request.download_progress(), 42.0);
    }

    #[test]
    fn test_progress_after_terminal_forwards_device_value() {
        let device = Arc::new(MockDevice::new());
        let (dispatcher, request) = request(&device);
        device.set_progress(Handle(5), 3.0, 7.0);

        dispatcher.on_event(CompletionEvent::new(5, 200));
        assert!(request.ready());

        // nothing is cached here; whatever the device says is returned
        assert_eq!(request.download_progress(), 7.0);
        device.set_progress(Handle(5), 0.0, 0.0);
        assert_eq!(request.download_progress(), 0.0);
    }

    #[test]
    fn test_clones_share_state() {
        let device = Arc::new(MockDevice::new());
        let (_, request) = request(&device);
        let view = request.clone();

        request.abort();
        assert_eq!(view.status(), Status::Aborted);
    }

    #[test]
    fn test_debug_shows_handle_and_status() {
        let device = Arc::new(MockDevice::new());
        let (_, request) = request(&device);

        let debug = format!("{:?}", request);
        assert!(debug.contains("Handle(5)"));
        assert!(debug.contains("InProgress"));
    }

    #[tokio::test]
    async fn test_wait_resolves_on_completion() {
        let device = Arc::new(MockDevice::new());
        let (dispatcher, request) = request(&device);

        let waiter = {
            let request = request.clone();
            tokio::spawn(async move { request.wait().await })
        };

        tokio::task::yield_now().await;
        dispatcher.on_event(CompletionEvent::new(5, 200).with_text("done"));

        let response = waiter.await.unwrap().expect("completed");
        assert_eq!(response.text(), "done");
    }

    #[tokio::test]
    async fn test_wait_resolves_none_on_abort() {
        let device = Arc::new(MockDevice::new());
        let (_, request) = request(&device);

        request.abort();
        assert!(request.wait().await.is_none());
    }

    #[tokio::test]
    async fn test_wait_after_completion_returns_immediately() {
        let device = Arc::new(MockDevice::new());
        let (dispatcher, request) = request(&device);

        dispatcher.on_event(CompletionEvent::new(5, 404));
        let response = request.wait().await.unwrap();
        assert_eq!(response.response_code(), 404);
    }
}
