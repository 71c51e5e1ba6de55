//! Recording device used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use crate::device::{CustomRequest, Device, Handle};
use crate::error::{Result, SlotwireError};

/// One call made against the device.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Get(String),
    Post(String, String),
    PostData(String, Option<String>, Vec<u8>),
    PostForm(String, Vec<(String, String)>),
    Custom(String, CustomRequest),
    ClearCookies,
    ClearUrlCookies(String),
}

/// Device that hands out sequential handles and records every call.
pub(crate) struct MockDevice {
    next_handle: AtomicU32,
    abort_result: AtomicBool,
    access_denied: AtomicBool,
    refuse: AtomicBool,
    calls: Mutex<Vec<Call>>,
    aborted: Mutex<Vec<Handle>>,
    progress: Mutex<HashMap<Handle, (f64, f64)>>,
}

impl MockDevice {
    pub(crate) fn new() -> Self {
        Self::starting_at(1)
    }

    pub(crate) fn starting_at(first: u32) -> Self {
        Self {
            next_handle: AtomicU32::new(first),
            abort_result: AtomicBool::new(true),
            access_denied: AtomicBool::new(false),
            refuse: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            aborted: Mutex::new(Vec::new()),
            progress: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn set_abort_result(&self, result: bool) {
        self.abort_result.store(result, Ordering::SeqCst);
    }

    pub(crate) fn set_access_denied(&self, denied: bool) {
        self.access_denied.store(denied, Ordering::SeqCst);
    }

    pub(crate) fn set_refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub(crate) fn set_progress(&self, handle: Handle, upload: f64, download: f64) {
        self.progress
            .lock()
            .unwrap()
            .insert(handle, (upload, download));
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn aborted(&self) -> Vec<Handle> {
        self.aborted.lock().unwrap().clone()
    }

    fn issue(&self, call: Call) -> Result<Handle> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(SlotwireError::device("too many open requests"));
        }
        self.calls.lock().unwrap().push(call);
        Ok(Handle(self.next_handle.fetch_add(1, Ordering::SeqCst)))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Device for MockDevice {
    fn issue_get(&self, url: &str) -> Result<Handle> {
        self.issue(Call::Get(url.to_string()))
    }

    fn issue_post(&self, url: &str, data: &str) -> Result<Handle> {
        self.issue(Call::Post(url.to_string(), data.to_string()))
    }

    fn issue_post_data(
        &self,
        url: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<Handle> {
        self.issue(Call::PostData(
            url.to_string(),
            content_type.map(str::to_string),
            data.to_vec(),
        ))
    }

    fn issue_post_form(&self, url: &str, form: &[(String, String)]) -> Result<Handle> {
        self.issue(Call::PostForm(url.to_string(), form.to_vec()))
    }

    fn issue_custom_request(&self, url: &str, request: &CustomRequest) -> Result<Handle> {
        self.issue(Call::Custom(url.to_string(), request.clone()))
    }

    fn abort(&self, handle: Handle) -> bool {
        self.aborted.lock().unwrap().push(handle);
        self.abort_result.load(Ordering::SeqCst)
    }

    fn upload_progress(&self, handle: Handle) -> f64 {
        self.progress
            .lock()
            .unwrap()
            .get(&handle)
            .map_or(0.0, |p| p.0)
    }

    fn download_progress(&self, handle: Handle) -> f64 {
        self.progress
            .lock()
            .unwrap()
            .get(&handle)
            .map_or(0.0, |p| p.1)
    }

    fn clear_cookie_cache(&self) {
        self.record(Call::ClearCookies);
    }

    fn clear_url_cookie_cache(&self, url: &str) {
        self.record(Call::ClearUrlCookies(url.to_string()));
    }

    fn access_denied(&self) -> bool {
        self.access_denied.load(Ordering::SeqCst)
    }
}
