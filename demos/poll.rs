//! Polling example - issue requests, tick the host, poll for results.
//!
//! A toy device queues every request and completes one per host tick by
//! firing a completion event on the channel the client bound.
//!
//! ```text
//! cargo run --example poll
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use slotwire::unit::{CompletionEvent, SlotTable};
use slotwire::{Client, CustomRequest, Device, Handle, Result};

/// Device that answers every URL with its own length.
struct LoopbackNic {
    next: AtomicU32,
    queue: Mutex<VecDeque<(Handle, String)>>,
}

impl LoopbackNic {
    fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    fn enqueue(&self, url: &str) -> Result<Handle> {
        let handle = Handle(self.next.fetch_add(1, Ordering::SeqCst));
        self.queue
            .lock()
            .unwrap()
            .push_back((handle, url.to_string()));
        Ok(handle)
    }

    /// Finish the oldest queued request, if any.
    fn tick(&self) -> Option<CompletionEvent> {
        let (handle, url) = self.queue.lock().unwrap().pop_front()?;
        let code = if url.ends_with("/missing") { 404 } else { 200 };
        Some(CompletionEvent::new(handle, code).with_text(format!("{} bytes", url.len())))
    }
}

impl Device for LoopbackNic {
    fn issue_get(&self, url: &str) -> Result<Handle> {
        self.enqueue(url)
    }

    fn issue_post(&self, url: &str, _data: &str) -> Result<Handle> {
        self.enqueue(url)
    }

    fn issue_post_data(&self, url: &str, _ct: Option<&str>, _data: &[u8]) -> Result<Handle> {
        self.enqueue(url)
    }

    fn issue_post_form(&self, url: &str, _form: &[(String, String)]) -> Result<Handle> {
        self.enqueue(url)
    }

    fn issue_custom_request(&self, url: &str, _request: &CustomRequest) -> Result<Handle> {
        self.enqueue(url)
    }

    fn abort(&self, handle: Handle) -> bool {
        let mut queue = self.queue.lock().unwrap();
        let before = queue.len();
        queue.retain(|(h, _)| *h != handle);
        queue.len() != before
    }

    fn upload_progress(&self, _handle: Handle) -> f64 {
        0.0
    }

    fn download_progress(&self, _handle: Handle) -> f64 {
        0.0
    }

    fn clear_cookie_cache(&self) {}

    fn clear_url_cookie_cache(&self, _url: &str) {}

    fn access_denied(&self) -> bool {
        false
    }
}

fn main() -> Result<()> {
    let nic = Arc::new(LoopbackNic::new());
    let cpu = Arc::new(SlotTable::new("cpu0", 4));

    let client = Client::builder()
        .device(nic.clone())
        .unit(cpu.clone())
        .build()?;
    let channel = client.channel().number();

    let requests = vec![
        client.get("http://example.com/").send()?,
        client.get("http://example.com/missing").send()?,
        client.post("http://example.com/submit", "a=1").send()?,
    ];
    let cancelled = client.get("http://example.com/slow").send()?;
    println!("abort accepted by device: {}", cancelled.abort());

    while let Some(event) = nic.tick() {
        cpu.fire(channel, event);
    }

    for request in &requests {
        match request.result() {
            Some(response) => println!(
                "{} -> {} ok={} {}",
                request.handle(),
                response.response_code(),
                response.ok(),
                response.text()
            ),
            None => println!("{} -> {:?}", request.handle(), request.status()),
        }
    }
    println!("{} -> {:?}", cancelled.handle(), cancelled.status());

    Ok(())
}
