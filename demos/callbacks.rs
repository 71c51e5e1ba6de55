//! Callback example - completion delivered from a host thread.
//!
//! The host runs its event tick on a separate thread; the client observes
//! completion both through `on_complete` callbacks and by awaiting
//! `Request::wait`.
//!
//! ```text
//! cargo run --example callbacks
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use slotwire::unit::{CompletionEvent, SlotTable};
use slotwire::{Client, CustomRequest, Device, Handle, Result};

/// Device that only hands out handles; the host thread completes them.
struct CountingNic {
    next: AtomicU32,
}

impl CountingNic {
    fn issue(&self) -> Result<Handle> {
        Ok(Handle(self.next.fetch_add(1, Ordering::SeqCst)))
    }
}

impl Device for CountingNic {
    fn issue_get(&self, _url: &str) -> Result<Handle> {
        self.issue()
    }

    fn issue_post(&self, _url: &str, _data: &str) -> Result<Handle> {
        self.issue()
    }

    fn issue_post_data(&self, _url: &str, _ct: Option<&str>, _data: &[u8]) -> Result<Handle> {
        self.issue()
    }

    fn issue_post_form(&self, _url: &str, _form: &[(String, String)]) -> Result<Handle> {
        self.issue()
    }

    fn issue_custom_request(&self, _url: &str, _request: &CustomRequest) -> Result<Handle> {
        self.issue()
    }

    fn abort(&self, _handle: Handle) -> bool {
        false
    }

    fn upload_progress(&self, _handle: Handle) -> f64 {
        1.0
    }

    fn download_progress(&self, _handle: Handle) -> f64 {
        0.5
    }

    fn clear_cookie_cache(&self) {}

    fn clear_url_cookie_cache(&self, _url: &str) {}

    fn access_denied(&self) -> bool {
        false
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let nic = Arc::new(CountingNic {
        next: AtomicU32::new(100),
    });
    let cpu = Arc::new(SlotTable::new("cpu0", 2));

    let client = Client::builder()
        .device(nic)
        .unit(cpu.clone())
        .channel(2)
        .owner("callbacks-demo")
        .build()?;

    let form = client
        .post_form("http://example.com/login", [("user", "ada"), ("pass", "x")])
        .on_complete(|response| println!("login finished: {}", response.response_code()))
        .send()?;
    let status = client
        .request(
            "http://example.com/status",
            CustomRequest::new("HEAD").header("Accept", "*/*"),
        )
        .send()?;

    println!(
        "status request progress: up={} down={}",
        status.upload_progress(),
        status.download_progress()
    );

    let handles = [form.handle(), status.handle()];
    std::thread::spawn(move || {
        for handle in handles {
            std::thread::sleep(Duration::from_millis(50));
            cpu.fire(2, CompletionEvent::new(handle, 200).with_text("ok"));
        }
    });

    if let Some(response) = status.wait().await {
        println!("status: {} {}", response.response_code(), response.text());
    }
    form.wait().await;

    Ok(())
}
