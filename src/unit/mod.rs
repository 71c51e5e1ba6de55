//! Processing unit capability - numbered notification channels.
//!
//! A processing unit exposes channel slots `1..=channel_count`. Each slot
//! holds at most one dispatch function together with the identity of the
//! module that bound it. The host invokes the bound function with a
//! [`CompletionEvent`] whenever a request issued through that channel
//! finishes.
//!
//! Provides:
//! - [`ProcessingUnit`] - the capability trait
//! - [`CompletionEvent`] - raw completion notification
//! - [`SlotTable`] - an in-process unit a host can embed

mod event;
mod slots;

use std::sync::Arc;

pub use event::CompletionEvent;
pub use slots::SlotTable;

/// Function bound to a channel; receives every completion event for it.
pub type DispatchFn = Arc<dyn Fn(CompletionEvent) + Send + Sync>;

/// Capability implemented by the host's processing unit.
pub trait ProcessingUnit: Send + Sync {
    /// Name used when logging about this unit.
    fn name(&self) -> &str;

    /// Number of channel slots. Valid channels are `1..=channel_count()`.
    fn channel_count(&self) -> u16;

    /// Owner of the function bound to `channel`, or `None` if the slot is free.
    fn owner(&self, channel: u16) -> Option<String>;

    /// Install `dispatch` on `channel`, replacing any previous binding.
    ///
    /// Callers validate the channel number before binding.
    fn bind(&self, channel: u16, owner: &str, dispatch: DispatchFn);
}
