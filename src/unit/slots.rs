//! In-process processing unit.
//!
//! [`SlotTable`] is a fixed set of channel slots a host embeds to drive
//! clients: the host calls [`SlotTable::fire`] from its event tick and the
//! bound dispatch function runs synchronously.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use slotwire::unit::{CompletionEvent, ProcessingUnit, SlotTable};
//!
//! let unit = SlotTable::new("cpu0", 4);
//! let seen = Arc::new(AtomicU32::new(0));
//! let seen_clone = seen.clone();
//!
//! unit.bind(2, "demo", Arc::new(move |event: CompletionEvent| {
//!     seen_clone.store(event.handle.get(), Ordering::SeqCst);
//! }));
//!
//! assert!(unit.fire(2, CompletionEvent::new(7, 200)));
//! assert_eq!(seen.load(Ordering::SeqCst), 7);
//! assert!(!unit.fire(1, CompletionEvent::new(8, 200)));
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{CompletionEvent, DispatchFn, ProcessingUnit};
use crate::codec::{JsonCodec, MsgPackCodec};
use crate::error::Result;

struct Slot {
    owner: String,
    dispatch: DispatchFn,
}

/// Fixed-size table of channel slots.
pub struct SlotTable {
    name: String,
    slots: Mutex<Vec<Option<Slot>>>,
}

impl SlotTable {
    /// Create a unit with `channel_count` empty slots.
    pub fn new(name: impl Into<String>, channel_count: u16) -> Self {
        let mut slots = Vec::with_capacity(channel_count as usize);
        slots.resize_with(channel_count as usize, || None);
        Self {
            name: name.into(),
            slots: Mutex::new(slots),
        }
    }

    /// Deliver `event` to the function bound on `channel`.
    ///
    /// Returns `false` when the channel is out of range or unbound. The
    /// slot lock is released before the dispatch function runs, so it may
    /// bind channels or fire events itself.
    pub fn fire(&self, channel: u16, event: CompletionEvent) -> bool {
        let dispatch = {
            let slots = self.lock();
            match index(channel).and_then(|i| slots.get(i)) {
                Some(Some(slot)) => slot.dispatch.clone(),
                _ => {
                    tracing::trace!(
                        "No function bound on channel {} of unit {}, dropping event for {}",
                        channel,
                        self.name,
                        event.handle
                    );
                    return false;
                }
            }
        };

        dispatch(event);
        true
    }

    /// Decode a MsgPack-encoded event and fire it.
    ///
    /// Host-side helper for hosts that receive events as bytes. Clients never
    /// see the encoding: the bound dispatch function gets the decoded
    /// [`CompletionEvent`] exactly as with [`fire`](Self::fire).
    pub fn fire_msgpack(&self, channel: u16, bytes: &[u8]) -> Result<bool> {
        let event: CompletionEvent = MsgPackCodec::decode(bytes)?;
        Ok(self.fire(channel, event))
    }

    /// Decode a JSON-encoded event and fire it.
    ///
    /// Host-side helper, like [`fire_msgpack`](Self::fire_msgpack).
    pub fn fire_json(&self, channel: u16, bytes: &[u8]) -> Result<bool> {
        let event: CompletionEvent = JsonCodec::decode(bytes)?;
        Ok(self.fire(channel, event))
    }

    /// Channels that currently have a function bound, ascending.
    pub fn bound_channels(&self) -> Vec<u16> {
        self.lock()
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| (i + 1) as u16)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Option<Slot>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProcessingUnit for SlotTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_count(&self) -> u16 {
        self.lock().len() as u16
    }

    fn owner(&self, channel: u16) -> Option<String> {
        let slots = self.lock();
        index(channel)
            .and_then(|i| slots.get(i))
            .and_then(|slot| slot.as_ref())
            .map(|slot| slot.owner.clone())
    }

    fn bind(&self, channel: u16, owner: &str, dispatch: DispatchFn) {
        let mut slots = self.lock();
        match index(channel).and_then(|i| slots.get_mut(i)) {
            Some(slot) => {
                *slot = Some(Slot {
                    owner: owner.to_string(),
                    dispatch,
                });
            }
            None => {
                tracing::warn!(
                    "Ignoring bind of channel {} on unit {} ({} channels)",
                    channel,
                    self.name,
                    slots.len()
                );
            }
        }
    }
}

/// Slot index for a 1-based channel number.
#[inline]
fn index(channel: u16) -> Option<usize> {
    (channel as usize).checked_sub(1)
}
