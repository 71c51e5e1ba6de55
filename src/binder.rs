//! Channel binder - claims one notification channel on a processing unit.
//!
//! [`register`] validates or selects a channel and installs the dispatch
//! function on it. Overwriting a channel bound by another module is allowed
//! but logged as a warning.

use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigError, Result};
use crate::unit::{DispatchFn, ProcessingUnit};

/// A channel this process has bound a dispatch function to.
///
/// Bindings are never released.
#[derive(Clone)]
pub struct Channel {
    unit: Arc<dyn ProcessingUnit>,
    number: u16,
    owner: String,
}

impl Channel {
    /// 1-based channel number.
    #[inline]
    pub fn number(&self) -> u16 {
        self.number
    }

    /// Owner identity recorded on the slot.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Unit the channel belongs to.
    pub fn unit(&self) -> &Arc<dyn ProcessingUnit> {
        &self.unit
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("unit", &self.unit.name())
            .field("number", &self.number)
            .field("owner", &self.owner)
            .finish()
    }
}

/// Bind `dispatch` to a channel of `unit`.
///
/// With `channel` omitted the lowest-numbered free channel is taken,
/// failing with [`ConfigError::NoFreeChannel`] if every slot is bound. An
/// explicit channel must lie in `1..=unit.channel_count()`, otherwise
/// [`ConfigError::ChannelOutOfRange`] is returned. Nothing is bound on
/// error.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use slotwire::binder::register;
/// use slotwire::unit::{ProcessingUnit, SlotTable};
///
/// let unit: Arc<dyn ProcessingUnit> = Arc::new(SlotTable::new("cpu0", 4));
///
/// let first = register(&unit, None, "a", Arc::new(|_| {})).unwrap();
/// let second = register(&unit, None, "b", Arc::new(|_| {})).unwrap();
/// assert_eq!(first.number(), 1);
/// assert_eq!(second.number(), 2);
///
/// assert!(register(&unit, Some(5), "c", Arc::new(|_| {})).is_err());
/// ```
pub fn register(
    unit: &Arc<dyn ProcessingUnit>,
    channel: Option<u16>,
    owner: &str,
    dispatch: DispatchFn,
) -> Result<Channel> {
    let count = unit.channel_count();

    let number = match channel {
        Some(channel) => {
            if channel == 0 || channel > count {
                return Err(ConfigError::ChannelOutOfRange { channel, count }.into());
            }
            channel
        }
        None => (1..=count)
            .find(|&c| unit.owner(c).is_none())
            .ok_or_else(|| ConfigError::NoFreeChannel {
                unit: unit.name().to_string(),
            })?,
    };

    if let Some(previous) = unit.owner(number) {
        if previous != owner {
            tracing::warn!(
                "Channel {} on unit {} owned by {} is being overwritten by {}",
                number,
                unit.name(),
                previous,
                owner
            );
        }
    }

    unit.bind(number, owner, dispatch);
    tracing::debug!("Bound channel {} on unit {} for {}", number, unit.name(), owner);

    Ok(Channel {
        unit: unit.clone(),
        number,
        owner: owner.to_string(),
    })
}
