//! Default device and unit resolution.
//!
//! When a client is built without an explicit device or processing unit,
//! the builder asks a [`Host`] for the first available one of each kind.

use std::sync::{Arc, PoisonError, RwLock};

use crate::device::Device;
use crate::unit::ProcessingUnit;

/// Source of default components.
pub trait Host: Send + Sync {
    /// First available network device, if any.
    fn primary_device(&self) -> Option<Arc<dyn Device>>;

    /// First available processing unit, if any.
    fn primary_unit(&self) -> Option<Arc<dyn ProcessingUnit>>;
}

/// A [`Host`] backed by components registered in order.
///
/// The earliest registered device and unit are the defaults.
#[derive(Default)]
pub struct Inventory {
    devices: RwLock<Vec<Arc<dyn Device>>>,
    units: RwLock<Vec<Arc<dyn ProcessingUnit>>>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a network device.
    pub fn add_device(&self, device: Arc<dyn Device>) {
        self.devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(device);
    }

    /// Register a processing unit.
    pub fn add_unit(&self, unit: Arc<dyn ProcessingUnit>) {
        self.units
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(unit);
    }

    /// Number of registered devices.
    pub fn device_count(&self) -> usize {
        self.devices.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of registered units.
    pub fn unit_count(&self) -> usize {
        self.units.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Host for Inventory {
    fn primary_device(&self) -> Option<Arc<dyn Device>> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .first()
            .cloned()
    }

    fn primary_unit(&self) -> Option<Arc<dyn ProcessingUnit>> {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .first()
            .cloned()
    }
}
