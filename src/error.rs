//! Error types for slotwire.

use thiserror::Error;

/// Construction-time configuration failures.
///
/// These are fatal: a client that fails to build holds no channel binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Every channel on the unit already has a dispatch function bound.
    #[error("no free channel on unit {unit}")]
    NoFreeChannel {
        /// Name of the unit that was searched.
        unit: String,
    },

    /// Explicit channel outside `1..=count`.
    #[error("channel {channel} out of range 1..={count}")]
    ChannelOutOfRange {
        /// Requested channel.
        channel: u16,
        /// Channel count of the unit.
        count: u16,
    },

    /// No device given and the host has none to offer.
    #[error("no network device found")]
    DeviceNotFound,

    /// No processing unit given and the host has none to offer.
    #[error("no processing unit found")]
    UnitNotFound,
}

/// Main error type for all slotwire operations.
#[derive(Debug, Error)]
pub enum SlotwireError {
    /// Client or channel configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The device refused to issue a request.
    #[error("device error: {0}")]
    Device(String),

    /// JSON decoding of a completion event failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}

impl SlotwireError {
    /// Build a device error from any message.
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Returns the configuration error, if this is one.
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias using SlotwireError.
pub type Result<T> = std::result::Result<T, SlotwireError>;
