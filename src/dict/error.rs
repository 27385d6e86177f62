//! Dictionary error types

use crate::platform::FlashError;

/// Result type for dictionary operations
pub type Result<T> = core::result::Result<T, DictError>;

/// Errors from dictionary operations
///
/// A missing key is not an error: reads report it as `None` and the typed
/// accessors substitute the caller's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictError {
    /// Key is longer than 254 bytes or contains a NUL byte
    InvalidKey,
    /// Value is longer than the 16-bit length field can express
    ValueTooLarge,
    /// Entry would not fit in the sector's remaining free space
    CapacityExceeded,
    /// Entry stream ran past the sector boundary without a free-space
    /// sentinel
    Corrupted,
    /// Flash operation failed
    Flash(FlashError),
}

impl core::fmt::Display for DictError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DictError::InvalidKey => write!(f, "invalid key"),
            DictError::ValueTooLarge => write!(f, "value too large"),
            DictError::CapacityExceeded => write!(f, "sector capacity exceeded"),
            DictError::Corrupted => write!(f, "sector content corrupted"),
            DictError::Flash(e) => write!(f, "flash error: {}", e),
        }
    }
}

impl From<FlashError> for DictError {
    fn from(error: FlashError) -> Self {
        DictError::Flash(error)
    }
}
