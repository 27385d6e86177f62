//! Platform error types
//!
//! This module defines error types for flash operations. The flash device is
//! the only peripheral this crate touches, so `FlashError` doubles as the
//! platform error.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, FlashError>;

/// Flash-specific errors
///
/// Platform implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashError {
    /// Erase operation failed
    EraseFailed,
    /// Write operation failed
    WriteFailed,
    /// Read operation failed
    ReadFailed,
    /// Invalid address (out of bounds, protected, or misaligned)
    InvalidAddress,
    /// Verify failed (data mismatch after write)
    VerifyFailed,
    /// Flash is busy
    Busy,
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashError::EraseFailed => write!(f, "flash erase failed"),
            FlashError::WriteFailed => write!(f, "flash write failed"),
            FlashError::ReadFailed => write!(f, "flash read failed"),
            FlashError::InvalidAddress => write!(f, "invalid flash address"),
            FlashError::VerifyFailed => write!(f, "flash verify failed"),
            FlashError::Busy => write!(f, "flash is busy"),
        }
    }
}
