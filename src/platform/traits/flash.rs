//! Flash interface trait
//!
//! This module defines the flash storage interface that platform
//! implementations must provide. The settings dictionary consumes exactly
//! this boundary: sector-granular erase plus byte-granular program and read.

use crate::platform::Result;

/// Flash interface trait
///
/// Platform implementations must provide this interface for flash
/// read/write/erase operations.
///
/// # Flash Characteristics
///
/// - Flash is organized in blocks (4 KB on RP2350)
/// - Erase operations set all bytes to 0xFF
/// - Write operations can only change bits from 1→0 (erase first to reset)
/// - Erase and program are blocking and can take 100ms+
///
/// # Safety Invariants
///
/// - Only one owner per flash instance (no concurrent access)
/// - Must not erase/write the firmware region (implementations validate
///   addresses)
/// - Erase and program are atomic per call only, never across the pair
///
/// # Memory Layout (RP2350)
///
/// ```text
/// [Firmware]         0x000000 - 0x040000 (256 KB) - DO NOT WRITE
/// [Settings sector]  0x040000 - 0x041000 (4 KB)
/// [Unused]           0x041000 - end of flash
/// ```
pub trait FlashInterface {
    /// Read `buf.len()` bytes from flash starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns `FlashError::InvalidAddress` if the range is out of bounds.
    /// Returns `FlashError::ReadFailed` if the read operation fails.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Write `data` to flash starting at `address`.
    ///
    /// The target range must have been erased first; writing can only change
    /// bits from 1→0.
    ///
    /// # Errors
    ///
    /// Returns `FlashError::InvalidAddress` if the range is protected or out
    /// of bounds. Returns `FlashError::WriteFailed` if the operation fails.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erase `size` bytes of flash starting at `address`, setting them
    /// to 0xFF.
    ///
    /// `address` must be block-aligned and `size` a multiple of the block
    /// size.
    ///
    /// # Errors
    ///
    /// Returns `FlashError::InvalidAddress` on a protected, misaligned, or
    /// out-of-bounds range. Returns `FlashError::EraseFailed` if the
    /// operation fails.
    fn erase(&mut self, address: u32, size: u32) -> Result<()>;

    /// Minimum erasable unit size (4096 bytes on RP2350).
    fn block_size(&self) -> u32;

    /// Total flash capacity in bytes.
    fn capacity(&self) -> u32;
}
