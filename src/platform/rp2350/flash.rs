//! RP2350 flash implementation
//!
//! Flash storage support for RP2350 using ROM functions.
//!
//! # Flash Layout
//!
//! ```text
//! [Firmware]         0x000000 - 0x040000 (256 KB) - PROTECTED
//! [Settings sector]  0x040000 - 0x041000 (4 KB)
//! [Unused]           0x041000 - 0x400000
//! ```
//!
//! # Safety
//!
//! Flash operations use unsafe ROM functions and must:
//! - Disable interrupts during operations (XIP inaccessible)
//! - Not access XIP memory during erase/write
//! - Validate addresses are not in the firmware region

use crate::platform::{error::FlashError, traits::FlashInterface, Result};
use rp235x_hal::rom_data;

/// Minimum firmware size (protect first 256 KB)
const FIRMWARE_SIZE: u32 = 0x40000;

/// Flash block size (minimum erase unit)
const BLOCK_SIZE: u32 = 4096;

/// Flash sector erase command (0x20 for 4KB sector)
const SECTOR_ERASE_CMD: u8 = 0x20;

/// Total flash capacity for Pico 2 W
const FLASH_CAPACITY: u32 = 4 * 1024 * 1024;

/// XIP-mapped base address of flash
const XIP_BASE: usize = 0x10000000;

/// RP2350 flash implementation
///
/// Provides flash read/write/erase using RP2350 ROM functions. Erase and
/// program are blocking (100ms+) and run with interrupts masked, since XIP is
/// inaccessible while they execute. The firmware region is protected from
/// writes.
pub struct Rp2350Flash;

impl Rp2350Flash {
    /// Create a new RP2350 flash instance
    pub fn new() -> Self {
        Self
    }

    /// Check if address is in writable region (not firmware)
    fn is_writable(&self, address: u32) -> bool {
        (FIRMWARE_SIZE..FLASH_CAPACITY).contains(&address)
    }

    /// Check if address is block-aligned
    fn is_block_aligned(&self, address: u32) -> bool {
        address.is_multiple_of(BLOCK_SIZE)
    }

    /// Execute a flash operation with XIP disabled
    ///
    /// # Safety
    ///
    /// Interrupts are disabled for the duration; the closure must not touch
    /// XIP-mapped memory.
    unsafe fn with_xip_disabled<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        // SAFETY: interrupts must stay masked while XIP is down, otherwise an
        // interrupt handler fetching code from flash faults
        cortex_m::interrupt::free(|_cs| {
            // SAFETY: prepare flash for serial operations before any
            // erase/program call
            rom_data::connect_internal_flash();
            rom_data::flash_exit_xip();

            let result = f();

            // SAFETY: flush cache so the new contents are visible, then
            // restore XIP mode
            rom_data::flash_flush_cache();
            rom_data::flash_enter_cmd_xip();

            result
        })
    }
}

impl Default for Rp2350Flash {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashInterface for Rp2350Flash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        if address >= FLASH_CAPACITY {
            return Err(FlashError::InvalidAddress);
        }

        if address as usize + buf.len() > FLASH_CAPACITY as usize {
            return Err(FlashError::InvalidAddress);
        }

        // Reading goes through the XIP mapping and needs no mode switch
        let flash_ptr = (XIP_BASE + address as usize) as *const u8;

        // SAFETY: the address range was validated above
        unsafe {
            core::ptr::copy_nonoverlapping(flash_ptr, buf.as_mut_ptr(), buf.len());
        }

        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if !self.is_writable(address) {
            return Err(FlashError::InvalidAddress);
        }

        if address as usize + data.len() > FLASH_CAPACITY as usize {
            return Err(FlashError::InvalidAddress);
        }

        // SAFETY: program must run in direct mode with XIP disabled; the ROM
        // function takes the offset from flash start, not an XIP address
        unsafe {
            self.with_xip_disabled(|| {
                rom_data::flash_range_program(address, data.as_ptr(), data.len());
            });
        }

        Ok(())
    }

    fn erase(&mut self, address: u32, size: u32) -> Result<()> {
        if !self.is_writable(address) {
            return Err(FlashError::InvalidAddress);
        }

        if !self.is_block_aligned(address) {
            return Err(FlashError::InvalidAddress);
        }

        if !size.is_multiple_of(BLOCK_SIZE) {
            return Err(FlashError::InvalidAddress);
        }

        if address + size > FLASH_CAPACITY {
            return Err(FlashError::InvalidAddress);
        }

        // SAFETY: sector erase in direct mode with XIP disabled
        unsafe {
            self.with_xip_disabled(|| {
                rom_data::flash_range_erase(address, size as usize, BLOCK_SIZE, SECTOR_ERASE_CMD);
            });
        }

        Ok(())
    }

    fn block_size(&self) -> u32 {
        BLOCK_SIZE
    }

    fn capacity(&self) -> u32 {
        FLASH_CAPACITY
    }
}
