//! Mock flash implementation for testing
//!
//! Provides in-memory flash simulation for unit tests. Mirrors the RP2350
//! flash map so the default settings sector address is testable on the host.

extern crate std;

use crate::platform::{error::FlashError, traits::FlashInterface, Result};
use core::cell::RefCell;
use std::vec::Vec;

/// Flash block size (4 KB)
const BLOCK_SIZE: u32 = 4096;

/// Flash capacity (4 MB, same as Pico 2 W)
const FLASH_CAPACITY: u32 = 4 * 1024 * 1024;

/// Minimum firmware size (protect first 256 KB)
const FIRMWARE_SIZE: u32 = 0x40000;

/// Mock flash implementation
///
/// Simulates flash storage in memory for testing. Supports:
/// - Read/write/erase operations with 1→0 write semantics
/// - Corruption injection for testing error handling
/// - Erase count tracking per block
/// - Power-loss simulation (partial write) for reliability testing
#[derive(Debug)]
pub struct MockFlash {
    /// Flash storage (initialized to 0xFF - erased state)
    storage: RefCell<Vec<u8>>,
    /// Erase count per block
    erase_counts: RefCell<Vec<u32>>,
    /// Simulated power loss flag
    power_loss: RefCell<bool>,
}

impl MockFlash {
    /// Create a new mock flash instance
    pub fn new() -> Self {
        let mut storage = Vec::new();
        storage.resize(FLASH_CAPACITY as usize, 0xFF);
        let mut erase_counts = Vec::new();
        erase_counts.resize((FLASH_CAPACITY / BLOCK_SIZE) as usize, 0);

        Self {
            storage: RefCell::new(storage),
            erase_counts: RefCell::new(erase_counts),
            power_loss: RefCell::new(false),
        }
    }

    /// Get flash contents (for test verification)
    pub fn get_contents(&self, address: u32, len: usize) -> Vec<u8> {
        let storage = self.storage.borrow();
        storage[address as usize..(address as usize + len)].to_vec()
    }

    /// Overwrite bytes at `address` with a corrupt pattern (0xAA), bypassing
    /// the 1→0 write rule, to simulate flash corruption.
    pub fn inject_corruption(&mut self, address: u32, len: usize) {
        let mut storage = self.storage.borrow_mut();
        for i in 0..len {
            storage[address as usize + i] = 0xAA;
        }
    }

    /// Overwrite bytes at `address` with `data`, bypassing the 1→0 write
    /// rule. Used to lay down hand-built sector images in tests.
    pub fn patch(&mut self, address: u32, data: &[u8]) {
        let mut storage = self.storage.borrow_mut();
        storage[address as usize..address as usize + data.len()].copy_from_slice(data);
    }

    /// Number of times the block containing `address` has been erased
    pub fn get_erase_count(&self, address: u32) -> u32 {
        let block_id = (address / BLOCK_SIZE) as usize;
        self.erase_counts.borrow()[block_id]
    }

    /// Make the next write only partially complete, simulating power loss
    /// mid-operation.
    pub fn simulate_power_loss(&mut self) {
        *self.power_loss.borrow_mut() = true;
    }

    fn clear_power_loss(&mut self) {
        *self.power_loss.borrow_mut() = false;
    }

    /// Check if address is in writable region
    fn is_writable(&self, address: u32) -> bool {
        (FIRMWARE_SIZE..FLASH_CAPACITY).contains(&address)
    }

    /// Check if address is block-aligned
    fn is_block_aligned(&self, address: u32) -> bool {
        address.is_multiple_of(BLOCK_SIZE)
    }
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashInterface for MockFlash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        if address >= FLASH_CAPACITY {
            return Err(FlashError::InvalidAddress);
        }

        if address as usize + buf.len() > FLASH_CAPACITY as usize {
            return Err(FlashError::InvalidAddress);
        }

        let storage = self.storage.borrow();
        buf.copy_from_slice(&storage[address as usize..(address as usize + buf.len())]);

        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if !self.is_writable(address) {
            return Err(FlashError::InvalidAddress);
        }

        if address as usize + data.len() > FLASH_CAPACITY as usize {
            return Err(FlashError::InvalidAddress);
        }

        // Simulate power loss by writing only half the data
        let write_len = if *self.power_loss.borrow() {
            self.clear_power_loss();
            data.len() / 2
        } else {
            data.len()
        };

        // Flash can only change bits from 1→0
        let mut storage = self.storage.borrow_mut();
        for i in 0..write_len {
            storage[address as usize + i] &= data[i];
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

        let mut storage = self.storage.borrow_mut();
        for i in 0..size as usize {
            storage[address as usize + i] = 0xFF;
        }

        let start_block = (address / BLOCK_SIZE) as usize;
        let mut erase_counts = self.erase_counts.borrow_mut();
        for i in 0..(size / BLOCK_SIZE) as usize {
            erase_counts[start_block + i] += 1;
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
