//! End-to-end tests driving the public API over a test-local flash fake

use pico_settings::dict::{DictError, FlashDictionary, DICT_BASE, SECTOR_SIZE};
use pico_settings::platform::{FlashError, FlashInterface, Result};

/// Minimal RAM-backed flash: erase-to-0xFF, block-aligned erases, no
/// protected regions
struct RamFlash {
    storage: Vec<u8>,
}

const BLOCK_SIZE: u32 = 4096;
const CAPACITY: u32 = 0x080000;

impl RamFlash {
    fn new() -> Self {
        Self {
            storage: vec![0xFF; CAPACITY as usize],
        }
    }
}

impl FlashInterface for RamFlash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        let start = address as usize;
        let end = start + buf.len();
        if end > self.storage.len() {
            return Err(FlashError::InvalidAddress);
        }
        buf.copy_from_slice(&self.storage[start..end]);
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let start = address as usize;
        let end = start + data.len();
        if end > self.storage.len() {
            return Err(FlashError::InvalidAddress);
        }
        for (slot, byte) in self.storage[start..end].iter_mut().zip(data) {
            *slot &= byte;
        }
        Ok(())
    }

    fn erase(&mut self, address: u32, size: u32) -> Result<()> {
        if address % BLOCK_SIZE != 0 || size % BLOCK_SIZE != 0 {
            return Err(FlashError::InvalidAddress);
        }
        let start = address as usize;
        let end = start + size as usize;
        if end > self.storage.len() {
            return Err(FlashError::InvalidAddress);
        }
        self.storage[start..end].fill(0xFF);
        Ok(())
    }

    fn block_size(&self) -> u32 {
        BLOCK_SIZE
    }

    fn capacity(&self) -> u32 {
        CAPACITY
    }
}

#[test]
fn typed_round_trips_through_flash() {
    let mut dict = FlashDictionary::new(RamFlash::new());

    dict.set_string("name", "Fabrizio").unwrap();
    dict.set_int("code", 1234).unwrap();
    dict.set_bool("armed", true).unwrap();
    dict.set_value("blob", &[1, 2, 3]).unwrap();

    assert_eq!(dict.get_str("name", "").unwrap(), "Fabrizio");
    assert_eq!(dict.get_int("code", 0).unwrap(), 1234);
    assert!(dict.get_bool("armed", false).unwrap());
    assert_eq!(dict.get_value("blob").unwrap(), Some(&[1, 2, 3][..]));
}

#[test]
fn settings_survive_a_reopen() {
    let mut dict = FlashDictionary::new(RamFlash::new());
    dict.set_string("ssid", "workshop").unwrap();
    dict.set_int("baud", 115200).unwrap();

    // Same flash device, fresh dictionary: simulates a power cycle
    let mut reopened = FlashDictionary::new(dict.into_flash());
    assert_eq!(reopened.get_str("ssid", "").unwrap(), "workshop");
    assert_eq!(reopened.get_int("baud", 0).unwrap(), 115200);
}

#[test]
fn resize_keeps_unrelated_settings_intact() {
    let mut dict = FlashDictionary::new(RamFlash::new());
    dict.set_string("name", "Fabrizio").unwrap();
    dict.set_int("code", 1234).unwrap();
    dict.set_bool("debug", false).unwrap();

    dict.set_string("name", "Fab").unwrap();
    dict.set_string("name", "a considerably longer name").unwrap();

    let mut reopened = FlashDictionary::new(dict.into_flash());
    assert_eq!(
        reopened.get_str("name", "").unwrap(),
        "a considerably longer name"
    );
    assert_eq!(reopened.get_int("code", 0).unwrap(), 1234);
    assert!(!reopened.get_bool("debug", true).unwrap());
}

#[test]
fn uninitialized_flash_acts_as_empty() {
    let mut dict = FlashDictionary::new(RamFlash::new());
    assert!(!dict.is_content_valid().unwrap());
    assert_eq!(dict.get_int("anything", 42).unwrap(), 42);
    assert!(dict.is_content_valid().unwrap());
}

#[test]
fn factory_reset_discards_everything() {
    let mut dict = FlashDictionary::new(RamFlash::new());
    dict.set_string("name", "Fabrizio").unwrap();

    dict.erase_content().unwrap();

    let mut reopened = FlashDictionary::new(dict.into_flash());
    assert_eq!(reopened.get_str("name", "default").unwrap(), "default");
}

#[test]
fn oversized_write_is_rejected_up_front() {
    let mut dict = FlashDictionary::new(RamFlash::new());
    dict.set_int("keep", 1).unwrap();

    let big = vec![0u8; SECTOR_SIZE];
    assert_eq!(
        dict.set_value("big", &big),
        Err(DictError::CapacityExceeded)
    );
    assert_eq!(dict.get_int("keep", 0).unwrap(), 1);
}

#[test]
fn dictionary_at_an_alternate_sector() {
    let base = DICT_BASE + 2 * BLOCK_SIZE;
    let mut dict = FlashDictionary::with_base(RamFlash::new(), base).unwrap();
    dict.set_int("code", 7).unwrap();

    let mut reopened = FlashDictionary::with_base(dict.into_flash(), base).unwrap();
    assert_eq!(reopened.get_int("code", 0).unwrap(), 7);

    // The default sector was never touched
    let mut at_default = FlashDictionary::new(reopened.into_flash());
    assert!(!at_default.is_content_valid().unwrap());
}
