//! On-media layout of the settings sector
//!
//! One erasable 4 KB flash sector holds the whole dictionary:
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ Magic: u32 = 0x4B565331 ("KVS1"), LE          │  Offset: 0
//! ├───────────────────────────────────────────────┤
//! │ Entries, packed back to back:                 │  Offset: 4
//! │   key_length: u8   (0xFF = free space)        │
//! │   key bytes        (no embedded NUL)          │
//! │   0x00             (key terminator)           │
//! │   value_length: u16 (little-endian)           │
//! │   value bytes                                 │
//! ├───────────────────────────────────────────────┤
//! │ Free space: 0xFF .. 0xFF (erased flash)       │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! The byte immediately after the last entry's value reads 0xFF, which is
//! both the free-space sentinel and the natural state of erased flash.

/// Size of the dictionary sector (one flash erase unit)
pub const SECTOR_SIZE: usize = 4096;

/// Default sector base address (first block past the firmware region)
pub const DICT_BASE: u32 = 0x040000;

/// Sector magic number ("KVS1")
pub const DICT_MAGIC: u32 = 0x4B565331;

/// Size of the magic field; entries start here
pub const ENTRIES_START: usize = 4;

/// Key-length byte marking unused/erased flash (end of entries)
pub const FREE_SPACE: u8 = 0xFF;

/// Maximum key length in bytes (0xFF is reserved for the sentinel)
pub const MAX_KEY_LEN: usize = 254;

/// Size of the value-length field
pub const VALUE_LEN_SIZE: usize = 2;

/// Total on-media size of an entry with the given key and value lengths:
/// key-length byte, key bytes, NUL terminator, value-length word, value bytes.
pub const fn entry_span(key_len: usize, value_len: usize) -> usize {
    1 + key_len + 1 + VALUE_LEN_SIZE + value_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_span() {
        // "name" -> "Fab\0": 1 + 4 + 1 + 2 + 4
        assert_eq!(entry_span(4, 4), 12);
        // Empty key, empty value still carries its framing
        assert_eq!(entry_span(0, 0), 4);
    }

    #[test]
    fn test_magic_is_not_erased_flash() {
        // A freshly erased sector must never look initialized
        assert_ne!(DICT_MAGIC.to_le_bytes(), [FREE_SPACE; 4]);
    }

    #[test]
    fn test_base_is_sector_aligned() {
        assert_eq!(DICT_BASE as usize % SECTOR_SIZE, 0);
    }
}
