//! Flash-backed settings dictionary
//!
//! `FlashDictionary` composes the scanner, shifter, and codec over a
//! [`FlashInterface`] into `get`/`set` operations on one 4 KB flash sector.
//!
//! # Durability model
//!
//! Every write stages the full sector in an owned RAM image, then commits by
//! erasing the physical sector and programming the whole image back. That
//! erase+program pair is the sole durability primitive and it is NOT atomic:
//! a power loss between the two leaves the sector's logical content
//! undefined (magic validation recovers to an empty dictionary on the next
//! load). Acceptable for low-frequency configuration writes; do not use this
//! store for hot data — each single-key write costs one full-sector erase
//! cycle.
//!
//! # Concurrency contract
//!
//! Single-writer, non-reentrant. Operations run synchronously to completion,
//! blocked only by flash hardware timing. Callers must serialize all access
//! to a dictionary themselves; nothing here guards against two overlapping
//! `set` calls from different threads of control.

use super::codec;
use super::error::{DictError, Result};
use super::layout::{
    entry_span, DICT_BASE, DICT_MAGIC, ENTRIES_START, FREE_SPACE, MAX_KEY_LEN, SECTOR_SIZE,
    VALUE_LEN_SIZE,
};
use super::scan::{self, ScanHit};
use super::shift;
use crate::platform::{FlashError, FlashInterface};

/// Flash-backed key/value settings store
///
/// Lazily loads its sector on first access and reinitializes it (erase +
/// magic) if the magic header is missing. Reads are served as views into the
/// cached image without copying; writes rewrite the image in place and
/// commit it whole.
///
/// # Example
///
/// ```ignore
/// let mut dict = FlashDictionary::new(Rp2350Flash::new());
/// dict.set_string("name", "Fabrizio")?;
/// dict.set_int("code", 1234)?;
/// assert_eq!(dict.get_str("name", "")?, "Fabrizio");
/// ```
pub struct FlashDictionary<F: FlashInterface> {
    /// Flash device
    flash: F,
    /// Sector base address
    base: u32,
    /// Cached sector image; staging buffer for writes
    image: [u8; SECTOR_SIZE],
    /// Whether `image` reflects the sector contents
    loaded: bool,
}

impl<F: FlashInterface> FlashDictionary<F> {
    /// Create a dictionary over the default settings sector
    /// ([`DICT_BASE`](super::layout::DICT_BASE)).
    pub fn new(flash: F) -> Self {
        Self {
            flash,
            base: DICT_BASE,
            image: [FREE_SPACE; SECTOR_SIZE],
            loaded: false,
        }
    }

    /// Create a dictionary over a sector at `base`.
    ///
    /// # Errors
    ///
    /// Returns `FlashError::InvalidAddress` if `base` is not sector-aligned.
    pub fn with_base(flash: F, base: u32) -> Result<Self> {
        if base as usize % SECTOR_SIZE != 0 {
            return Err(DictError::Flash(FlashError::InvalidAddress));
        }
        Ok(Self {
            flash,
            base,
            image: [FREE_SPACE; SECTOR_SIZE],
            loaded: false,
        })
    }

    /// Get the flash device (for testing)
    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    /// Consume the dictionary and return the flash device
    pub fn into_flash(self) -> F {
        self.flash
    }

    /// True iff the sector on flash starts with the magic header
    pub fn is_content_valid(&mut self) -> Result<bool> {
        let mut magic = [0u8; ENTRIES_START];
        self.flash.read(self.base, &mut magic)?;
        Ok(magic == DICT_MAGIC.to_le_bytes())
    }

    /// Factory reset: erase the sector and write only the magic header.
    ///
    /// All prior entries become free space. Not needed before first use —
    /// an uninitialized sector is reinitialized automatically.
    pub fn erase_content(&mut self) -> Result<()> {
        self.flash.erase(self.base, SECTOR_SIZE as u32)?;
        self.flash.write(self.base, &DICT_MAGIC.to_le_bytes())?;

        self.image = [FREE_SPACE; SECTOR_SIZE];
        self.image[..ENTRIES_START].copy_from_slice(&DICT_MAGIC.to_le_bytes());
        self.loaded = true;

        crate::log_info!("settings sector reinitialized");
        Ok(())
    }

    /// Load the sector image if not already cached, reinitializing an
    /// unrecognized sector.
    fn ensure_loaded(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }

        self.flash.read(self.base, &mut self.image)?;
        if self.image[..ENTRIES_START] == DICT_MAGIC.to_le_bytes() {
            self.loaded = true;
        } else {
            crate::log_warn!("settings sector magic missing, reinitializing");
            self.erase_content()?;
        }
        Ok(())
    }

    /// Look up `key` and return a view of its stored value bytes, or `None`
    /// if the key was never written.
    pub fn get_value(&mut self, key: &str) -> Result<Option<&[u8]>> {
        self.ensure_loaded()?;
        match scan::find_key(&self.image, key.as_bytes())? {
            ScanHit::Found(entry) => Ok(Some(entry.value_bytes(&self.image))),
            ScanHit::Free(_) => Ok(None),
        }
    }

    /// Get a string value, or `default` if the key is absent or the stored
    /// bytes do not decode as a string.
    pub fn get_str<'a>(&'a mut self, key: &str, default: &'a str) -> Result<&'a str> {
        Ok(self
            .get_value(key)?
            .and_then(codec::decode_str)
            .unwrap_or(default))
    }

    /// Get an integer value, or `default` if the key is absent or holds
    /// fewer than 4 bytes.
    pub fn get_int(&mut self, key: &str, default: i32) -> Result<i32> {
        Ok(self
            .get_value(key)?
            .and_then(codec::decode_int)
            .unwrap_or(default))
    }

    /// Get a boolean value, or `default` if the key is absent or holds an
    /// empty value.
    pub fn get_bool(&mut self, key: &str, default: bool) -> Result<bool> {
        Ok(self
            .get_value(key)?
            .and_then(codec::decode_bool)
            .unwrap_or(default))
    }

    /// Durably store `key` → `value`, overwriting any previous value.
    pub fn set_value(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.set_parts(key, &[value])
    }

    /// Store a string value (stored with its NUL terminator)
    pub fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_parts(key, &[value.as_bytes(), &[0]])
    }

    /// Store an integer value (4 bytes, little-endian)
    pub fn set_int(&mut self, key: &str, value: i32) -> Result<()> {
        self.set_parts(key, &[&codec::encode_int(value)])
    }

    /// Store a boolean value (one byte)
    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.set_parts(key, &[&codec::encode_bool(value)])
    }

    /// The write path. `parts` concatenated form the value bytes; they are
    /// assembled directly into the image, so composite encodings (string +
    /// terminator) need no intermediate buffer.
    fn set_parts(&mut self, key: &str, parts: &[&[u8]]) -> Result<()> {
        let key = key.as_bytes();
        if key.len() > MAX_KEY_LEN || key.contains(&0) {
            return Err(DictError::InvalidKey);
        }

        let new_len: usize = parts.iter().map(|part| part.len()).sum();
        if new_len > u16::MAX as usize {
            return Err(DictError::ValueTooLarge);
        }

        self.ensure_loaded()?;

        match scan::find_key(&self.image, key)? {
            ScanHit::Free(offset) => {
                // New key: append at the free offset, keeping one byte after
                // the entry for the sentinel
                let end = offset + entry_span(key.len(), new_len);
                if end + 1 > SECTOR_SIZE {
                    return Err(DictError::CapacityExceeded);
                }

                self.image[offset] = key.len() as u8;
                self.image[offset + 1..offset + 1 + key.len()].copy_from_slice(key);
                self.image[offset + 1 + key.len()] = 0;
                self.write_value(offset + 1 + key.len() + 1, new_len, parts);
            }
            ScanHit::Found(entry) => {
                // Existing key: the key fields are already in place, only the
                // value is rewritten. A length change moves the whole tail.
                let old_end = entry.end();
                let new_end = entry.value_start() + new_len;

                if new_len != entry.value_len {
                    let free = scan::free_offset(&self.image, old_end)?;
                    if new_len > entry.value_len {
                        let growth = new_len - entry.value_len;
                        if free + growth + 1 > SECTOR_SIZE {
                            return Err(DictError::CapacityExceeded);
                        }
                    }

                    // The free_offset walk read the byte at old_end, so this
                    // index is in bounds
                    let was_last = self.image[old_end] == FREE_SPACE;
                    shift::shift_tail(&mut self.image, old_end, new_end);
                    if was_last {
                        self.image[new_end] = FREE_SPACE;
                    }
                }

                self.write_value(entry.value_len_offset(), new_len, parts);
            }
        }

        self.commit()
    }

    /// Write the value-length word and the value bytes into the image
    fn write_value(&mut self, len_offset: usize, total_len: usize, parts: &[&[u8]]) {
        self.image[len_offset..len_offset + VALUE_LEN_SIZE]
            .copy_from_slice(&(total_len as u16).to_le_bytes());

        let mut pos = len_offset + VALUE_LEN_SIZE;
        for part in parts {
            self.image[pos..pos + part.len()].copy_from_slice(part);
            pos += part.len();
        }
    }

    /// Commit the staged image: erase the sector, program the image back.
    ///
    /// The sole durability primitive. Not atomic across the pair; see the
    /// module docs for the power-loss caveat.
    fn commit(&mut self) -> Result<()> {
        self.flash.erase(self.base, SECTOR_SIZE as u32)?;
        self.flash.write(self.base, &self.image)?;
        crate::log_debug!("settings sector committed at {}", self.base);
        Ok(())
    }
}
