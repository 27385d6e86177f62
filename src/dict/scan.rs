//! Entry scanning over a sector image
//!
//! A single linear walk over the packed entry stream, from the byte after the
//! magic to the free-space sentinel. Entries are produced as on-demand views
//! (offsets and lengths into the image), never materialized. Every read is
//! bounds-checked: a stream that runs past the sector boundary without a
//! sentinel reports [`DictError::Corrupted`] instead of scanning unboundedly.

use super::error::{DictError, Result};
use super::layout::{ENTRIES_START, FREE_SPACE, VALUE_LEN_SIZE};

/// A parsed view of one entry within a sector image
///
/// Carries offsets and lengths only; the key and value bytes stay in the
/// image and are borrowed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryView {
    /// Offset of the key-length byte
    pub offset: usize,
    /// Key length in bytes (0..=254)
    pub key_len: usize,
    /// Value length in bytes
    pub value_len: usize,
}

impl EntryView {
    /// Offset of the first key byte
    pub fn key_start(&self) -> usize {
        self.offset + 1
    }

    /// Offset of the value-length word (just past the key's NUL terminator)
    pub fn value_len_offset(&self) -> usize {
        self.offset + 1 + self.key_len + 1
    }

    /// Offset of the first value byte
    pub fn value_start(&self) -> usize {
        self.value_len_offset() + VALUE_LEN_SIZE
    }

    /// Offset just past the last value byte (start of the next entry)
    pub fn end(&self) -> usize {
        self.value_start() + self.value_len
    }

    /// Borrow the key bytes out of `image`
    pub fn key_bytes<'a>(&self, image: &'a [u8]) -> &'a [u8] {
        &image[self.key_start()..self.key_start() + self.key_len]
    }

    /// Borrow the value bytes out of `image`
    pub fn value_bytes<'a>(&self, image: &'a [u8]) -> &'a [u8] {
        &image[self.value_start()..self.end()]
    }
}

/// Result of scanning for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanHit {
    /// The key's entry
    Found(EntryView),
    /// Key absent; offset of the first free byte
    Free(usize),
}

fn read_u8(image: &[u8], pos: usize) -> Result<u8> {
    image.get(pos).copied().ok_or(DictError::Corrupted)
}

fn read_u16_le(image: &[u8], pos: usize) -> Result<u16> {
    let bytes = image.get(pos..pos + 2).ok_or(DictError::Corrupted)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Parse the entry starting at `offset`, or `None` if the key-length byte is
/// the free-space sentinel. An entry extending past the image is corruption.
fn entry_at(image: &[u8], offset: usize) -> Result<Option<EntryView>> {
    let key_len = read_u8(image, offset)?;
    if key_len == FREE_SPACE {
        return Ok(None);
    }

    let key_len = key_len as usize;
    let value_len = read_u16_le(image, offset + 1 + key_len + 1)? as usize;
    let entry = EntryView {
        offset,
        key_len,
        value_len,
    };

    if entry.end() > image.len() {
        return Err(DictError::Corrupted);
    }

    Ok(Some(entry))
}

/// Find `key`'s entry, or the first free offset if it is absent.
pub fn find_key(image: &[u8], key: &[u8]) -> Result<ScanHit> {
    let mut offset = ENTRIES_START;
    loop {
        match entry_at(image, offset)? {
            None => return Ok(ScanHit::Free(offset)),
            Some(entry) => {
                if entry.key_bytes(image) == key {
                    return Ok(ScanHit::Found(entry));
                }
                offset = entry.end();
            }
        }
    }
}

/// Walk the entry stream from `from` (the start of an entry, or of the free
/// space) to the free-space sentinel and return its offset.
pub fn free_offset(image: &[u8], from: usize) -> Result<usize> {
    let mut offset = from;
    loop {
        match entry_at(image, offset)? {
            None => return Ok(offset),
            Some(entry) => offset = entry.end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::layout::{DICT_MAGIC, SECTOR_SIZE};

    /// Build a sector image holding the given entries, back to back
    fn image_with(entries: &[(&[u8], &[u8])]) -> [u8; SECTOR_SIZE] {
        let mut image = [0xFFu8; SECTOR_SIZE];
        image[..4].copy_from_slice(&DICT_MAGIC.to_le_bytes());
        let mut pos = ENTRIES_START;
        for (key, value) in entries {
            image[pos] = key.len() as u8;
            pos += 1;
            image[pos..pos + key.len()].copy_from_slice(key);
            pos += key.len();
            image[pos] = 0;
            pos += 1;
            image[pos..pos + 2].copy_from_slice(&(value.len() as u16).to_le_bytes());
            pos += 2;
            image[pos..pos + value.len()].copy_from_slice(value);
            pos += value.len();
        }
        image
    }

    #[test]
    fn test_find_key_in_empty_image() {
        let image = image_with(&[]);
        assert_eq!(find_key(&image, b"name").unwrap(), ScanHit::Free(4));
    }

    #[test]
    fn test_find_key_first_entry() {
        let image = image_with(&[(b"name", b"Fabrizio\0"), (b"code", &1234i32.to_le_bytes())]);
        match find_key(&image, b"name").unwrap() {
            ScanHit::Found(entry) => {
                assert_eq!(entry.offset, 4);
                assert_eq!(entry.key_bytes(&image), b"name");
                assert_eq!(entry.value_bytes(&image), b"Fabrizio\0");
            }
            other => panic!("expected hit, got {:?}", other),
        }
    }

    #[test]
    fn test_find_key_walks_past_entries() {
        let image = image_with(&[(b"name", b"Fabrizio\0"), (b"code", &1234i32.to_le_bytes())]);
        match find_key(&image, b"code").unwrap() {
            ScanHit::Found(entry) => {
                // 4 + (1 + 4 + 1 + 2 + 9)
                assert_eq!(entry.offset, 21);
                assert_eq!(entry.value_len, 4);
            }
            other => panic!("expected hit, got {:?}", other),
        }
    }

    #[test]
    fn test_find_key_absent_returns_free_offset() {
        let image = image_with(&[(b"name", b"Fabrizio\0")]);
        // Free space starts after the single entry
        assert_eq!(find_key(&image, b"other").unwrap(), ScanHit::Free(21));
    }

    #[test]
    fn test_find_key_no_prefix_match() {
        let image = image_with(&[(b"name", b"x")]);
        assert!(matches!(find_key(&image, b"na").unwrap(), ScanHit::Free(_)));
        assert!(matches!(
            find_key(&image, b"names").unwrap(),
            ScanHit::Free(_)
        ));
    }

    #[test]
    fn test_free_offset_resumes_mid_stream() {
        let image = image_with(&[(b"a", b"1"), (b"b", b"22"), (b"c", b"333")]);
        let first = match find_key(&image, b"a").unwrap() {
            ScanHit::Found(entry) => entry,
            other => panic!("expected hit, got {:?}", other),
        };
        let free = free_offset(&image, first.end()).unwrap();
        assert_eq!(free_offset(&image, ENTRIES_START).unwrap(), free);
        // 4 + (1+1+1+2+1) + (1+1+1+2+2) + (1+1+1+2+3)
        assert_eq!(free, 25);
    }

    #[test]
    fn test_sector_without_sentinel_is_corrupt() {
        let mut image = [0xAAu8; SECTOR_SIZE];
        image[..4].copy_from_slice(&DICT_MAGIC.to_le_bytes());
        assert_eq!(find_key(&image, b"name"), Err(DictError::Corrupted));
        assert_eq!(free_offset(&image, ENTRIES_START), Err(DictError::Corrupted));
    }

    #[test]
    fn test_entry_overrunning_sector_is_corrupt() {
        let mut image = image_with(&[]);
        // One entry whose declared value length runs past the sector end
        image[4] = 1;
        image[5] = b'k';
        image[6] = 0;
        image[7..9].copy_from_slice(&(SECTOR_SIZE as u16).to_le_bytes());
        assert_eq!(find_key(&image, b"k"), Err(DictError::Corrupted));
    }

    #[test]
    fn test_truncated_key_fields_are_corrupt() {
        let mut image = image_with(&[]);
        // Key-length byte in the last position, fields would overrun
        image[SECTOR_SIZE - 1] = 3;
        let free = free_offset(&image, SECTOR_SIZE - 1);
        assert_eq!(free, Err(DictError::Corrupted));
    }

    #[test]
    fn test_entry_view_offsets() {
        let entry = EntryView {
            offset: 4,
            key_len: 4,
            value_len: 9,
        };
        assert_eq!(entry.key_start(), 5);
        assert_eq!(entry.value_len_offset(), 10);
        assert_eq!(entry.value_start(), 12);
        assert_eq!(entry.end(), 21);
    }
}
