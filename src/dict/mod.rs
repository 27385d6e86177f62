//! Flash-resident key/value dictionary
//!
//! This module implements the settings store proper: the on-media sector
//! layout, the entry scanner, the in-place tail shifter, the typed value
//! codec, and the `FlashDictionary` facade that composes them over a
//! [`FlashInterface`](crate::platform::FlashInterface).

pub mod codec;
pub mod error;
pub mod layout;
pub mod scan;
pub mod shift;
pub mod store;

pub use error::{DictError, Result};
pub use layout::{DICT_BASE, DICT_MAGIC, FREE_SPACE, MAX_KEY_LEN, SECTOR_SIZE};
pub use scan::{EntryView, ScanHit};
pub use store::FlashDictionary;
