#![cfg_attr(not(test), no_std)]

//! pico_settings - Flash-backed key/value settings store for RP2350 boards
//!
//! This library persists small typed values (strings, 32-bit integers,
//! booleans) across power cycles, using a single 4 KB erasable flash sector
//! as the backing store. It targets firmware that needs a handful of durable
//! configuration settings without a filesystem.
//!
//! # Modules
//!
//! - [`platform`]: hardware abstraction (Flash trait, mock, RP2350 backend)
//! - [`dict`]: the flash-resident dictionary (layout, scanner, shifter, store)
//!
//! # Features
//!
//! - `pico2_w`: RP2350 flash backend and defmt logging
//! - `mock`: expose the in-memory flash fake outside of test builds

// Platform abstraction layer
pub mod platform;

// Flash-resident key/value dictionary
pub mod dict;

// Note: Logging macros (log_info!, log_warn!, log_error!, log_debug!)
// are exported at crate root via #[macro_export] in logging
pub mod logging;
