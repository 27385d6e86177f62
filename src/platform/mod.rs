//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the flash device backing the
//! settings store. All platform-specific code is isolated to this module.

pub mod error;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{FlashError, Result};
pub use traits::FlashInterface;
