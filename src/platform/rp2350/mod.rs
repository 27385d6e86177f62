//! RP2350 platform implementation

pub mod flash;

pub use flash::Rp2350Flash;
