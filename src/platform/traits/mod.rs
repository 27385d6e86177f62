//! Platform trait abstractions

pub mod flash;

pub use flash::FlashInterface;
