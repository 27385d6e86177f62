//! Mock platform implementations for host-side testing

pub mod flash;

pub use flash::MockFlash;
