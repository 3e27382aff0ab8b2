//! Logging setup.
//!
//! The crate itself only emits through the `log` facade: hook dispatch at
//! trace level, passes and cache misses at debug, duplicate registrations at
//! warn and reported failures at error. Applications that want that output on
//! stderr call [`init_logging`] once.

mod init;

pub use init::{init_logging, LoggingConfig};
