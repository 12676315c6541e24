//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Address Decoding:** Splitting a raw address into tag, set index, and block offset.
//! 2. **Error Handling:** Configuration, trace, and report-sink error types.

/// Address decoding (tag / set index / block offset).
pub mod addr;

/// Error types for configuration, trace input, and report output.
pub mod error;

pub use addr::{Address, DecodedAddr};
pub use error::{ConfigError, SimError, SinkError, TraceError};
