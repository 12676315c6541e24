//! Trace-driven set-associative cache simulator library.
//!
//! This crate replays memory-access traces against a modelled cache and reports
//! aggregate hit, miss, and eviction counts. It provides:
//! 1. **Addressing:** Decoding of 64-bit addresses into tag and set-index fields.
//! 2. **Cache:** A fixed sets × ways line store with a pluggable replacement policy (LRU).
//! 3. **Simulation:** The access processor, including compound modify accesses, and the trace driver.
//! 4. **Trace:** Parsing of valgrind-style `<op> <addr>,<size>` records from any reader.
//! 5. **Statistics:** Final counters and the sinks that format and persist them.

/// Common types (address decoding, error taxonomy).
pub mod common;
/// Cache geometry and simulator configuration.
pub mod config;
/// Line store and replacement policies.
pub mod cache;
/// Access processor and trace driver.
pub mod sim;
/// Simulation statistics and report sinks.
pub mod stats;
/// Trace record parsing and trace sources.
pub mod trace;

/// Validated cache shape; build with [`CacheGeometry::new`] or [`CacheConfig::validate`](config::CacheConfig::validate).
pub use crate::config::CacheGeometry;
/// Top-level simulator; owns the simulation state for one run.
pub use crate::sim::Simulator;
/// Final hit/miss/eviction counters.
pub use crate::stats::SimStats;
