//! Simulation engine.
//!
//! This module drives a trace through the cache model. It provides:
//! 1. **Processor:** [`AccessProcessor`] applies one access (or a modify pair) to the state.
//! 2. **State:** [`SimulationState`] holds the lines, logical clock, and counters of one run.
//! 3. **Driver:** [`Simulator`] owns both and folds a [`TraceSource`](crate::trace::TraceSource)
//!    over them in record order.

/// Single-access state transitions.
pub mod processor;

/// Trace-level driver.
pub mod driver;

pub use driver::{Simulator, simulate};
pub use processor::{AccessOutcome, AccessProcessor, AccessResult, SimulationState};
