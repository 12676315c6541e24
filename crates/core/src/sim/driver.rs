//! Simulator: owns the access processor and the simulation state side-by-side.
//!
//! The driver classifies each trace record and hands data accesses to the
//! processor. Runs are strictly sequential and deterministic: replaying the
//! same trace on a freshly reset simulator yields the same statistics.

use crate::cache::policies::ReplacementPolicy;
use crate::common::error::TraceError;
use crate::config::CacheGeometry;
use crate::stats::SimStats;
use crate::trace::{TraceRecord, TraceSource};

use super::processor::{AccessOutcome, AccessProcessor, SimulationState};

/// Top-level simulator: replacement logic plus the state it mutates.
#[derive(Debug)]
pub struct Simulator {
    processor: AccessProcessor,
    state: SimulationState,
    skipped: u64,
}

impl Simulator {
    /// Creates an LRU simulator with an empty cache of the given shape.
    pub fn new(geometry: CacheGeometry) -> Self {
        Self::from_processor(AccessProcessor::lru(geometry))
    }

    /// Creates a simulator evicting with `policy`.
    pub fn with_policy(geometry: CacheGeometry, policy: Box<dyn ReplacementPolicy>) -> Self {
        Self::from_processor(AccessProcessor::new(geometry, policy))
    }

    fn from_processor(processor: AccessProcessor) -> Self {
        let state = SimulationState::new(processor.geometry());
        Self {
            processor,
            state,
            skipped: 0,
        }
    }

    /// Cache shape being simulated.
    pub const fn geometry(&self) -> &CacheGeometry {
        self.processor.geometry()
    }

    /// Read-only view of the current state.
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> SimStats {
        self.state.stats
    }

    /// Current logical clock.
    pub const fn clock(&self) -> u64 {
        self.state.clock
    }

    /// Malformed records skipped so far.
    pub const fn skipped_records(&self) -> u64 {
        self.skipped
    }

    /// Discards all lines, counters, and the clock.
    pub fn reset(&mut self) {
        self.state.reset();
        self.skipped = 0;
    }

    /// Processes one record.
    ///
    /// Loads and stores perform one access; modifies perform an access plus
    /// the trailing hit. Instruction fetches and unknown operations return
    /// `None` and change nothing.
    pub fn step(&mut self, record: &TraceRecord) -> Option<AccessOutcome> {
        self.processor
            .access(&mut self.state, record.op, record.address)
    }

    /// Replays `source` to the end and returns the accumulated counters.
    ///
    /// Malformed records are logged and skipped. State carries over from any
    /// previous run; call [`Simulator::reset`] first for a fresh cache.
    ///
    /// # Errors
    ///
    /// The first unrecoverable [`TraceError`] (an I/O failure).
    pub fn run<S: TraceSource>(&mut self, source: S) -> Result<SimStats, TraceError> {
        self.run_with(source, |_, _| {})
    }

    /// Like [`Simulator::run`], calling `observer` after every processed data record.
    ///
    /// # Errors
    ///
    /// The first unrecoverable [`TraceError`] (an I/O failure).
    pub fn run_with<S, F>(&mut self, source: S, mut observer: F) -> Result<SimStats, TraceError>
    where
        S: TraceSource,
        F: FnMut(&TraceRecord, &AccessOutcome),
    {
        tracing::info!(
            sets = self.geometry().num_sets(),
            ways = self.geometry().ways(),
            block_bytes = self.geometry().block_bytes(),
            policy = self.processor.policy_name(),
            "simulation starting"
        );

        for item in source {
            match item {
                Ok(record) => {
                    if let Some(outcome) = self.step(&record) {
                        observer(&record, &outcome);
                    }
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("skipping {e}");
                    self.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let stats = self.stats();
        tracing::info!(
            hits = stats.hits,
            misses = stats.misses,
            evictions = stats.evictions,
            skipped = self.skipped,
            "simulation finished"
        );
        Ok(stats)
    }
}

/// Replays `source` against a fresh LRU cache of shape `geometry`.
///
/// # Errors
///
/// See [`Simulator::run`].
pub fn simulate<S: TraceSource>(geometry: CacheGeometry, source: S) -> Result<SimStats, TraceError> {
    Simulator::new(geometry).run(source)
}
