//! Simulation statistics collection and reporting.
//!
//! This module holds the counters a run produces and the sinks that report them:
//! 1. **Counters:** Hits, misses, and evictions ([`SimStats`]).
//! 2. **Formats:** The `hits:<n> misses:<n> evictions:<n>` summary and the
//!    space-separated `<hits> <misses> <evictions>` record.
//! 3. **Sinks:** Console, results file, and JSON writers behind [`StatsSink`].
//!
//! Reports are emitted once, after the whole trace has been consumed.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::common::error::SinkError;

/// Aggregate outcome of a simulation run.
///
/// Counters saturate instead of wrapping on overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimStats {
    /// Accesses that found their block resident.
    pub hits: u64,
    /// Accesses that did not.
    pub misses: u64,
    /// Misses that displaced a resident block.
    pub evictions: u64,
}

impl SimStats {
    /// Creates a stats value from raw counters.
    pub const fn new(hits: u64, misses: u64, evictions: u64) -> Self {
        Self {
            hits,
            misses,
            evictions,
        }
    }

    /// Total logical accesses simulated (`hits + misses`).
    pub const fn accesses(&self) -> u64 {
        self.hits.saturating_add(self.misses)
    }

    /// Fraction of accesses that hit, or 0.0 for an empty run.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }

    /// `hits:<n> misses:<n> evictions:<n>`.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// `<hits> <misses> <evictions>`, the persisted result record.
    pub fn record_line(&self) -> String {
        format!("{} {} {}", self.hits, self.misses, self.evictions)
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{}",
            self.hits, self.misses, self.evictions
        )
    }
}

/// A consumer of the final statistics of a run.
pub trait StatsSink {
    /// Formats and writes `stats`.
    ///
    /// # Errors
    ///
    /// [`SinkError`] if the report cannot be written or serialized.
    fn emit(&mut self, stats: &SimStats) -> Result<(), SinkError>;
}

/// Writes the one-line summary to a writer (stdout in the CLI).
#[derive(Debug)]
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    /// Creates a sink writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatsSink for ConsoleSink<W> {
    fn emit(&mut self, stats: &SimStats) -> Result<(), SinkError> {
        writeln!(self.out, "{stats}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Persists the space-separated result record to a file, replacing its contents.
#[derive(Debug, Clone)]
pub struct ResultsFileSink {
    path: PathBuf,
}

impl ResultsFileSink {
    /// Creates a sink that will write to `path` when emitted.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsSink for ResultsFileSink {
    fn emit(&mut self, stats: &SimStats) -> Result<(), SinkError> {
        let mut file = BufWriter::new(File::create(&self.path)?);
        writeln!(file, "{}", stats.record_line())?;
        file.flush()?;
        tracing::debug!(path = %self.path.display(), "results written");
        Ok(())
    }
}

/// Writes the statistics as a pretty-printed JSON object.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    /// Creates a sink writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatsSink for JsonSink<W> {
    fn emit(&mut self, stats: &SimStats) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut self.out, stats)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Emits `stats` to every sink in order, stopping at the first failure.
///
/// # Errors
///
/// The first [`SinkError`] returned by a sink.
pub fn emit_all(stats: &SimStats, sinks: &mut [&mut dyn StatsSink]) -> Result<(), SinkError> {
    for sink in sinks.iter_mut() {
        sink.emit(stats)?;
    }
    Ok(())
}
