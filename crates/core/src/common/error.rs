//! Error definitions for the cache simulator.
//!
//! This module defines the failure taxonomy of a simulation run:
//! 1. **Configuration errors:** Missing or out-of-range cache parameters, unreadable config files.
//! 2. **Trace errors:** Malformed records (skipped by the driver) and I/O failures (fatal).
//! 3. **Sink errors:** Failures while formatting or persisting the final report.
//!
//! The simulation core itself has no failure paths; every error here comes from
//! the edges (configuration, input, output).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid or incomplete cache configuration, detected before a run starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required parameter was not supplied by any configuration layer.
    #[error("missing required parameter `{0}`")]
    Missing(&'static str),

    /// A parameter that must be strictly positive was zero.
    #[error("parameter `{name}` must be positive (got {value})")]
    NonPositive {
        /// Parameter name as it appears on the command line.
        name: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// Set-index and block-offset fields together exceed the address width.
    #[error("set bits ({set_bits}) + block bits ({block_bits}) exceed the 64-bit address width")]
    TooWide {
        /// Requested set-index width.
        set_bits: u32,
        /// Requested block-offset width.
        block_bits: u32,
    },

    /// The requested cache has more lines than can be allocated.
    #[error("cache with 2^{set_bits} sets of {ways} lines is too large to simulate")]
    TooLarge {
        /// Requested set-index width.
        set_bits: u32,
        /// Requested associativity.
        ways: usize,
    },

    /// A JSON configuration document could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration or trace file could not be opened or read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Path of the file that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Failure to obtain a trace record.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The line does not have the `<op> <hex-address>,<size>` shape.
    ///
    /// The driver skips these without touching simulation state.
    #[error("line {line}: malformed record `{content}`: {reason}")]
    Malformed {
        /// 1-based line number within the trace.
        line: usize,
        /// The offending line, trimmed.
        content: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The trace source could not be read. Aborts the run.
    #[error("trace read failed: {0}")]
    Io(#[from] io::Error),
}

impl TraceError {
    /// Returns `true` if the error concerns a single record and the run can continue.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Failure while emitting the final report.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the report failed.
    #[error("cannot write report: {0}")]
    Io(#[from] io::Error),

    /// Serializing the report failed.
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any error a simulation run can surface to its caller.
#[derive(Debug, Error)]
pub enum SimError {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// See [`TraceError`].
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// See [`SinkError`].
    #[error(transparent)]
    Sink(#[from] SinkError),
}
