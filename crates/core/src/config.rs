//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize a run:
//! 1. **Defaults:** Baseline constants (results file name, allocation limits).
//! 2. **Layered input:** [`CacheConfig`] holds optional parameters so a JSON file and
//!    command-line flags can each supply a subset; [`CacheConfig::merge`] layers them.
//! 3. **Validation:** [`CacheConfig::validate`] turns the layered input into a
//!    [`CacheGeometry`], the only shape the simulation core accepts.
//!
//! Configuration is supplied as JSON (`SimConfig::from_json`) and/or by the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::addr::{Address, DecodedAddr};
use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// File the space-separated result record is written to.
    pub const RESULTS_PATH: &str = ".cachesim_results";

    /// Largest accepted set-index width (4 Gi sets).
    pub const MAX_SET_BITS: u32 = 32;

    /// Largest total line count (sets × ways) the simulator will allocate.
    ///
    /// Each line is 24 bytes, so this caps the line store at 6 GiB.
    pub const MAX_LINES: usize = 1 << 28;
}

pub use defaults::{MAX_LINES, MAX_SET_BITS};

/// Cache parameters as supplied by one configuration layer.
///
/// Every field is optional so that partial sources compose. Names follow the
/// classic `(s, E, b)` notation.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::CacheConfig;
///
/// let file: CacheConfig = serde_json::from_str(r#"{ "set_bits": 4, "ways": 2 }"#).unwrap();
/// let flags = CacheConfig { block_bits: Some(4), ways: Some(1), ..CacheConfig::default() };
///
/// let geometry = file.merge(&flags).validate().unwrap();
/// assert_eq!(geometry.num_sets(), 16);
/// assert_eq!(geometry.ways(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Number of set-index bits (`s`); the cache has `2^s` sets.
    #[serde(default, alias = "s")]
    pub set_bits: Option<u32>,
    /// Number of block-offset bits (`b`); blocks are `2^b` bytes.
    #[serde(default, alias = "b")]
    pub block_bits: Option<u32>,
    /// Lines per set (`E`, associativity).
    #[serde(default, alias = "E")]
    pub ways: Option<usize>,
}

impl CacheConfig {
    /// Layers `overrides` on top of `self`; any field set in `overrides` wins.
    pub fn merge(&self, overrides: &Self) -> Self {
        Self {
            set_bits: overrides.set_bits.or(self.set_bits),
            block_bits: overrides.block_bits.or(self.block_bits),
            ways: overrides.ways.or(self.ways),
        }
    }

    /// Checks that every parameter is present and positive and builds the geometry.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] if `s`, `E`, or `b` was never supplied.
    /// - [`ConfigError::NonPositive`] if any of them is zero.
    /// - [`ConfigError::TooWide`] / [`ConfigError::TooLarge`] from [`CacheGeometry::new`].
    pub fn validate(&self) -> Result<CacheGeometry, ConfigError> {
        let set_bits = self.set_bits.ok_or(ConfigError::Missing("s"))?;
        let ways = self.ways.ok_or(ConfigError::Missing("E"))?;
        let block_bits = self.block_bits.ok_or(ConfigError::Missing("b"))?;

        if set_bits == 0 {
            return Err(ConfigError::NonPositive { name: "s", value: 0 });
        }
        if block_bits == 0 {
            return Err(ConfigError::NonPositive { name: "b", value: 0 });
        }

        CacheGeometry::new(set_bits, block_bits, ways)
    }
}

/// Validated shape of a simulated cache.
///
/// Unlike the command-line layer, the geometry accepts `s = 0` (a single,
/// fully-associative set) and `b = 0` (one-byte blocks); only the address
/// width and allocation size are constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    set_bits: u32,
    block_bits: u32,
    ways: usize,
}

impl CacheGeometry {
    /// Creates a geometry with `2^set_bits` sets of `ways` lines and `2^block_bits`-byte blocks.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NonPositive`] if `ways` is zero.
    /// - [`ConfigError::TooWide`] if `set_bits + block_bits > 64`.
    /// - [`ConfigError::TooLarge`] if the line store would exceed [`MAX_LINES`].
    pub fn new(set_bits: u32, block_bits: u32, ways: usize) -> Result<Self, ConfigError> {
        if ways == 0 {
            return Err(ConfigError::NonPositive { name: "E", value: 0 });
        }
        if set_bits.saturating_add(block_bits) > u64::BITS {
            return Err(ConfigError::TooWide {
                set_bits,
                block_bits,
            });
        }
        let too_large = ConfigError::TooLarge { set_bits, ways };
        if set_bits > MAX_SET_BITS {
            return Err(too_large);
        }
        match (1usize << set_bits).checked_mul(ways) {
            Some(lines) if lines <= MAX_LINES => Ok(Self {
                set_bits,
                block_bits,
                ways,
            }),
            _ => Err(too_large),
        }
    }

    /// Set-index width `s`.
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Block-offset width `b`.
    pub const fn block_bits(&self) -> u32 {
        self.block_bits
    }

    /// Lines per set `E`.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Number of sets, `S = 2^s`.
    pub const fn num_sets(&self) -> usize {
        1 << self.set_bits
    }

    /// Block size in bytes, `B = 2^b`. Saturates for `b = 64`.
    pub const fn block_bytes(&self) -> u64 {
        match 1u64.checked_shl(self.block_bits) {
            Some(bytes) => bytes,
            None => u64::MAX,
        }
    }

    /// Total number of lines, `S × E`.
    pub const fn num_lines(&self) -> usize {
        self.num_sets() * self.ways
    }

    /// Decodes `addr` against this geometry.
    #[inline]
    pub fn decode(&self, addr: Address) -> DecodedAddr {
        addr.decode(self.set_bits, self.block_bits)
    }
}

/// Complete configuration for one simulator invocation.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::SimConfig;
///
/// let json = r#"{
///     "cache": { "s": 4, "E": 1, "b": 4 },
///     "trace": "traces/yi.trace",
///     "verbose": true
/// }"#;
///
/// let config = SimConfig::from_json(json).unwrap();
/// assert!(config.verbose);
/// assert_eq!(config.cache.validate().unwrap().num_sets(), 16);
/// assert_eq!(config.results_path.to_str(), Some(".cachesim_results"));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Cache parameters.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Trace file to replay.
    #[serde(default)]
    pub trace: Option<PathBuf>,
    /// Print every processed record together with its outcome.
    #[serde(default)]
    pub verbose: bool,
    /// Where the space-separated result record is written.
    #[serde(default = "SimConfig::default_results_path")]
    pub results_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            trace: None,
            verbose: false,
            results_path: Self::default_results_path(),
        }
    }
}

impl SimConfig {
    fn default_results_path() -> PathBuf {
        PathBuf::from(defaults::RESULTS_PATH)
    }

    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] on malformed JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Json`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}
