//! Access Processor.
//!
//! Applies one trace access to the simulation state. A single logical access:
//! 1. advances the logical clock,
//! 2. decodes the address,
//! 3. probes the target set and resolves it as a hit, a stale-slot refill, a
//!    fill of an empty line, or an eviction chosen by the replacement policy.
//!
//! A modify record performs one such access and then a second lookup of the
//! same set and tag on the same clock tick. That second lookup always hits,
//! since the first half has just made the block resident.

use std::fmt;

use crate::cache::policies::{LruPolicy, ReplacementPolicy};
use crate::cache::{CacheStore, Probe};
use crate::common::addr::{Address, DecodedAddr};
use crate::config::CacheGeometry;
use crate::stats::SimStats;
use crate::trace::Operation;

/// Mutable state of one simulation run: the lines, the logical clock, and the counters.
///
/// Owned by a single [`Simulator`](super::Simulator); nothing else writes to it.
#[derive(Clone, Debug)]
pub struct SimulationState {
    /// Cache line store.
    pub cache: CacheStore,
    /// Logical clock. 0 before the first access; each data record advances it by one.
    pub clock: u64,
    /// Running hit/miss/eviction counters.
    pub stats: SimStats,
}

impl SimulationState {
    /// Creates the initial state: all lines invalid, clock 0, counters 0.
    pub fn new(geometry: &CacheGeometry) -> Self {
        Self {
            cache: CacheStore::new(geometry),
            clock: 0,
            stats: SimStats::default(),
        }
    }

    /// Returns the state to its freshly initialised form without reallocating.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.clock = 0;
        self.stats = SimStats::default();
    }
}

/// Classification of a single logical access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessResult {
    /// Block was resident.
    Hit,
    /// Block was not resident and went into an unused or stale line.
    Miss,
    /// Block was not resident and displaced the LRU line of a full set.
    MissEviction,
}

impl AccessResult {
    /// Returns `true` for [`AccessResult::Hit`].
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

impl fmt::Display for AccessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::MissEviction => "miss eviction",
        })
    }
}

/// Outcome of processing one data record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessOutcome {
    /// Result of the first (for L and S, the only) access.
    pub result: AccessResult,
    /// Whether a modify's trailing store was counted as a hit.
    pub trailing_hit: bool,
}

impl fmt::Display for AccessOutcome {
    /// Formats as the verbose trace suffix, e.g. `miss eviction hit`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result)?;
        if self.trailing_hit {
            f.write_str(" hit")?;
        }
        Ok(())
    }
}

/// Applies accesses to a [`SimulationState`] using a replacement policy.
#[derive(Debug)]
pub struct AccessProcessor {
    geometry: CacheGeometry,
    policy: Box<dyn ReplacementPolicy>,
}

impl AccessProcessor {
    /// Creates a processor for `geometry` evicting with `policy`.
    pub fn new(geometry: CacheGeometry, policy: Box<dyn ReplacementPolicy>) -> Self {
        Self { geometry, policy }
    }

    /// Creates a processor using LRU replacement.
    pub fn lru(geometry: CacheGeometry) -> Self {
        Self::new(geometry, Box::new(LruPolicy::new()))
    }

    /// Geometry the processor decodes addresses against.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Name of the replacement policy in use.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Processes one trace operation against `state`.
    ///
    /// # Returns
    ///
    /// `None` for instruction fetches and unknown operations, which leave the
    /// state untouched (no decode, no clock advance). Otherwise the outcome of
    /// the access, including a modify's trailing hit.
    pub fn access(
        &self,
        state: &mut SimulationState,
        op: Operation,
        addr: Address,
    ) -> Option<AccessOutcome> {
        if !op.is_data_access() {
            return None;
        }

        state.clock += 1;
        let decoded = self.geometry.decode(addr);
        let result = self.access_once(state, decoded);
        let trailing_hit = op == Operation::Modify && Self::repeat_hit(state, decoded);

        tracing::trace!(
            op = %op,
            addr = %addr,
            set = decoded.set_index,
            tag = decoded.tag,
            clock = state.clock,
            result = %result,
            "access"
        );

        Some(AccessOutcome {
            result,
            trailing_hit,
        })
    }

    /// One logical access at the current clock.
    fn access_once(&self, state: &mut SimulationState, decoded: DecodedAddr) -> AccessResult {
        let DecodedAddr { tag, set_index, .. } = decoded;
        let stamp = state.clock;
        let cache = &mut state.cache;
        let stats = &mut state.stats;

        match cache.probe(set_index, tag) {
            Probe::Hit(way) => {
                stats.hits = stats.hits.saturating_add(1);
                cache.touch(set_index, way, stamp);
                AccessResult::Hit
            }
            Probe::MissReusable(way) => {
                stats.misses = stats.misses.saturating_add(1);
                cache.fill(set_index, way, tag, stamp);
                AccessResult::Miss
            }
            Probe::MissNoMatch => {
                stats.misses = stats.misses.saturating_add(1);
                if let Some(way) = cache.first_empty(set_index) {
                    cache.fill(set_index, way, tag, stamp);
                    AccessResult::Miss
                } else {
                    let victim = self.policy.select_victim(cache.set(set_index));
                    stats.evictions = stats.evictions.saturating_add(1);
                    cache.fill(set_index, victim, tag, stamp);
                    AccessResult::MissEviction
                }
            }
        }
    }

    /// The second half of a modify: same set, same tag, same clock.
    fn repeat_hit(state: &mut SimulationState, decoded: DecodedAddr) -> bool {
        let probe = state.cache.probe(decoded.set_index, decoded.tag);
        debug_assert!(
            matches!(probe, Probe::Hit(_)),
            "modify repeat missed: {probe:?}"
        );
        if let Probe::Hit(way) = probe {
            state.stats.hits = state.stats.hits.saturating_add(1);
            state.cache.touch(decoded.set_index, way, state.clock);
            true
        } else {
            false
        }
    }
}
