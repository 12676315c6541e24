//! Set-Associative Line Store.
//!
//! This module owns the lines of the simulated cache. The store is a flat,
//! fixed-size `sets × ways` array allocated once from a validated
//! [`CacheGeometry`]; no data bytes and no dirty state are modelled, only
//! which block occupies each line and when it was last used.
//!
//! Lookup is split from policy: [`CacheStore::probe`] classifies a tag against
//! one set, and the access processor decides what to fill or evict.

/// Cache replacement policy implementations (LRU).
pub mod policies;

use crate::config::CacheGeometry;

/// One cache line: validity, the tag it holds, and its last-use stamp.
///
/// A `last_used` of 0 means the line has never been populated; real accesses
/// are always stamped with a clock value of at least 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Line {
    /// Whether the line holds a block.
    pub valid: bool,
    /// Tag of the held block.
    pub tag: u64,
    /// Logical time of the most recent access that touched this line.
    pub last_used: u64,
}

/// Result of looking a tag up in one set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// A valid line holds the tag.
    Hit(usize),
    /// An invalid line carries the tag (a stale slot); it can be revalidated in place.
    MissReusable(usize),
    /// No line carries the tag.
    MissNoMatch,
}

/// The line array of a set-associative cache.
#[derive(Clone, Debug)]
pub struct CacheStore {
    lines: Vec<Line>,
    num_sets: usize,
    ways: usize,
}

impl CacheStore {
    /// Allocates a store for `geometry` with every line invalid, tag 0, stamp 0.
    pub fn new(geometry: &CacheGeometry) -> Self {
        Self {
            lines: vec![Line::default(); geometry.num_lines()],
            num_sets: geometry.num_sets(),
            ways: geometry.ways(),
        }
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Lines per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Returns the lines of set `set`.
    ///
    /// # Panics
    ///
    /// If `set >= num_sets()`. Decoded set indices are masked to the set
    /// count and never exceed it.
    #[inline]
    pub fn set(&self, set: usize) -> &[Line] {
        let base = set * self.ways;
        &self.lines[base..base + self.ways]
    }

    #[inline]
    fn line_mut(&mut self, set: usize, way: usize) -> &mut Line {
        debug_assert!(way < self.ways);
        &mut self.lines[set * self.ways + way]
    }

    /// Classifies `tag` against set `set`.
    ///
    /// Ways are scanned from 0 upward and the first line carrying the tag
    /// decides the outcome, whether or not it is valid.
    pub fn probe(&self, set: usize, tag: u64) -> Probe {
        self.set(set)
            .iter()
            .position(|line| line.tag == tag)
            .map_or(Probe::MissNoMatch, |way| {
                if self.set(set)[way].valid {
                    Probe::Hit(way)
                } else {
                    Probe::MissReusable(way)
                }
            })
    }

    /// Returns the first way of `set` that holds no block, if any.
    pub fn first_empty(&self, set: usize) -> Option<usize> {
        self.set(set).iter().position(|line| !line.valid)
    }

    /// Refreshes the last-use stamp of an existing line.
    #[inline]
    pub fn touch(&mut self, set: usize, way: usize, stamp: u64) {
        self.line_mut(set, way).last_used = stamp;
    }

    /// Installs `tag` in the given line, marking it valid and stamping it.
    #[inline]
    pub fn fill(&mut self, set: usize, way: usize, tag: u64, stamp: u64) {
        *self.line_mut(set, way) = Line {
            valid: true,
            tag,
            last_used: stamp,
        };
    }

    /// Number of valid lines across the whole cache.
    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }

    /// Invalidates every line and clears tags and stamps.
    pub fn clear(&mut self) {
        self.lines.fill(Line::default());
    }
}
