//! Least Recently Used (LRU) Replacement Policy.
//!
//! Evicts the line whose `last_used` stamp is smallest. Stamps come from a
//! strictly increasing logical clock, so the smallest stamp is the line that
//! has gone longest without an access.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()`: O(W) where W is the number of ways
//! - **Space Complexity:** O(1) beyond the per-line stamps already held by the store
//! - **Best Case:** Working sets that fit within the associativity
//! - **Worst Case:** Cyclic scans one block larger than the set (every access evicts)

use super::ReplacementPolicy;
use crate::cache::Line;

/// LRU policy driven by per-line timestamps.
#[derive(Clone, Copy, Debug, Default)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Returns the way with the minimum stamp.
    ///
    /// Ties go to the lowest way: the running minimum is only replaced by a
    /// strictly smaller stamp.
    fn select_victim(&self, set: &[Line]) -> usize {
        let mut victim = 0;
        for (way, line) in set.iter().enumerate().skip(1) {
            if line.last_used < set[victim].last_used {
                victim = way;
            }
        }
        victim
    }

    fn name(&self) -> &'static str {
        "lru"
    }
}
