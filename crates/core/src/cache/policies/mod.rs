//! Cache Replacement Policies.
//!
//! Implements algorithms for selecting the victim line in a full set.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, by per-line logical timestamp.

/// Least Recently Used replacement policy.
pub mod lru;

pub use lru::LruPolicy;

use super::Line;

/// Trait for cache replacement policies.
///
/// Recency lives in the lines themselves (`last_used`), so a policy is a pure
/// function of the set contents and keeps no state of its own.
pub trait ReplacementPolicy: Send + Sync + std::fmt::Debug {
    /// Selects the way to evict from a full set.
    ///
    /// Called only when every line of `set` is valid and none carries the
    /// requested tag. Each call corresponds to exactly one eviction.
    ///
    /// # Arguments
    ///
    /// * `set` - The lines of the target set, indexed by way.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn select_victim(&self, set: &[Line]) -> usize;

    /// Short policy name for logs and reports.
    fn name(&self) -> &'static str;
}
