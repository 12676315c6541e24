//! Reference cache model.
//!
//! A deliberately naive model that detects empty lines by a zero timestamp
//! instead of the valid flag, and counts accesses per logical access. Used to
//! check that both ways of detecting an unused line classify identically.

use cachesim_core::SimStats;

#[derive(Clone, Copy, Default)]
struct RefLine {
    valid: bool,
    tag: u64,
    lru: u64,
}

/// Timestamp-zero reference model of an `(s, E, b)` LRU cache.
pub struct ReferenceCache {
    sets: Vec<Vec<RefLine>>,
    s: u32,
    b: u32,
    timer: u64,
    pub stats: SimStats,
}

impl ReferenceCache {
    pub fn new(s: u32, e: usize, b: u32) -> Self {
        Self {
            sets: vec![vec![RefLine::default(); e]; 1 << s],
            s,
            b,
            timer: 0,
            stats: SimStats::default(),
        }
    }

    /// Applies one record given as `(op, address)`.
    pub fn apply(&mut self, op: char, address: u64) {
        if !matches!(op, 'L' | 'S' | 'M') {
            return;
        }
        let tag = address >> (self.s + self.b);
        let index = ((address >> self.b) & ((1u64 << self.s) - 1)) as usize;
        self.timer += 1;
        let timer = self.timer;
        let set = &mut self.sets[index];

        let mut done = false;
        for line in set.iter_mut() {
            if line.tag == tag && !done {
                if line.valid {
                    self.stats.hits += 1;
                } else {
                    self.stats.misses += 1;
                    line.valid = true;
                }
                line.lru = timer;
                done = true;
            }
        }
        if !done {
            if let Some(line) = set.iter_mut().find(|l| l.lru == 0) {
                self.stats.misses += 1;
                *line = RefLine { valid: true, tag, lru: timer };
                done = true;
            }
        }
        if !done {
            self.stats.misses += 1;
            self.stats.evictions += 1;
            let mut min = 0;
            for i in 1..set.len() {
                if set[i].lru < set[min].lru {
                    min = i;
                }
            }
            set[min] = RefLine { valid: true, tag, lru: timer };
        }

        if op == 'M' {
            if let Some(line) = set.iter_mut().find(|l| l.tag == tag && l.valid) {
                self.stats.hits += 1;
                line.lru = timer;
            }
        }
    }
}
