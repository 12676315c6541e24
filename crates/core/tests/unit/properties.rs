//! Property Tests.
//!
//! Invariants checked over randomly generated traces and geometries. Addresses
//! are drawn from a small pool so that hits, conflicts, and evictions all occur.

use cachesim_core::cache::Line;
use cachesim_core::sim::AccessResult;
use cachesim_core::trace::{Operation, TraceRecord};
use cachesim_core::{SimStats, Simulator};
use proptest::prelude::*;

use crate::common::{self, reference::ReferenceCache};

fn op() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::Instruction),
        Just(Operation::Load),
        Just(Operation::Store),
        Just(Operation::Modify),
        Just(Operation::Unknown('X')),
    ]
}

fn records() -> impl Strategy<Value = Vec<TraceRecord>> {
    prop::collection::vec(
        (op(), 0u64..512, 1u32..9).prop_map(|(op, addr, size)| TraceRecord::new(op, addr, size)),
        0..200,
    )
}

/// `(s, E, b)` small enough that the address pool spans several sets and tags.
fn geometry() -> impl Strategy<Value = (u32, usize, u32)> {
    (0u32..4, 1usize..5, 0u32..4)
}

fn replay(s: u32, e: usize, b: u32, trace: &[TraceRecord]) -> Simulator {
    let mut sim = Simulator::new(common::geometry(s, e, b));
    for record in trace {
        let _ = sim.step(record);
    }
    sim
}

proptest! {
    #[test]
    fn accesses_balance_record_counts((s, e, b) in geometry(), trace in records()) {
        let sim = replay(s, e, b, &trace);
        let expected: u64 = trace.iter().map(|r| r.op.access_count()).sum();
        prop_assert_eq!(sim.stats().accesses(), expected);
        prop_assert!(sim.stats().evictions <= sim.stats().misses);
    }

    #[test]
    fn every_modify_ends_in_a_hit((s, e, b) in geometry(), trace in records()) {
        let mut sim = Simulator::new(common::geometry(s, e, b));
        for record in &trace {
            let before = sim.stats();
            let outcome = sim.step(record);
            let after = sim.stats();
            match record.op {
                Operation::Modify => {
                    let outcome = outcome.unwrap();
                    prop_assert!(outcome.trailing_hit);
                    let first_hit = u64::from(outcome.result.is_hit());
                    prop_assert_eq!(after.hits - before.hits, 1 + first_hit);
                }
                Operation::Load | Operation::Store => {
                    prop_assert!(!outcome.unwrap().trailing_hit);
                }
                Operation::Instruction | Operation::Unknown(_) => {
                    prop_assert!(outcome.is_none());
                    prop_assert_eq!(before, after);
                }
            }
        }
    }

    #[test]
    fn evictions_only_from_full_sets_and_take_the_oldest(
        (s, e, b) in geometry(),
        trace in records(),
    ) {
        let mut sim = Simulator::new(common::geometry(s, e, b));
        for record in &trace {
            if !record.op.is_data_access() {
                continue;
            }
            let fields = sim.geometry().decode(record.address);
            let before: Vec<Line> = sim.state().cache.set(fields.set_index).to_vec();
            let outcome = sim.step(record).unwrap();

            if outcome.result == AccessResult::MissEviction {
                prop_assert!(before.iter().all(|l| l.valid));
                let mut tags: Vec<u64> = before.iter().map(|l| l.tag).collect();
                tags.sort_unstable();
                tags.dedup();
                prop_assert_eq!(tags.len(), e);

                let after = sim.state().cache.set(fields.set_index);
                let victim = after
                    .iter()
                    .zip(&before)
                    .position(|(a, b)| a.tag != b.tag)
                    .unwrap();
                let oldest = before.iter().map(|l| l.last_used).min().unwrap();
                prop_assert_eq!(before[victim].last_used, oldest);
                let first_oldest = before.iter().position(|l| l.last_used == oldest).unwrap();
                prop_assert_eq!(victim, first_oldest);
            }
        }
    }

    #[test]
    fn valid_tags_are_unique_and_stamps_bounded((s, e, b) in geometry(), trace in records()) {
        let sim = replay(s, e, b, &trace);
        let cache = &sim.state().cache;
        for set in 0..cache.num_sets() {
            let mut tags: Vec<u64> = cache.set(set).iter().filter(|l| l.valid).map(|l| l.tag).collect();
            let n = tags.len();
            tags.sort_unstable();
            tags.dedup();
            prop_assert_eq!(tags.len(), n);
            for line in cache.set(set) {
                prop_assert!(line.last_used <= sim.clock());
                prop_assert_eq!(line.valid, line.last_used != 0);
            }
        }
    }

    #[test]
    fn replay_is_deterministic((s, e, b) in geometry(), trace in records()) {
        let first = replay(s, e, b, &trace).stats();
        let second = replay(s, e, b, &trace).stats();
        prop_assert_eq!(first, second);

        let mut sim = replay(s, e, b, &trace);
        sim.reset();
        for record in &trace {
            let _ = sim.step(record);
        }
        prop_assert_eq!(sim.stats(), first);
    }

    /// Detecting unused lines by the valid flag classifies exactly like the
    /// timestamp-zero rule.
    #[test]
    fn valid_flag_matches_timestamp_reference((s, e, b) in geometry(), trace in records()) {
        let sim = replay(s, e, b, &trace);
        let mut reference = ReferenceCache::new(s, e, b);
        for record in &trace {
            reference.apply(record.op.as_char(), record.address.val());
        }
        prop_assert_eq!(sim.stats(), reference.stats);
    }
}

#[test]
fn empty_trace_yields_zero_counts() {
    let sim = replay(2, 2, 2, &[]);
    assert_eq!(sim.stats(), SimStats::default());
    assert_eq!(sim.clock(), 0);
}
