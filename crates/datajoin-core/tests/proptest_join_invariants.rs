//! Property-based invariant tests for the keyed join.
//!
//! Verifies:
//! 1. Every incoming index appears exactly once, in update or enter
//! 2. Every existing index appears exactly once, in update or exit
//! 3. Update pairs always share a key
//! 4. Joining a key set against itself is a no-op
//! 5. Indexed joins partition by position
//! 6. The incoming order mirrors update and enter

use std::collections::HashSet;

use datajoin_core::join::{Join, Slot};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_unique_keys(max: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::hash_set(-50i64..50, 0..max).prop_map(|set| set.into_iter().collect())
}

fn arb_keys(max: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-20i64..20, 0..max)
}

fn join(existing: &[i64], incoming: &[i64]) -> Join {
    Join::by_key(existing, incoming, |k| Some(*k), |k| *k)
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Partition coverage
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn incoming_indices_are_partitioned(existing in arb_keys(24), incoming in arb_keys(24)) {
        let join = join(&existing, &incoming);
        let mut seen: Vec<usize> = join.update().iter().map(|&(_, i)| i).collect();
        seen.extend_from_slice(join.enter());
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..incoming.len()).collect::<Vec<_>>());
    }

    #[test]
    fn existing_indices_are_partitioned(existing in arb_keys(24), incoming in arb_keys(24)) {
        let join = join(&existing, &incoming);
        let mut seen: Vec<usize> = join.update().iter().map(|&(e, _)| e).collect();
        seen.extend_from_slice(join.exit());
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..existing.len()).collect::<Vec<_>>());
    }

    #[test]
    fn update_pairs_share_keys(existing in arb_keys(24), incoming in arb_keys(24)) {
        let join = join(&existing, &incoming);
        for &(e, i) in join.update() {
            prop_assert_eq!(existing[e], incoming[i]);
        }
    }

    #[test]
    fn unique_keys_match_set_difference(
        existing in arb_unique_keys(24),
        incoming in arb_unique_keys(24),
    ) {
        let join = join(&existing, &incoming);
        let old: HashSet<i64> = existing.iter().copied().collect();
        let new: HashSet<i64> = incoming.iter().copied().collect();
        let entered: HashSet<i64> = join.enter().iter().map(|&i| incoming[i]).collect();
        let exited: HashSet<i64> = join.exit().iter().map(|&e| existing[e]).collect();
        prop_assert_eq!(entered, &new - &old);
        prop_assert_eq!(exited, &old - &new);
        prop_assert_eq!(join.update().len(), old.intersection(&new).count());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Self-join is a no-op
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn self_join_is_noop(keys in arb_unique_keys(32)) {
        let join = join(&keys, &keys);
        prop_assert!(join.is_noop());
        for &(e, i) in join.update() {
            prop_assert_eq!(e, i);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Indexed joins
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn indexed_join_partitions_by_position(existing in 0usize..40, incoming in 0usize..40) {
        let join = Join::by_index(existing, incoming);
        let shared = existing.min(incoming);
        prop_assert_eq!(join.update().len(), shared);
        prop_assert_eq!(join.enter().len(), incoming - shared);
        prop_assert_eq!(join.exit().len(), existing - shared);
        prop_assert!(join.update().iter().all(|&(e, i)| e == i));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Incoming order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn incoming_order_mirrors_partitions(existing in arb_keys(24), incoming in arb_keys(24)) {
        let join = join(&existing, &incoming);
        prop_assert_eq!(join.incoming_len(), incoming.len());
        let mut updates = join.update().iter();
        let mut enters = join.enter().iter();
        for (pos, slot) in join.incoming_order().iter().enumerate() {
            match *slot {
                Slot::Existing(e) => {
                    prop_assert_eq!(updates.next().copied(), Some((e, pos)));
                }
                Slot::Entering(i) => {
                    prop_assert_eq!(i, pos);
                    prop_assert_eq!(enters.next().copied(), Some(pos));
                }
            }
        }
        prop_assert!(updates.next().is_none());
        prop_assert!(enters.next().is_none());
    }
}
