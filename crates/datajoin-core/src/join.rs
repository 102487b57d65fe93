#![forbid(unsafe_code)]

//! Keyed join between existing items and incoming data.
//!
//! A [`Join`] partitions two collections into three groups:
//!
//! - **update**: an existing item paired with the incoming datum that shares its key
//! - **enter**: incoming data with no existing item
//! - **exit**: existing items with no incoming datum
//!
//! The join only deals in indices, so it is independent of whatever the items
//! are (tree nodes, widgets, rows in a table).
//!
//! # Algorithm
//!
//! 1. Index existing items by key. Unkeyable items and repeated keys go to exit.
//! 2. Walk incoming data in order. A key found in the index is claimed and
//!    becomes an update pair; anything else enters.
//! 3. Unclaimed existing items exit, in their original order.
//!
//! # Usage
//!
//! ```
//! use datajoin_core::join::Join;
//!
//! let existing = ["a", "b", "c"];
//! let incoming = ["c", "d", "a"];
//! let join = Join::by_key(&existing, &incoming, |s| Some(*s), |s| *s);
//!
//! assert_eq!(join.update(), &[(2, 0), (0, 2)]);
//! assert_eq!(join.enter(), &[1]);
//! assert_eq!(join.exit(), &[1]);
//! ```

use std::collections::HashMap;
use std::hash::Hash;

/// How existing items are paired with incoming data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinMode {
    /// Pair by key; order of either side does not matter.
    #[default]
    Keyed,
    /// Pair by position; the n-th item takes the n-th datum.
    Indexed,
}

/// One slot of the incoming order: either an existing item reused or a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Existing item at this index is reused.
    Existing(usize),
    /// Incoming datum at this index needs a new item.
    Entering(usize),
}

/// Result of joining existing items against incoming data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Join {
    /// `(existing_idx, incoming_idx)` pairs, in incoming order.
    update: Vec<(usize, usize)>,
    /// Incoming indices without an existing item, in incoming order.
    enter: Vec<usize>,
    /// Existing indices without a datum, in existing order.
    exit: Vec<usize>,
    /// Per incoming index, where its item comes from.
    slots: Vec<Slot>,
}

impl Join {
    /// Join using `mode`, with the given key extractors for keyed joins.
    pub fn compute<E, I, K>(
        mode: JoinMode,
        existing: &[E],
        incoming: &[I],
        key_existing: impl Fn(&E) -> Option<K>,
        key_incoming: impl Fn(&I) -> K,
    ) -> Self
    where
        K: Hash + Eq,
    {
        match mode {
            JoinMode::Keyed => Self::by_key(existing, incoming, key_existing, key_incoming),
            JoinMode::Indexed => Self::by_index(existing.len(), incoming.len()),
        }
    }

    /// Join by key.
    ///
    /// `key_existing` may return `None` for items that carry no key; those
    /// always exit. When several existing items share a key the first one is
    /// kept and the rest exit. When several incoming data share a key the
    /// first one claims the existing item and the rest enter.
    pub fn by_key<E, I, K>(
        existing: &[E],
        incoming: &[I],
        key_existing: impl Fn(&E) -> Option<K>,
        key_incoming: impl Fn(&I) -> K,
    ) -> Self
    where
        K: Hash + Eq,
    {
        let _span = crate::debug_span!(
            "join_by_key",
            existing = existing.len(),
            incoming = incoming.len()
        );
        let _guard = _span.enter();

        let mut by_key: HashMap<K, usize> = HashMap::with_capacity(existing.len());
        let mut claimed = vec![false; existing.len()];

        for (idx, item) in existing.iter().enumerate() {
            if let Some(key) = key_existing(item) {
                by_key.entry(key).or_insert(idx);
            }
        }

        let mut update = Vec::with_capacity(incoming.len().min(existing.len()));
        let mut enter = Vec::new();
        let mut slots = Vec::with_capacity(incoming.len());

        for (idx, datum) in incoming.iter().enumerate() {
            // Claimed entries are removed so a repeated incoming key enters.
            match by_key.remove(&key_incoming(datum)) {
                Some(existing_idx) => {
                    claimed[existing_idx] = true;
                    update.push((existing_idx, idx));
                    slots.push(Slot::Existing(existing_idx));
                }
                None => {
                    enter.push(idx);
                    slots.push(Slot::Entering(idx));
                }
            }
        }

        let exit: Vec<usize> = claimed
            .iter()
            .enumerate()
            .filter_map(|(idx, &taken)| (!taken).then_some(idx))
            .collect();

        crate::trace!(
            update = update.len(),
            enter = enter.len(),
            exit = exit.len(),
            "keyed join computed"
        );

        Self {
            update,
            enter,
            exit,
            slots,
        }
    }

    /// Join by position.
    ///
    /// The first `min(existing_len, incoming_len)` items update, the remaining
    /// incoming data enter and the remaining existing items exit.
    pub fn by_index(existing_len: usize, incoming_len: usize) -> Self {
        let shared = existing_len.min(incoming_len);
        let update: Vec<(usize, usize)> = (0..shared).map(|i| (i, i)).collect();
        let enter: Vec<usize> = (shared..incoming_len).collect();
        let exit: Vec<usize> = (shared..existing_len).collect();
        let slots = (0..incoming_len)
            .map(|i| {
                if i < shared {
                    Slot::Existing(i)
                } else {
                    Slot::Entering(i)
                }
            })
            .collect();

        crate::trace!(
            update = update.len(),
            enter = enter.len(),
            exit = exit.len(),
            "indexed join computed"
        );

        Self {
            update,
            enter,
            exit,
            slots,
        }
    }

    /// Matched `(existing_idx, incoming_idx)` pairs.
    #[inline]
    pub fn update(&self) -> &[(usize, usize)] {
        &self.update
    }

    /// Incoming indices that need a new item.
    #[inline]
    pub fn enter(&self) -> &[usize] {
        &self.enter
    }

    /// Existing indices that must be removed.
    #[inline]
    pub fn exit(&self) -> &[usize] {
        &self.exit
    }

    /// Source of each incoming position, in incoming order.
    #[inline]
    pub fn incoming_order(&self) -> &[Slot] {
        &self.slots
    }

    /// True when nothing enters or exits.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }

    /// Number of incoming data covered by the join.
    #[inline]
    pub fn incoming_len(&self) -> usize {
        self.slots.len()
    }
}
