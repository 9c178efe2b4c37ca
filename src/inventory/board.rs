//! A single side's item board: a fixed number of slots, each empty or
//! holding one item token.
//!
//! Slot positions matter only to presentation (where a token is shown and
//! which one despawns); the rules only ever look at counts by code.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ItemCode;

/// Fixed-capacity item slots for one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBoard {
    slots: SmallVec<[Option<ItemCode>; 8]>,
}

impl ItemBoard {
    /// Create an empty board with `capacity` slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: SmallVec::from_elem(None, capacity),
        }
    }

    /// Total number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of free slots.
    #[must_use]
    pub fn free(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Number of tokens matching `item`.
    #[must_use]
    pub fn count(&self, item: ItemCode) -> usize {
        self.slots.iter().filter(|s| **s == Some(item)).count()
    }

    /// Counts for every item code, in wire order.
    #[must_use]
    pub fn counts(&self) -> [u32; 5] {
        let mut counts = [0u32; 5];
        for item in self.slots.iter().flatten() {
            counts[item.index()] += 1;
        }
        counts
    }

    /// Put `item` in the first free slot. Returns the slot, or `None` when full.
    pub fn place(&mut self, item: ItemCode) -> Option<usize> {
        let slot = self.slots.iter().position(Option::is_none)?;
        self.slots[slot] = Some(item);
        Some(slot)
    }

    /// Remove the first token matching `item`. Returns the slot it occupied.
    pub fn take(&mut self, item: ItemCode) -> Option<usize> {
        let slot = self.slots.iter().position(|s| *s == Some(item))?;
        self.slots[slot] = None;
        Some(slot)
    }

    /// Contents of a slot.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<ItemCode> {
        self.slots.get(index).copied().flatten()
    }

    /// Iterate over (slot, item) for occupied slots.
    pub fn items(&self) -> impl Iterator<Item = (usize, ItemCode)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|item| (i, item)))
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }
}
