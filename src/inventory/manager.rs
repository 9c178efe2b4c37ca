//! Both sides' item boards.

use serde::{Deserialize, Serialize};

use super::board::ItemBoard;
use crate::core::{GameRng, ItemCode, Side, SideMap};

/// Per-side multiset of item tokens, capacity-bounded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    boards: SideMap<ItemBoard>,
}

impl Inventory {
    /// Create empty boards with `capacity` slots per side.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            boards: SideMap::new(|_| ItemBoard::new(capacity)),
        }
    }

    /// Number of matching tokens held by `side`.
    #[must_use]
    pub fn count(&self, side: Side, item: ItemCode) -> usize {
        self.boards[side].count(item)
    }

    /// Total tokens held by `side`.
    #[must_use]
    pub fn total_count(&self, side: Side) -> usize {
        self.boards[side].len()
    }

    /// Counts by code for `side`, in wire order.
    #[must_use]
    pub fn counts(&self, side: Side) -> [u32; 5] {
        self.boards[side].counts()
    }

    /// Grant up to `n` random items to `side`.
    ///
    /// Stops quietly at capacity. Returns the (slot, item) pairs placed.
    pub fn grant(&mut self, side: Side, n: usize, rng: &mut GameRng) -> Vec<(usize, ItemCode)> {
        let board = &mut self.boards[side];
        let n = n.min(board.free());
        let mut placed = Vec::with_capacity(n);
        for _ in 0..n {
            let item = ItemCode::ALL[rng.gen_index(ItemCode::ALL.len())];
            if let Some(slot) = board.place(item) {
                placed.push((slot, item));
            }
        }
        placed
    }

    /// Put a specific item on `side`'s board. Returns the slot, or `None` when full.
    pub fn place(&mut self, side: Side, item: ItemCode) -> Option<usize> {
        self.boards[side].place(item)
    }

    /// Remove one matching token. Returns whether one was removed.
    pub fn consume(&mut self, side: Side, item: ItemCode) -> bool {
        self.take(side, item).is_some()
    }

    /// Remove one matching token, returning the slot it occupied.
    pub fn take(&mut self, side: Side, item: ItemCode) -> Option<usize> {
        self.boards[side].take(item)
    }

    /// A side's board.
    #[must_use]
    pub fn board(&self, side: Side) -> &ItemBoard {
        &self.boards[side]
    }

    /// Empty both boards.
    pub fn clear(&mut self) {
        for (_, board) in self.boards.iter_mut() {
            board.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_respects_capacity() {
        let mut rng = GameRng::new(42);
        let mut inventory = Inventory::new(8);

        let first = inventory.grant(Side::A, 5, &mut rng);
        assert_eq!(first.len(), 5);
        let second = inventory.grant(Side::A, 5, &mut rng);
        assert_eq!(second.len(), 3);
        assert_eq!(inventory.total_count(Side::A), 8);
        assert!(inventory.grant(Side::A, 2, &mut rng).is_empty());
        assert_eq!(inventory.total_count(Side::B), 0);
    }

    #[test]
    fn test_grant_counts_match_placed() {
        let mut rng = GameRng::new(3);
        let mut inventory = Inventory::new(8);
        let placed = inventory.grant(Side::B, 4, &mut rng);

        for item in ItemCode::ALL {
            let expected = placed.iter().filter(|(_, i)| *i == item).count();
            assert_eq!(inventory.count(Side::B, item), expected);
        }
    }

    #[test]
    fn test_consume() {
        let mut inventory = Inventory::new(8);
        inventory.place(Side::A, ItemCode::Cigar);

        assert!(!inventory.consume(Side::B, ItemCode::Cigar));
        assert!(inventory.consume(Side::A, ItemCode::Cigar));
        assert!(!inventory.consume(Side::A, ItemCode::Cigar));
    }

    #[test]
    fn test_clear() {
        let mut rng = GameRng::new(1);
        let mut inventory = Inventory::new(8);
        inventory.grant(Side::A, 3, &mut rng);
        inventory.grant(Side::B, 3, &mut rng);
        inventory.clear();
        assert_eq!(inventory.total_count(Side::A), 0);
        assert_eq!(inventory.total_count(Side::B), 0);
    }
}
