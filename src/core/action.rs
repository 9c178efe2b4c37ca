//! Action and item codes.
//!
//! Actions are identified by a one-based code (1..=7). The wire protocol
//! sends zero-based indices, converted with [`ActionType::from_index`].
//! Five of the seven actions use up an item of the matching [`ItemCode`].

use serde::{Deserialize, Serialize};

use super::side::Side;

/// Item tokens a side can hold.
///
/// Declaration order is the order of item counts in the state vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCode {
    EnergyDrink,
    MagnifyingGlass,
    Cigar,
    Knife,
    Handcuffs,
}

impl ItemCode {
    /// All item codes in wire order.
    pub const ALL: [ItemCode; 5] = [
        ItemCode::EnergyDrink,
        ItemCode::MagnifyingGlass,
        ItemCode::Cigar,
        ItemCode::Knife,
        ItemCode::Handcuffs,
    ];

    /// Position in the wire item-count block.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            ItemCode::EnergyDrink => 0,
            ItemCode::MagnifyingGlass => 1,
            ItemCode::Cigar => 2,
            ItemCode::Knife => 3,
            ItemCode::Handcuffs => 4,
        }
    }

    /// Short board label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ItemCode::EnergyDrink => "ED",
            ItemCode::MagnifyingGlass => "MG",
            ItemCode::Cigar => "C",
            ItemCode::Knife => "K",
            ItemCode::Handcuffs => "HC",
        }
    }

    /// The action that uses this item.
    #[must_use]
    pub const fn action(self) -> ActionType {
        match self {
            ItemCode::EnergyDrink => ActionType::Drink,
            ItemCode::MagnifyingGlass => ActionType::MagGlass,
            ItemCode::Cigar => ActionType::Cigar,
            ItemCode::Knife => ActionType::Knife,
            ItemCode::Handcuffs => ActionType::Handcuffs,
        }
    }
}

impl std::fmt::Display for ItemCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The seven actions available to the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ActionType {
    ShootSelf = 1,
    ShootOther = 2,
    Drink = 3,
    MagGlass = 4,
    Cigar = 5,
    Knife = 6,
    Handcuffs = 7,
}

impl ActionType {
    /// All actions in code order.
    pub const ALL: [ActionType; 7] = [
        ActionType::ShootSelf,
        ActionType::ShootOther,
        ActionType::Drink,
        ActionType::MagGlass,
        ActionType::Cigar,
        ActionType::Knife,
        ActionType::Handcuffs,
    ];

    /// Look up an action by its one-based code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.code() == code)
    }

    /// Look up an action by the zero-based index used on the wire.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// One-based action code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Zero-based wire index.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// The item this action consumes, if any.
    #[must_use]
    pub const fn item(self) -> Option<ItemCode> {
        match self {
            ActionType::ShootSelf | ActionType::ShootOther => None,
            ActionType::Drink => Some(ItemCode::EnergyDrink),
            ActionType::MagGlass => Some(ItemCode::MagnifyingGlass),
            ActionType::Cigar => Some(ItemCode::Cigar),
            ActionType::Knife => Some(ItemCode::Knife),
            ActionType::Handcuffs => Some(ItemCode::Handcuffs),
        }
    }

    /// Is this one of the two shots?
    #[must_use]
    pub const fn is_shot(self) -> bool {
        matches!(self, ActionType::ShootSelf | ActionType::ShootOther)
    }

    /// Does resolving this action take a shell from the chamber?
    #[must_use]
    pub const fn draws_shell(self) -> bool {
        matches!(
            self,
            ActionType::ShootSelf | ActionType::ShootOther | ActionType::Drink
        )
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionType::ShootSelf => "Shoot Self",
            ActionType::ShootOther => "Shoot Other",
            ActionType::Drink => "Drink",
            ActionType::MagGlass => "Mag. Glass",
            ActionType::Cigar => "Cigar",
            ActionType::Knife => "Knife",
            ActionType::Handcuffs => "Handcuffs",
        };
        f.write_str(name)
    }
}

/// A recorded action with its outcome, kept in the duel history.
///
/// Used for:
/// - Replay/debugging
/// - Training data export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The side that submitted the action.
    pub side: Side,

    /// Raw one-based action code as submitted (may be out of range).
    pub action_code: u8,

    /// Reward returned for the action.
    pub reward: f32,

    /// Whether the action was accepted.
    pub valid: bool,

    /// Round number the action happened in.
    pub round: u32,

    /// Sequence number within the match.
    pub sequence: u32,
}

impl ActionRecord {
    /// The decoded action, if the code was valid.
    #[must_use]
    pub fn action(&self) -> Option<ActionType> {
        ActionType::from_code(self.action_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_one_based() {
        assert_eq!(ActionType::ShootSelf.code(), 1);
        assert_eq!(ActionType::Handcuffs.code(), 7);
        assert_eq!(ActionType::from_code(3), Some(ActionType::Drink));
        assert_eq!(ActionType::from_code(0), None);
        assert_eq!(ActionType::from_code(8), None);
    }

    #[test]
    fn test_index_is_zero_based() {
        assert_eq!(ActionType::from_index(0), Some(ActionType::ShootSelf));
        assert_eq!(ActionType::from_index(6), Some(ActionType::Handcuffs));
        assert_eq!(ActionType::from_index(7), None);
        assert_eq!(ActionType::Knife.index(), 5);
    }

    #[test]
    fn test_item_mapping() {
        assert_eq!(ActionType::ShootOther.item(), None);
        for item in ItemCode::ALL {
            assert_eq!(item.action().item(), Some(item));
        }
    }

    #[test]
    fn test_item_wire_order() {
        let indices: Vec<_> = ItemCode::ALL.iter().map(|i| i.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(ItemCode::MagnifyingGlass.label(), "MG");
    }

    #[test]
    fn test_action_record_serialization() {
        let record = ActionRecord {
            side: Side::B,
            action_code: 7,
            reward: 7.0,
            valid: true,
            round: 2,
            sequence: 11,
        };

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
        assert_eq!(deserialized.action(), Some(ActionType::Handcuffs));
    }
}
