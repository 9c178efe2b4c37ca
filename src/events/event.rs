//! Duel events.
//!
//! Events describe what happened while an action resolved. The duel
//! publishes them on its `EventBus`; presentation layers (a board renderer,
//! a log sink, a recorder) subscribe to the kinds they care about. The
//! simulation never reads events back.

use serde::{Deserialize, Serialize};

use crate::chamber::Shell;
use crate::core::{ItemCode, Side};

/// Coarse event classification, used for subscription filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Round,
    Items,
    Shot,
    Turn,
    Status,
    Match,
}

/// Something that happened during the duel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelEvent {
    /// A new chamber was loaded.
    RoundStarted { round: u32, live: u32, blank: u32 },

    /// Items were placed on a side's board.
    ItemsGranted {
        side: Side,
        items: Vec<(usize, ItemCode)>,
    },

    /// A side used up an item token.
    ItemConsumed {
        side: Side,
        item: ItemCode,
        slot: usize,
    },

    ShotFired {
        shooter: Side,
        target: Side,
        shell: Shell,
        damage: u32,
    },

    /// An energy drink ejected the next shell.
    ShellEjected { side: Side, shell: Shell },

    /// A magnifying glass revealed the next shell.
    ShellInspected { side: Side, shell: Shell },

    Healed { side: Side, lives: u32 },

    Handcuffed { side: Side },

    /// A handcuffed side lost its turn; the flag was cleared.
    HandcuffsSkipped { side: Side },

    /// The next shot deals double damage.
    KnifeReady { side: Side },

    TurnChanged { side: Side },

    MatchOver { winner: Side },

    MatchReset,
}

impl DuelEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            DuelEvent::RoundStarted { .. } => EventKind::Round,
            DuelEvent::ItemsGranted { .. } | DuelEvent::ItemConsumed { .. } => EventKind::Items,
            DuelEvent::ShotFired { .. }
            | DuelEvent::ShellEjected { .. }
            | DuelEvent::ShellInspected { .. } => EventKind::Shot,
            DuelEvent::TurnChanged { .. } | DuelEvent::HandcuffsSkipped { .. } => EventKind::Turn,
            DuelEvent::Healed { .. }
            | DuelEvent::Handcuffed { .. }
            | DuelEvent::KnifeReady { .. } => EventKind::Status,
            DuelEvent::MatchOver { .. } | DuelEvent::MatchReset => EventKind::Match,
        }
    }

    /// The side the event concerns, if any.
    #[must_use]
    pub fn side(&self) -> Option<Side> {
        match self {
            DuelEvent::ItemsGranted { side, .. }
            | DuelEvent::ItemConsumed { side, .. }
            | DuelEvent::ShellEjected { side, .. }
            | DuelEvent::ShellInspected { side, .. }
            | DuelEvent::Healed { side, .. }
            | DuelEvent::Handcuffed { side }
            | DuelEvent::HandcuffsSkipped { side }
            | DuelEvent::KnifeReady { side }
            | DuelEvent::TurnChanged { side } => Some(*side),
            DuelEvent::ShotFired { shooter, .. } => Some(*shooter),
            DuelEvent::MatchOver { winner } => Some(*winner),
            DuelEvent::RoundStarted { .. } | DuelEvent::MatchReset => None,
        }
    }
}

impl std::fmt::Display for DuelEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuelEvent::RoundStarted { round, live, blank } => {
                write!(f, "round {round}: {live} live, {blank} blank")
            }
            DuelEvent::ItemsGranted { side, items } => {
                write!(f, "{side} received {} item(s)", items.len())
            }
            DuelEvent::ItemConsumed { side, item, slot } => {
                write!(f, "{side} used {item} from slot {slot}")
            }
            DuelEvent::ShotFired {
                shooter,
                target,
                shell,
                damage,
            } => {
                if shooter == target {
                    write!(f, "{shooter} shot self: {shell} (damage {damage})")
                } else {
                    write!(f, "{shooter} shot {target}: {shell} (damage {damage})")
                }
            }
            DuelEvent::ShellEjected { side, shell } => write!(f, "{side} ejected a {shell} shell"),
            DuelEvent::ShellInspected { side, .. } => write!(f, "{side} inspected the chamber"),
            DuelEvent::Healed { side, lives } => write!(f, "{side} healed to {lives}"),
            DuelEvent::Handcuffed { side } => write!(f, "{side} is handcuffed"),
            DuelEvent::HandcuffsSkipped { side } => write!(f, "{side} skips a turn"),
            DuelEvent::KnifeReady { side } => write!(f, "{side} sawed off the barrel"),
            DuelEvent::TurnChanged { side } => write!(f, "{side} to move"),
            DuelEvent::MatchOver { winner } => write!(f, "{winner} wins"),
            DuelEvent::MatchReset => f.write_str("match reset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        let event = DuelEvent::ShotFired {
            shooter: Side::A,
            target: Side::B,
            shell: Shell::Live,
            damage: 1,
        };
        assert_eq!(event.kind(), EventKind::Shot);
        assert_eq!(event.side(), Some(Side::A));
        assert_eq!(DuelEvent::MatchReset.kind(), EventKind::Match);
        assert_eq!(DuelEvent::MatchReset.side(), None);
    }

    #[test]
    fn test_display() {
        let event = DuelEvent::ShotFired {
            shooter: Side::B,
            target: Side::B,
            shell: Shell::Blank,
            damage: 1,
        };
        assert_eq!(event.to_string(), "Side B shot self: blank (damage 1)");
    }
}
