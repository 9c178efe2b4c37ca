//! The chamber deck: an ordered stack of live and blank shells.
//!
//! Shells are drawn from the top of the stack (the last one pushed), and
//! the live/blank counters always match the remaining contents.

use serde::{Deserialize, Serialize};

use crate::core::{DuelConfig, DuelError, GameRng, Result};

/// One chamber outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shell {
    Live,
    Blank,
}

impl Shell {
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Shell::Live)
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shell::Live => f.write_str("live"),
            Shell::Blank => f.write_str("blank"),
        }
    }
}

/// What the side to move knows about the next shell.
///
/// Only ever describes the next draw; any shot, ejection, knife use or new
/// round resets it to `Unknown`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Knowledge {
    KnownBlank,
    KnownLive,
    #[default]
    Unknown,
}

impl Knowledge {
    /// Wire code: 0 = blank, 1 = live, 2 = unknown.
    #[must_use]
    pub const fn wire_code(self) -> u8 {
        match self {
            Knowledge::KnownBlank => 0,
            Knowledge::KnownLive => 1,
            Knowledge::Unknown => 2,
        }
    }

    /// Is the next shell known?
    #[must_use]
    pub const fn is_definite(self) -> bool {
        !matches!(self, Knowledge::Unknown)
    }
}

impl From<Shell> for Knowledge {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Live => Knowledge::KnownLive,
            Shell::Blank => Knowledge::KnownBlank,
        }
    }
}

/// Counts describing a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSnapshot {
    pub live: u32,
    pub blank: u32,
    pub depth: u32,
}

/// Ordered, consumable stack of shells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChamberDeck {
    /// Top of the stack = end of vec.
    shells: Vec<Shell>,
    live: u32,
    blank: u32,
}

impl ChamberDeck {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the deck with a freshly generated round.
    ///
    /// Live and blank counts are drawn independently from the configured
    /// ranges. Each slot is decided by a fair coin until one type's quota
    /// runs out, after which the other type fills the rest.
    pub fn new_round(&mut self, rng: &mut GameRng, config: &DuelConfig) -> DeckSnapshot {
        let live = rng.gen_range(config.live_range.min..=config.live_range.max);
        let blank = rng.gen_range(config.blank_range.min..=config.blank_range.max);

        let mut live_left = live;
        let mut blank_left = blank;
        let mut shells = Vec::with_capacity((live + blank) as usize);

        for _ in 0..live + blank {
            let shell = if live_left == 0 {
                Shell::Blank
            } else if blank_left == 0 || rng.gen_bool(0.5) {
                Shell::Live
            } else {
                Shell::Blank
            };
            match shell {
                Shell::Live => live_left -= 1,
                Shell::Blank => blank_left -= 1,
            }
            shells.push(shell);
        }

        self.shells = shells;
        self.live = live;
        self.blank = blank;
        self.snapshot()
    }

    /// Replace the deck with an explicit sequence. The last element is drawn first.
    pub fn load(&mut self, shells: Vec<Shell>) -> DeckSnapshot {
        self.live = shells.iter().filter(|s| s.is_live()).count() as u32;
        self.blank = shells.len() as u32 - self.live;
        self.shells = shells;
        self.snapshot()
    }

    /// The next shell, without consuming it.
    #[must_use]
    pub fn peek_next(&self) -> Option<Shell> {
        self.shells.last().copied()
    }

    /// Remove and return the next shell.
    pub fn draw_next(&mut self) -> Result<Shell> {
        let shell = self.shells.pop().ok_or(DuelError::DeckEmpty)?;
        match shell {
            Shell::Live => self.live -= 1,
            Shell::Blank => self.blank -= 1,
        }
        Ok(shell)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    /// Remaining shells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shells.len()
    }

    /// Remaining live shells.
    #[must_use]
    pub fn live_count(&self) -> u32 {
        self.live
    }

    /// Remaining blank shells.
    #[must_use]
    pub fn blank_count(&self) -> u32 {
        self.blank
    }

    /// Empty the deck.
    pub fn clear(&mut self) {
        self.shells.clear();
        self.live = 0;
        self.blank = 0;
    }

    #[must_use]
    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            live: self.live,
            blank: self.blank,
            depth: self.shells.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_counts() {
        let mut rng = GameRng::new(42);
        let config = DuelConfig::default();
        let mut deck = ChamberDeck::new();

        for _ in 0..200 {
            let snap = deck.new_round(&mut rng, &config);
            assert!((1..=4).contains(&snap.live));
            assert!((1..=4).contains(&snap.blank));
            assert_eq!(snap.depth, snap.live + snap.blank);
            assert_eq!(deck.len() as u32, snap.depth);
        }
    }

    #[test]
    fn test_new_round_replaces_previous() {
        let mut rng = GameRng::new(1);
        let config = DuelConfig::default().with_live_range(1, 1).with_blank_range(1, 1);
        let mut deck = ChamberDeck::new();
        deck.load(vec![Shell::Live; 6]);

        let snap = deck.new_round(&mut rng, &config);
        assert_eq!(snap, DeckSnapshot { live: 1, blank: 1, depth: 2 });
    }

    #[test]
    fn test_forced_placement_when_quota_exhausted() {
        let mut rng = GameRng::new(9);
        let config = DuelConfig::default().with_live_range(4, 4).with_blank_range(1, 1);
        let mut deck = ChamberDeck::new();
        deck.new_round(&mut rng, &config);

        let mut live = 0;
        let mut blank = 0;
        while let Ok(shell) = deck.draw_next() {
            match shell {
                Shell::Live => live += 1,
                Shell::Blank => blank += 1,
            }
        }
        assert_eq!((live, blank), (4, 1));
    }

    #[test]
    fn test_draw_is_stack_order() {
        let mut deck = ChamberDeck::new();
        deck.load(vec![Shell::Blank, Shell::Blank, Shell::Live]);

        assert_eq!(deck.live_count(), 1);
        assert_eq!(deck.blank_count(), 2);
        assert_eq!(deck.draw_next(), Ok(Shell::Live));
        assert_eq!(deck.live_count(), 0);
        assert_eq!(deck.draw_next(), Ok(Shell::Blank));
        assert_eq!(deck.blank_count(), 1);
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut deck = ChamberDeck::new();
        deck.load(vec![Shell::Live, Shell::Blank]);

        assert_eq!(deck.peek_next(), Some(Shell::Blank));
        assert_eq!(deck.peek_next(), Some(Shell::Blank));
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_empty_deck() {
        let mut deck = ChamberDeck::new();
        assert!(deck.is_empty());
        assert_eq!(deck.peek_next(), None);
        assert_eq!(deck.draw_next(), Err(DuelError::DeckEmpty));
    }

    #[test]
    fn test_clear() {
        let mut deck = ChamberDeck::new();
        deck.load(vec![Shell::Live, Shell::Blank]);
        deck.clear();
        assert_eq!(deck.snapshot(), DeckSnapshot { live: 0, blank: 0, depth: 0 });
    }

    #[test]
    fn test_knowledge_codes() {
        assert_eq!(Knowledge::KnownBlank.wire_code(), 0);
        assert_eq!(Knowledge::KnownLive.wire_code(), 1);
        assert_eq!(Knowledge::Unknown.wire_code(), 2);
        assert_eq!(Knowledge::from(Shell::Live), Knowledge::KnownLive);
        assert!(!Knowledge::default().is_definite());
    }
}
