//! Side identification and per-side data storage.
//!
//! ## Side
//!
//! A duel always has exactly two sides. `Side::A` is the side shown first
//! in the wire state vector (turn flag `1`), `Side::B` the other one.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`, used for lives, item boards
//! and escalation counters.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two competing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Both sides in wire order.
    pub const ALL: [Side; 2] = [Side::A, Side::B];

    /// Get the raw side index (A = 0, B = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Turn flag used by the wire protocol: 1 for A, 0 for B.
    #[must_use]
    pub const fn turn_flag(self) -> u8 {
        match self {
            Side::A => 1,
            Side::B => 0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "Side A"),
            Side::B => write!(f, "Side B"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "red" => Ok(Side::A),
            "b" | "blue" => Ok(Side::B),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use buckshot_duel::core::{Side, SideMap};
///
/// let mut lives: SideMap<u32> = SideMap::with_value(4);
/// lives[Side::B] -= 1;
///
/// assert_eq!(lives[Side::A], 4);
/// assert_eq!(lives[Side::B], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::A), factory(Side::B)],
        }
    }

    /// Create a new SideMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new SideMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs in wire order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T: Default> Default for SideMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
