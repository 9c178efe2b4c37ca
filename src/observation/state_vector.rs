//! Fixed-order state vector shared by the wire protocol and the Python env.
//!
//! Field order:
//!
//! | # | Field |
//! |---|---|
//! | 0 | turn flag (1 = Side A to move, 0 otherwise) |
//! | 1 | chamber depth |
//! | 2 | live shells left |
//! | 3 | blank shells left |
//! | 4, 5 | lives A, lives B |
//! | 6..11 | item counts A (ED, MG, C, K, HC) |
//! | 11..16 | item counts B |
//! | 16 | gun damage |
//! | 17 | knowledge (0 blank, 1 live, 2 unknown) |
//! | 18 | B handcuffed |
//! | 19 | A handcuffed |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Side;
use crate::duel::Duel;

/// Number of fields in the state vector.
pub const OBSERVATION_LEN: usize = 20;

/// Error parsing a state vector.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ObservationError {
    #[error("expected {OBSERVATION_LEN} fields, got {0}")]
    FieldCount(usize),
    #[error("field {index} is not an integer: {value:?}")]
    BadField { index: usize, value: String },
}

/// Snapshot of everything the agent can observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub turn_flag: u8,
    pub chamber_depth: u32,
    pub live: u32,
    pub blank: u32,
    pub lives: [u32; 2],
    pub items: [[u32; 5]; 2],
    pub gun_damage: u32,
    pub knowledge: u8,
    pub cuffed: [bool; 2],
}

impl Observation {
    /// Capture the current state of `duel`.
    #[must_use]
    pub fn from_duel(duel: &Duel) -> Self {
        let deck = duel.deck().snapshot();
        Self {
            turn_flag: duel.current_turn().map_or(0, Side::turn_flag),
            chamber_depth: deck.depth,
            live: deck.live,
            blank: deck.blank,
            lives: Side::ALL.map(|s| duel.player(s).lives()),
            items: Side::ALL.map(|s| duel.inventory().counts(s)),
            gun_damage: duel.gun().damage(),
            knowledge: duel.knowledge().wire_code(),
            cuffed: Side::ALL.map(|s| duel.player(s).is_handcuffed()),
        }
    }

    /// Integer fields in wire order.
    #[must_use]
    pub fn fields(&self) -> [u32; OBSERVATION_LEN] {
        let mut out = [0u32; OBSERVATION_LEN];
        out[0] = u32::from(self.turn_flag);
        out[1] = self.chamber_depth;
        out[2] = self.live;
        out[3] = self.blank;
        out[4] = self.lives[Side::A.index()];
        out[5] = self.lives[Side::B.index()];
        out[6..11].copy_from_slice(&self.items[Side::A.index()]);
        out[11..16].copy_from_slice(&self.items[Side::B.index()]);
        out[16] = self.gun_damage;
        out[17] = u32::from(self.knowledge);
        // B before A.
        out[18] = u32::from(self.cuffed[Side::B.index()]);
        out[19] = u32::from(self.cuffed[Side::A.index()]);
        out
    }

    /// Comma-joined wire form.
    #[must_use]
    pub fn to_csv(&self) -> String {
        self.fields()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Flat float tensor in wire order.
    #[must_use]
    pub fn to_tensor(&self) -> Vec<f32> {
        self.fields().iter().map(|&v| v as f32).collect()
    }

    /// Parse the wire form produced by `to_csv`.
    pub fn parse_csv(line: &str) -> Result<Self, ObservationError> {
        let parts: Vec<&str> = line.trim().split(',').collect();
        if parts.len() != OBSERVATION_LEN {
            return Err(ObservationError::FieldCount(parts.len()));
        }
        let mut f = [0u32; OBSERVATION_LEN];
        for (index, part) in parts.iter().enumerate() {
            f[index] = part.trim().parse().map_err(|_| ObservationError::BadField {
                index,
                value: (*part).to_string(),
            })?;
        }

        let mut items = [[0u32; 5]; 2];
        items[0].copy_from_slice(&f[6..11]);
        items[1].copy_from_slice(&f[11..16]);
        Ok(Self {
            turn_flag: f[0] as u8,
            chamber_depth: f[1],
            live: f[2],
            blank: f[3],
            lives: [f[4], f[5]],
            items,
            gun_damage: f[16],
            knowledge: f[17] as u8,
            cuffed: [f[19] != 0, f[18] != 0],
        })
    }

    /// Side to move according to the turn flag (flag 0 reads as B).
    #[must_use]
    pub fn side_to_move(&self) -> Side {
        if self.turn_flag == 1 {
            Side::A
        } else {
            Side::B
        }
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_csv())
    }
}
