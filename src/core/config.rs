//! Duel and session configuration.
//!
//! - `CountRange`: An inclusive `[min, max]` range drawn uniformly
//! - `DuelConfig`: Rules knobs (lives, capacity, deck and grant sizes)
//! - `SessionConfig`: Agent connection and simulation loop settings
//!
//! Both configs deserialize from JSON so the session binary can load them
//! from a file; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{DuelError, Result};
use super::side::Side;

/// Inclusive count range, e.g. "1 to 4 live shells".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    /// Create a new range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Does the range contain `value`?
    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Rules configuration for a duel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Maximum (and starting) lives per side.
    pub max_lives: u32,

    /// Item slots per side.
    pub inventory_capacity: usize,

    /// Live shells loaded per round.
    pub live_range: CountRange,

    /// Blank shells loaded per round.
    pub blank_range: CountRange,

    /// Items granted to each side per round.
    pub grant_range: CountRange,

    /// Side to move when a match starts.
    pub first_turn: Side,

    /// Start round 1 immediately on construction and reset.
    pub auto_start: bool,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            max_lives: 4,
            inventory_capacity: 8,
            live_range: CountRange::new(1, 4),
            blank_range: CountRange::new(1, 4),
            grant_range: CountRange::new(2, 4),
            first_turn: Side::A,
            auto_start: false,
        }
    }
}

impl DuelConfig {
    /// Create a config with default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum lives.
    #[must_use]
    pub fn with_max_lives(mut self, lives: u32) -> Self {
        self.max_lives = lives;
        self
    }

    /// Set item slots per side.
    #[must_use]
    pub fn with_inventory_capacity(mut self, capacity: usize) -> Self {
        self.inventory_capacity = capacity;
        self
    }

    /// Set live shell range.
    #[must_use]
    pub fn with_live_range(mut self, min: u32, max: u32) -> Self {
        self.live_range = CountRange::new(min, max);
        self
    }

    /// Set blank shell range.
    #[must_use]
    pub fn with_blank_range(mut self, min: u32, max: u32) -> Self {
        self.blank_range = CountRange::new(min, max);
        self
    }

    /// Set per-round item grant range.
    #[must_use]
    pub fn with_grant_range(mut self, min: u32, max: u32) -> Self {
        self.grant_range = CountRange::new(min, max);
        self
    }

    /// Set the side that moves first.
    #[must_use]
    pub fn with_first_turn(mut self, side: Side) -> Self {
        self.first_turn = side;
        self
    }

    /// Start rounds automatically on construction and reset.
    #[must_use]
    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Check the config for values the rules cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_lives == 0 {
            return Err(DuelError::InvalidConfig("max_lives must be at least 1".into()));
        }
        if self.inventory_capacity == 0 {
            return Err(DuelError::InvalidConfig(
                "inventory_capacity must be at least 1".into(),
            ));
        }
        for (name, range) in [("live_range", self.live_range), ("blank_range", self.blank_range)] {
            if range.min == 0 || range.min > range.max {
                return Err(DuelError::InvalidConfig(format!(
                    "{name} must satisfy 1 <= min <= max, got {}..={}",
                    range.min, range.max
                )));
            }
        }
        if self.grant_range.min > self.grant_range.max {
            return Err(DuelError::InvalidConfig(format!(
                "grant_range min {} exceeds max {}",
                self.grant_range.min, self.grant_range.max
            )));
        }
        Ok(())
    }
}

/// Agent connection and simulation loop settings.
///
/// Durations are stored in milliseconds to keep the JSON form readable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Agent host to connect to.
    pub host: String,

    /// Agent port to connect to.
    pub port: u16,

    /// Connect timeout.
    pub connect_timeout_ms: u64,

    /// Socket read/write timeout.
    pub io_timeout_ms: u64,

    /// Minimum delay between reconnect attempts.
    pub reconnect_interval_ms: u64,

    /// Sleep between simulation ticks.
    pub tick_interval_ms: u64,

    /// Bound on waiting for socket threads at shutdown.
    pub join_timeout_ms: u64,

    /// Sides whose moves come from the agent.
    pub agent_sides: Vec<Side>,

    /// Frame messages with `\n` instead of one message per read.
    pub line_terminated: bool,

    /// Stop the loop after this many finished matches.
    pub max_matches: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 12345,
            connect_timeout_ms: 5_000,
            io_timeout_ms: 10_000,
            reconnect_interval_ms: 2_000,
            tick_interval_ms: 20,
            join_timeout_ms: 1_000,
            agent_sides: vec![Side::B],
            line_terminated: false,
            max_matches: None,
        }
    }
}

impl SessionConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the agent address.
    #[must_use]
    pub fn with_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Set which sides the agent controls.
    #[must_use]
    pub fn with_agent_sides(mut self, sides: Vec<Side>) -> Self {
        self.agent_sides = sides;
        self
    }

    /// Set the reconnect interval.
    #[must_use]
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set the simulation tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Use newline framing.
    #[must_use]
    pub fn with_line_terminated(mut self, line_terminated: bool) -> Self {
        self.line_terminated = line_terminated;
        self
    }

    /// Stop after a number of finished matches.
    #[must_use]
    pub fn with_max_matches(mut self, matches: u32) -> Self {
        self.max_matches = Some(matches);
        self
    }

    /// `host:port` string.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    #[must_use]
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }

    /// Is `side` driven by the agent?
    #[must_use]
    pub fn is_agent_side(&self, side: Side) -> bool {
        self.agent_sides.contains(&side)
    }
}
