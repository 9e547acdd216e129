//! Game constants and match configuration.

use alloc::string::String;
use core::ops::RangeInclusive;

use crate::common::ConfigError;

pub const BOARD_SIZE: usize = 10;
pub const MIN_SHIP_SIZE: usize = 1;
pub const MAX_SHIP_SIZE: usize = 5;

/// Smallest and largest number of ships per fleet. A fleet of `n` ships holds
/// one ship of each size `1..=n`.
pub const MIN_FLEET: usize = 1;
pub const MAX_FLEET: usize = 5;

/// Rejected placements tolerated per ship before setup is abandoned.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1_000;
/// Rejected shots tolerated per turn before the match is abandoned.
pub const MAX_SHOT_ATTEMPTS: usize = 1_000;

/// Ship sizes of a fleet of `fleet_size` ships, in placement order.
pub fn fleet_sizes(fleet_size: usize) -> RangeInclusive<usize> {
    MIN_SHIP_SIZE..=fleet_size
}

/// Checks that `fleet_size` is within `[MIN_FLEET, MAX_FLEET]`.
pub fn validate_fleet_size(fleet_size: usize) -> Result<usize, ConfigError> {
    if (MIN_FLEET..=MAX_FLEET).contains(&fleet_size) {
        Ok(fleet_size)
    } else {
        Err(ConfigError::FleetSize(fleet_size))
    }
}

/// Targeting tier of a computer-controlled seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize, clap::ValueEnum))]
pub enum Difficulty {
    /// Uniformly random shots.
    Easy,
    /// Hunt-and-target.
    Medium,
    /// Reads the opponent's fleet.
    Hard,
}

/// Who controls a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Human,
    Ai(Difficulty),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatConfig {
    pub name: String,
    pub seat: Seat,
}

/// Everything needed to set up one match. `seats[0]` moves first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub fleet_size: usize,
    pub seats: [SeatConfig; 2],
    /// Fixes every random source; seat `i` is seeded with `seed + i`.
    pub seed: Option<u64>,
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_fleet_size(self.fleet_size).map(|_| ())
    }

    /// Seed for seat `index`, if the match is seeded.
    pub fn seat_seed(&self, index: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(index as u64))
    }
}
