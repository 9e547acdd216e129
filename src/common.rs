//! Common types: coordinates, cell states, shot results and engine errors.

use core::fmt;

use crate::bitboard::BitBoardError;

/// A `(row, col)` position on a board. Rows and columns start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether the coordinate lies in `[0, size)²`.
    pub fn in_bounds(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord { row, col }
    }
}

/// Renders as column letter and 1-based row, e.g. `B3` for `(2, 1)`.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = u8::try_from(self.col).ok().and_then(|c| b'A'.checked_add(c));
        match (letter, self.row.checked_add(1)) {
            (Some(letter), Some(number)) if letter.is_ascii_uppercase() => {
                write!(f, "{}{}", letter as char, number)
            }
            _ => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Water,
    /// Occupied and not yet fired upon. Only appears on a fleet board.
    ShipPresent,
    Hit,
    Miss,
}

impl CellState {
    /// `Hit` and `Miss` are terminal.
    pub fn is_fired(&self) -> bool {
        matches!(self, CellState::Hit | CellState::Miss)
    }
}

/// Result of a resolved shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GuessResult {
    /// Hit a ship that is still afloat.
    Hit,
    Miss,
    /// Hit the last intact cell of a ship, carrying the ship's size.
    Sink(usize),
}

impl GuessResult {
    /// `Sink` counts as a hit.
    pub fn is_hit(&self) -> bool {
        !matches!(self, GuessResult::Miss)
    }
}

/// Why a ship could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementConflict {
    /// Part of the ship falls outside the board.
    OutOfBounds,
    /// The ship shares a cell with one already placed.
    Overlap,
}

/// Errors returned by ship and board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinate outside the board.
    OutOfBounds(Coord),
    /// Ship rejected at placement; the board is unchanged.
    PlacementConflict(PlacementConflict),
    /// Cell was already resolved as a hit or miss.
    RepeatFire(Coord),
    /// Ship size outside `[MIN_SHIP_SIZE, MAX_SHIP_SIZE]`.
    InvalidShipSize(usize),
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        match err {
            BitBoardError::IndexOutOfBounds { row, col } => {
                BoardError::OutOfBounds(Coord::new(row, col))
            }
        }
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfBounds(c) => write!(f, "{} is off the board", c),
            BoardError::PlacementConflict(PlacementConflict::OutOfBounds) => {
                write!(f, "Ship cannot be placed. It exceeds the board limits.")
            }
            BoardError::PlacementConflict(PlacementConflict::Overlap) => write!(
                f,
                "Ship overlaps with another ship. Choose a different location."
            ),
            BoardError::RepeatFire(c) => write!(f, "{} has already been fired upon", c),
            BoardError::InvalidShipSize(n) => write!(f, "invalid ship size {}", n),
        }
    }
}

/// Fatal setup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Fleet size outside `[MIN_FLEET, MAX_FLEET]`.
    FleetSize(usize),
    /// A board finished setup without ships.
    EmptyFleet,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FleetSize(n) => write!(
                f,
                "fleet size {} is not allowed (must be {}-{})",
                n,
                crate::config::MIN_FLEET,
                crate::config::MAX_FLEET
            ),
            ConfigError::EmptyFleet => write!(f, "a fleet needs at least one ship"),
        }
    }
}

/// Errors raised by an agent while producing a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerError {
    /// Input source is closed; the agent cannot move.
    InputClosed,
    /// Every cell of the guesses board is already resolved.
    NoTargets,
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerError::InputClosed => write!(f, "input closed"),
            PlayerError::NoTargets => write!(f, "no cells left to fire at"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
#[cfg(feature = "std")]
impl std::error::Error for PlayerError {}
