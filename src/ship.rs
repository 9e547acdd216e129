//! Linear ships: geometry fixed at construction plus a cached destroyed flag.

use alloc::vec::Vec;

use crate::bitboard::BitBoard;
use crate::common::{BoardError, Coord, PlacementConflict};
use crate::config::{BOARD_SIZE, MAX_SHIP_SIZE, MIN_SHIP_SIZE};

/// Cell mask sized for the game board.
pub type Mask = BitBoard<u128, BOARD_SIZE>;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends along increasing column.
    Horizontal,
    /// Extends along increasing row.
    Vertical,
}

/// A `1×size` ship anchored at its first cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    size: usize,
    orientation: Orientation,
    anchor: Coord,
    cells: Vec<Coord>,
    destroyed: bool,
}

impl Ship {
    /// Builds a ship of `size` cells starting at `anchor`.
    ///
    /// Only the size is checked here, plus cells that cannot be addressed at
    /// all. Bounds and overlap are checked by
    /// [`Board::place_ship`](crate::Board::place_ship).
    pub fn new(size: usize, anchor: Coord, orientation: Orientation) -> Result<Self, BoardError> {
        if !(MIN_SHIP_SIZE..=MAX_SHIP_SIZE).contains(&size) {
            return Err(BoardError::InvalidShipSize(size));
        }
        let cells = (0..size)
            .map(|i| match orientation {
                Orientation::Horizontal => {
                    anchor.col.checked_add(i).map(|col| Coord::new(anchor.row, col))
                }
                Orientation::Vertical => {
                    anchor.row.checked_add(i).map(|row| Coord::new(row, anchor.col))
                }
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(BoardError::PlacementConflict(PlacementConflict::OutOfBounds))?;
        Ok(Ship {
            size,
            orientation,
            anchor,
            cells,
            destroyed: false,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn anchor(&self) -> Coord {
        self.anchor
    }

    /// Occupied cells, starting at the anchor.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    /// Whether every cell lies in `[0, board_size)²`.
    pub fn within_bounds(&self, board_size: usize) -> bool {
        self.cells.iter().all(|c| c.in_bounds(board_size))
    }

    /// Whether the two ships share a cell.
    pub fn overlaps(&self, other: &Ship) -> bool {
        self.cells.iter().any(|c| other.contains(*c))
    }

    /// Occupancy mask. Fails if any cell is off the board.
    pub fn mask(&self) -> Result<Mask, BoardError> {
        Ok(Mask::from_cells(self.cells.iter().map(|c| (c.row, c.col)))?)
    }

    /// Whether every cell is in `hits`.
    pub fn is_sunk_on(&self, hits: &Mask) -> bool {
        self.cells
            .iter()
            .all(|c| hits.get(c.row, c.col).unwrap_or(false))
    }

    /// Destroyed flag as of the last [`refresh_destroyed`](Self::refresh_destroyed).
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Recomputes the destroyed flag from `hits`. Returns `true` when this call
    /// flipped the ship from afloat to destroyed.
    pub(crate) fn refresh_destroyed(&mut self, hits: &Mask) -> bool {
        let was = self.destroyed;
        self.destroyed = self.is_sunk_on(hits);
        self.destroyed && !was
    }
}
