//! Game board: ship placement, fire resolution and sunk detection.
//!
//! The same type serves as a fleet board (holds ships) and as a guesses
//! board (one party's record of its shots at the opponent, never holds ships).
//! Cell states are derived from three masks: ship cells, hits and misses.

use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::common::{BoardError, CellState, Coord, GuessResult, PlacementConflict};
use crate::config::BOARD_SIZE;
use crate::ship::{Mask, Orientation, Ship};

/// Ship geometry proposed for placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub anchor: Coord,
    pub orientation: Orientation,
}

#[derive(Clone, PartialEq, Eq, Default)]
pub struct Board {
    ships: Vec<Ship>,
    ship_map: Mask,
    hits: Mask,
    misses: Mask,
}

impl Board {
    /// An empty board: all water, no ships.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Ships in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Mask of every ship cell.
    pub fn ship_map(&self) -> Mask {
        self.ship_map
    }

    pub fn hits(&self) -> Mask {
        self.hits
    }

    pub fn misses(&self) -> Mask {
        self.misses
    }

    /// Mask of every resolved cell.
    pub fn fired(&self) -> Mask {
        self.hits | self.misses
    }

    fn check_bounds(&self, coord: Coord) -> Result<(), BoardError> {
        if coord.in_bounds(BOARD_SIZE) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds(coord))
        }
    }

    /// State of the cell at `coord`.
    pub fn cell(&self, coord: Coord) -> Result<CellState, BoardError> {
        let (r, c) = (coord.row, coord.col);
        Ok(if self.hits.get(r, c)? {
            CellState::Hit
        } else if self.misses.get(r, c)? {
            CellState::Miss
        } else if self.ship_map.get(r, c)? {
            CellState::ShipPresent
        } else {
            CellState::Water
        })
    }

    /// Whether `coord` is on the board and already resolved.
    pub fn is_fired(&self, coord: Coord) -> bool {
        self.cell(coord).map(|s| s.is_fired()).unwrap_or(false)
    }

    /// Unresolved cells, row-major.
    pub fn unfired(&self) -> Vec<Coord> {
        (!self.fired()).iter_set_bits().map(Coord::from).collect()
    }

    /// The ship occupying `coord`, if any.
    pub fn ship_at(&self, coord: Coord) -> Option<&Ship> {
        self.ships.iter().find(|s| s.contains(coord))
    }

    /// Places `ship`, or rejects it without touching the board.
    pub fn place_ship(&mut self, ship: Ship) -> Result<(), BoardError> {
        if !ship.within_bounds(BOARD_SIZE) {
            log::debug!("placement rejected, out of bounds: {:?}", ship.cells());
            return Err(BoardError::PlacementConflict(PlacementConflict::OutOfBounds));
        }
        if self.ships.iter().any(|s| s.overlaps(&ship)) {
            log::debug!("placement rejected, overlap: {:?}", ship.cells());
            return Err(BoardError::PlacementConflict(PlacementConflict::Overlap));
        }
        let mask = ship.mask()?;
        self.ship_map |= mask;
        log::debug!(
            "placed size {} ship at {} ({:?})",
            ship.size(),
            ship.anchor(),
            ship.orientation()
        );
        self.ships.push(ship);
        Ok(())
    }

    /// Random in-bounds geometry for a ship of `size`. Overlap is not checked,
    /// the caller retries with a fresh sample when placement is rejected.
    pub fn random_placement<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Placement {
        let orientation = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let span = BOARD_SIZE - size.clamp(1, BOARD_SIZE);
        let (max_r, max_c) = match orientation {
            Orientation::Horizontal => (BOARD_SIZE - 1, span),
            Orientation::Vertical => (span, BOARD_SIZE - 1),
        };
        Placement {
            anchor: Coord::new(rng.random_range(0..=max_r), rng.random_range(0..=max_c)),
            orientation,
        }
    }

    /// Resolves a shot against this fleet board.
    ///
    /// A cell that is already `Hit` or `Miss` is rejected with
    /// [`BoardError::RepeatFire`] and nothing changes.
    pub fn receive_fire(&mut self, coord: Coord) -> Result<GuessResult, BoardError> {
        self.check_bounds(coord)?;
        let (r, c) = (coord.row, coord.col);
        if self.hits.get(r, c)? || self.misses.get(r, c)? {
            return Err(BoardError::RepeatFire(coord));
        }
        if !self.ship_map.get(r, c)? {
            self.misses.set(r, c)?;
            log::debug!("shot at {} missed", coord);
            return Ok(GuessResult::Miss);
        }
        self.hits.set(r, c)?;
        let hits = self.hits;
        // ship_map and the ship list are built together, so a ship owns this cell
        let sunk = self
            .ships
            .iter_mut()
            .find(|s| s.contains(coord))
            .and_then(|ship| ship.refresh_destroyed(&hits).then_some(ship.size()));
        match sunk {
            Some(size) => {
                log::info!("size {} ship sunk at {}", size, coord);
                Ok(GuessResult::Sink(size))
            }
            None => {
                log::debug!("shot at {} hit", coord);
                Ok(GuessResult::Hit)
            }
        }
    }

    /// Mirrors a resolved shot onto this guesses board.
    pub fn record_guess(&mut self, coord: Coord, result: GuessResult) -> Result<(), BoardError> {
        self.check_bounds(coord)?;
        if self.is_fired(coord) {
            return Err(BoardError::RepeatFire(coord));
        }
        if result.is_hit() {
            self.hits.set(coord.row, coord.col)?;
        } else {
            self.misses.set(coord.row, coord.col)?;
        }
        Ok(())
    }

    /// `true` when the board has ships and all of them are destroyed.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(|s| s.is_destroyed())
    }

    /// Ships still afloat.
    pub fn ships_remaining(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_destroyed()).count()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  ship_map: {:?},\n  hits: {:?},\n  misses: {:?},\n  ships: {:?}\n}}",
            self.ship_map, self.hits, self.misses, self.ships
        )
    }
}
