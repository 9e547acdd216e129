//! Computer targeting strategies.
//!
//! Three tiers share one contract: pick the next cell to fire at given the
//! shooter's guesses board and the opponent's fleet board. Only [`Oracle`]
//! reads the fleet board's ship cells; the other two look at it for nothing
//! but sunk status, which a fair opponent announces anyway.

use rand::Rng;

use crate::board::Board;
use crate::common::{Coord, GuessResult};
use crate::config::{Difficulty, BOARD_SIZE};

/// Orthogonal step on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Probe order used by [`HuntTarget`] around a first hit.
    pub const PRIORITY: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// `(row, col)` unit step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Neighbour of `from` in this direction, or `None` off the board.
    pub fn step(self, from: Coord) -> Option<Coord> {
        let (dr, dc) = self.delta();
        let row = from.row.checked_add_signed(dr)?;
        let col = from.col.checked_add_signed(dc)?;
        let next = Coord::new(row, col);
        next.in_bounds(BOARD_SIZE).then_some(next)
    }
}

/// Uniformly random unresolved cell of `guesses`.
fn random_unfired<R: Rng + ?Sized>(rng: &mut R, guesses: &Board) -> Option<Coord> {
    let open = guesses.unfired();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.random_range(0..open.len())])
}

/// Easy tier: samples the whole grid until it lands on a cell not yet fired.
#[derive(Debug, Clone, Default)]
pub struct RandomFire;

impl RandomFire {
    pub fn choose_shot<R: Rng + ?Sized>(&mut self, rng: &mut R, guesses: &Board) -> Option<Coord> {
        if guesses.fired().count_ones() == BOARD_SIZE * BOARD_SIZE {
            return None;
        }
        loop {
            let c = Coord::new(
                rng.random_range(0..BOARD_SIZE),
                rng.random_range(0..BOARD_SIZE),
            );
            if !guesses.is_fired(c) {
                return Some(c);
            }
        }
    }
}

/// Phase of the hunt-and-target state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntPhase {
    /// No target; firing at random.
    Search,
    /// Probing the neighbours of the first hit for a direction.
    Orient,
    /// Following a locked direction from the latest hit.
    Extend,
}

/// Medium tier: random search, then walks along a ship once it is hit.
#[derive(Debug, Clone, Default)]
pub struct HuntTarget {
    first_hit: Option<Coord>,
    last_hit: Option<Coord>,
    direction: Option<Direction>,
    /// Direction of the outstanding orient probe.
    probe: Option<Direction>,
}

impl HuntTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> HuntPhase {
        match (self.first_hit, self.direction) {
            (None, _) => HuntPhase::Search,
            (Some(_), None) => HuntPhase::Orient,
            (Some(_), Some(_)) => HuntPhase::Extend,
        }
    }

    pub fn first_hit(&self) -> Option<Coord> {
        self.first_hit
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    fn reset(&mut self) {
        log::trace!("hunt: back to search");
        self.first_hit = None;
        self.last_hit = None;
        self.direction = None;
        self.probe = None;
    }

    pub fn choose_shot<R: Rng + ?Sized>(&mut self, rng: &mut R, guesses: &Board) -> Option<Coord> {
        self.probe = None;
        loop {
            match self.phase() {
                HuntPhase::Search => return random_unfired(rng, guesses),
                HuntPhase::Orient => {
                    let origin = self.first_hit?;
                    let probe = Direction::PRIORITY.into_iter().find_map(|d| {
                        d.step(origin)
                            .filter(|c| !guesses.is_fired(*c))
                            .map(|c| (d, c))
                    });
                    match probe {
                        Some((d, c)) => {
                            self.probe = Some(d);
                            return Some(c);
                        }
                        None => self.reset(),
                    }
                }
                HuntPhase::Extend => {
                    let next = self
                        .direction
                        .zip(self.last_hit)
                        .and_then(|(d, from)| d.step(from))
                        .filter(|c| !guesses.is_fired(*c));
                    match next {
                        Some(c) => return Some(c),
                        None => {
                            log::trace!("hunt: direction {:?} exhausted", self.direction);
                            self.last_hit = None;
                            self.direction = None;
                        }
                    }
                }
            }
        }
    }

    /// Updates the state machine with the outcome of the last chosen shot.
    pub fn observe(&mut self, coord: Coord, result: GuessResult, opponent: &Board) {
        match (self.phase(), result.is_hit()) {
            (HuntPhase::Search, true) => {
                log::trace!("hunt: first hit at {}", coord);
                self.first_hit = Some(coord);
            }
            (HuntPhase::Orient, true) => {
                self.direction = self.probe;
                self.last_hit = Some(coord);
                log::trace!("hunt: locked {:?} at {}", self.direction, coord);
            }
            (HuntPhase::Extend, true) => self.last_hit = Some(coord),
            (HuntPhase::Extend, false) => {
                self.last_hit = None;
                self.direction = None;
            }
            (_, false) => {}
        }
        self.probe = None;
        let target_sunk = self
            .first_hit
            .and_then(|c| opponent.ship_at(c))
            .is_some_and(|s| s.is_destroyed());
        if target_sunk {
            self.reset();
        }
    }
}

/// Hard tier: fires at the first ship cell, row-major, it has not hit yet.
#[derive(Debug, Clone, Default)]
pub struct Oracle;

impl Oracle {
    pub fn choose_shot(&mut self, guesses: &Board, opponent: &Board) -> Option<Coord> {
        (opponent.ship_map() & !guesses.hits())
            .first_set()
            .map(Coord::from)
    }
}

/// One targeting tier, selected at match setup.
#[derive(Debug, Clone)]
pub enum Strategy {
    Random(RandomFire),
    HuntTarget(HuntTarget),
    Oracle(Oracle),
}

impl Strategy {
    pub fn new(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Strategy::Random(RandomFire),
            Difficulty::Medium => Strategy::HuntTarget(HuntTarget::new()),
            Difficulty::Hard => Strategy::Oracle(Oracle),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        match self {
            Strategy::Random(_) => Difficulty::Easy,
            Strategy::HuntTarget(_) => Difficulty::Medium,
            Strategy::Oracle(_) => Difficulty::Hard,
        }
    }

    /// Next cell to fire at, or `None` when nothing is left to shoot.
    pub fn choose_shot<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        guesses: &Board,
        opponent: &Board,
    ) -> Option<Coord> {
        match self {
            Strategy::Random(s) => s.choose_shot(rng, guesses),
            Strategy::HuntTarget(s) => s.choose_shot(rng, guesses),
            Strategy::Oracle(s) => s.choose_shot(guesses, opponent),
        }
    }

    pub fn observe(&mut self, coord: Coord, result: GuessResult, opponent: &Board) {
        if let Strategy::HuntTarget(s) = self {
            s.observe(coord, result, opponent);
        }
    }
}
