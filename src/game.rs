//! Match orchestration: setup phase, alternating turns, win detection.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::{
    board::Board,
    common::{BoardError, ConfigError, Coord, GuessResult, PlayerError},
    config::{fleet_sizes, validate_fleet_size, MAX_PLACEMENT_ATTEMPTS, MAX_SHOT_ATTEMPTS},
    player::Player,
    ship::Ship,
};

/// Fires at `coord` on `opponent` and mirrors the result onto `guesses`.
///
/// Out-of-bounds and already-fired cells are rejected before the opponent's
/// board is touched.
pub fn submit_guess(
    guesses: &mut Board,
    opponent: &mut Board,
    coord: Coord,
) -> Result<GuessResult, BoardError> {
    if !coord.in_bounds(guesses.size()) {
        return Err(BoardError::OutOfBounds(coord));
    }
    if guesses.is_fired(coord) {
        return Err(BoardError::RepeatFire(coord));
    }
    let result = opponent.receive_fire(coord)?;
    guesses.record_guess(coord, result)?;
    Ok(result)
}

/// Audio cue requested by the match. Sinks may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Hit,
    Miss,
    Win,
}

/// Notification emitted while a match runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent<'a> {
    ShipPlaced {
        player: &'a str,
        size: usize,
    },
    PlacementRejected {
        player: &'a str,
        size: usize,
        error: BoardError,
    },
    ShotRejected {
        player: &'a str,
        coord: Coord,
        error: BoardError,
    },
    Shot {
        player: &'a str,
        coord: Coord,
        result: GuessResult,
    },
    Won {
        winner: &'a str,
        loser: &'a str,
    },
}

/// Receiver for match notifications and audio cues.
pub trait EventSink {
    fn on_event(&mut self, event: &MatchEvent<'_>);

    /// Fire-and-forget sound hook.
    fn cue(&mut self, _cue: Cue) {}
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &MatchEvent<'_>) {}
}

/// Errors that end a match early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    Config(ConfigError),
    Player { name: String, error: PlayerError },
    /// An agent kept proposing rejected placements or shots.
    TooManyAttempts { name: String, last: BoardError },
    /// `play_turn` called before setup or after the match ended.
    WrongPhase(Phase),
}

impl From<ConfigError> for MatchError {
    fn from(err: ConfigError) -> Self {
        MatchError::Config(err)
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::Config(e) => write!(f, "configuration error: {}", e),
            MatchError::Player { name, error } => write!(f, "{}: {}", name, error),
            MatchError::TooManyAttempts { name, last } => {
                write!(f, "{} gave up after repeated rejections ({})", name, last)
            }
            MatchError::WrongPhase(p) => write!(f, "operation not allowed in phase {:?}", p),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatchError {}

/// A seat at the table: the agent plus its two boards.
pub struct Party {
    name: String,
    player: Box<dyn Player>,
    fleet: Board,
    guesses: Board,
    shots: usize,
}

impl Party {
    pub fn new(name: impl Into<String>, player: Box<dyn Player>) -> Self {
        Self {
            name: name.into(),
            player,
            fleet: Board::new(),
            guesses: Board::new(),
            shots: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fleet(&self) -> &Board {
        &self.fleet
    }

    pub fn guesses(&self) -> &Board {
        &self.guesses
    }

    /// Shots resolved by this party so far.
    pub fn shots(&self) -> usize {
        self.shots
    }

    fn player_error(&self, error: PlayerError) -> MatchError {
        MatchError::Player {
            name: self.name.clone(),
            error,
        }
    }

    fn place_fleet(&mut self, fleet_size: usize, sink: &mut dyn EventSink) -> Result<(), MatchError> {
        for size in fleet_sizes(fleet_size) {
            let mut attempts = 0;
            loop {
                let placement = self
                    .player
                    .propose_placement(&self.fleet, size)
                    .map_err(|e| self.player_error(e))?;
                let placed = Ship::new(size, placement.anchor, placement.orientation)
                    .and_then(|ship| self.fleet.place_ship(ship));
                match placed {
                    Ok(()) => {
                        sink.on_event(&MatchEvent::ShipPlaced {
                            player: &self.name,
                            size,
                        });
                        break;
                    }
                    Err(error) => {
                        attempts += 1;
                        sink.on_event(&MatchEvent::PlacementRejected {
                            player: &self.name,
                            size,
                            error,
                        });
                        self.player.handle_rejection(&error);
                        if attempts >= MAX_PLACEMENT_ATTEMPTS {
                            return Err(MatchError::TooManyAttempts {
                                name: self.name.clone(),
                                last: error,
                            });
                        }
                    }
                }
            }
        }
        if self.fleet.ships().is_empty() {
            return Err(ConfigError::EmptyFleet.into());
        }
        Ok(())
    }
}

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    InProgress,
    /// Terminal; holds the index of the winning party.
    Finished { winner: usize },
}

/// Summary of a finished match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchReport {
    pub winner: String,
    pub loser: String,
    pub fleet_size: usize,
    /// Resolved shots per party, in seat order.
    pub shots: [usize; 2],
}

/// Two parties playing to a result. The first party moves first every round.
pub struct Match {
    parties: [Party; 2],
    fleet_size: usize,
    phase: Phase,
    active: usize,
}

impl Match {
    pub fn new(fleet_size: usize, first: Party, second: Party) -> Result<Self, ConfigError> {
        let fleet_size = validate_fleet_size(fleet_size)?;
        Ok(Self {
            parties: [first, second],
            fleet_size,
            phase: Phase::Setup,
            active: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn fleet_size(&self) -> usize {
        self.fleet_size
    }

    /// Party in seat `index` (0 or 1).
    pub fn party(&self, index: usize) -> Option<&Party> {
        self.parties.get(index)
    }

    /// Both parties in seat order.
    pub fn parties(&self) -> &[Party; 2] {
        &self.parties
    }

    /// Index of the party whose turn it is.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn winner(&self) -> Option<&Party> {
        match self.phase {
            Phase::Finished { winner } => Some(&self.parties[winner]),
            _ => None,
        }
    }

    /// Has each party place its fleet, ships of size `1..=fleet_size` in order.
    pub fn setup(&mut self, sink: &mut dyn EventSink) -> Result<(), MatchError> {
        if self.phase != Phase::Setup {
            return Err(MatchError::WrongPhase(self.phase));
        }
        for party in self.parties.iter_mut() {
            party.place_fleet(self.fleet_size, sink)?;
            log::info!("{} placed {} ships", party.name, self.fleet_size);
        }
        self.phase = Phase::InProgress;
        Ok(())
    }

    fn pair_mut(&mut self) -> (&mut Party, &mut Party) {
        let (left, right) = self.parties.split_at_mut(1);
        if self.active == 0 {
            (&mut left[0], &mut right[0])
        } else {
            (&mut right[0], &mut left[0])
        }
    }

    /// Plays one turn: the active party keeps shooting until one shot is
    /// resolved. Returns the index of the winner if that shot ended the match.
    pub fn play_turn(&mut self, sink: &mut dyn EventSink) -> Result<Option<usize>, MatchError> {
        if self.phase != Phase::InProgress {
            return Err(MatchError::WrongPhase(self.phase));
        }
        let shooter = self.active;
        let (me, them) = self.pair_mut();
        let mut attempts = 0;
        let (coord, result) = loop {
            let coord = me
                .player
                .select_target(&me.guesses, &them.fleet)
                .map_err(|e| me.player_error(e))?;
            match submit_guess(&mut me.guesses, &mut them.fleet, coord) {
                Ok(result) => break (coord, result),
                Err(error) => {
                    attempts += 1;
                    log::debug!("{} shot at {} rejected: {}", me.name, coord, error);
                    sink.on_event(&MatchEvent::ShotRejected {
                        player: &me.name,
                        coord,
                        error,
                    });
                    me.player.handle_rejection(&error);
                    if attempts >= MAX_SHOT_ATTEMPTS {
                        return Err(MatchError::TooManyAttempts {
                            name: me.name.clone(),
                            last: error,
                        });
                    }
                }
            }
        };
        me.shots += 1;
        me.player.handle_guess_result(coord, result, &them.fleet);
        sink.on_event(&MatchEvent::Shot {
            player: &me.name,
            coord,
            result,
        });
        sink.cue(if result.is_hit() { Cue::Hit } else { Cue::Miss });

        if them.fleet.all_sunk() {
            log::info!("{} sank every ship of {}", me.name, them.name);
            sink.on_event(&MatchEvent::Won {
                winner: &me.name,
                loser: &them.name,
            });
            sink.cue(Cue::Win);
            self.phase = Phase::Finished { winner: shooter };
            return Ok(Some(shooter));
        }
        self.active = 1 - shooter;
        Ok(None)
    }

    /// Runs setup (if still pending) and turns until someone wins.
    pub fn run(&mut self, sink: &mut dyn EventSink) -> Result<MatchReport, MatchError> {
        if self.phase == Phase::Setup {
            self.setup(sink)?;
        }
        let winner = loop {
            if let Phase::Finished { winner } = self.phase {
                break winner;
            }
            if let Some(winner) = self.play_turn(sink)? {
                break winner;
            }
        };
        Ok(self.report(winner))
    }

    fn report(&self, winner: usize) -> MatchReport {
        MatchReport {
            winner: self.parties[winner].name.clone(),
            loser: self.parties[1 - winner].name.clone(),
            fleet_size: self.fleet_size,
            shots: [self.parties[0].shots, self.parties[1].shots],
        }
    }
}
