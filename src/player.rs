use rand::rngs::SmallRng;

use crate::{
    ai::Strategy,
    board::{Board, Placement},
    common::{BoardError, Coord, GuessResult, PlayerError},
    config::Difficulty,
};

/// Interface implemented by the agents seated in a match.
///
/// The match drives every phase: it asks for one placement or one shot at a
/// time, applies it, and reports rejections back so the agent can try again.
pub trait Player {
    /// Propose geometry for the next ship of `size` on the agent's own board.
    fn propose_placement(&mut self, fleet: &Board, size: usize) -> Result<Placement, PlayerError>;

    /// Choose the next cell to fire at.
    ///
    /// `opponent` is the opponent's fleet board. Fair agents must only read
    /// sunk status from it.
    fn select_target(&mut self, guesses: &Board, opponent: &Board) -> Result<Coord, PlayerError>;

    /// Inform the agent of the result of its last shot.
    fn handle_guess_result(&mut self, _coord: Coord, _result: GuessResult, _opponent: &Board) {}

    /// Inform the agent that its last placement or shot was refused.
    fn handle_rejection(&mut self, _error: &BoardError) {}
}

/// Computer agent: random placement plus one targeting strategy.
pub struct AiPlayer {
    strategy: Strategy,
    rng: SmallRng,
}

impl AiPlayer {
    pub fn new(difficulty: Difficulty, rng: SmallRng) -> Self {
        Self {
            strategy: Strategy::new(difficulty),
            rng,
        }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }
}

impl Player for AiPlayer {
    fn propose_placement(&mut self, _fleet: &Board, size: usize) -> Result<Placement, PlayerError> {
        Ok(Board::random_placement(&mut self.rng, size))
    }

    fn select_target(&mut self, guesses: &Board, opponent: &Board) -> Result<Coord, PlayerError> {
        self.strategy
            .choose_shot(&mut self.rng, guesses, opponent)
            .ok_or(PlayerError::NoTargets)
    }

    fn handle_guess_result(&mut self, coord: Coord, result: GuessResult, opponent: &Board) {
        self.strategy.observe(coord, result, opponent);
    }
}
