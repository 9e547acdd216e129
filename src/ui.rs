#![cfg(feature = "std")]
//! Console rendering of boards and match notifications.

use std::fmt::Write as _;
use std::io::Write;

use crate::{
    board::Board,
    common::{CellState, Coord, GuessResult},
    config::BOARD_SIZE,
    game::{Cue, EventSink, MatchEvent},
};

/// Which cells a rendering may reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Owner's view: ship cells are shown.
    Fleet,
    /// Opponent-facing view: unfired ship cells render as water.
    Guesses,
}

pub fn glyph(state: CellState, view: View) -> char {
    match (state, view) {
        (CellState::Water, _) | (CellState::ShipPresent, View::Guesses) => '~',
        (CellState::ShipPresent, View::Fleet) => 'S',
        (CellState::Hit, _) => 'X',
        (CellState::Miss, _) => 'O',
    }
}

fn column_labels() -> String {
    (0..BOARD_SIZE)
        .map(|c| ((b'A' + c as u8) as char).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn row_cells(board: &Board, row: usize, view: View) -> String {
    (0..BOARD_SIZE)
        .map(|col| {
            let state = board.cell(Coord::new(row, col)).unwrap_or_default();
            glyph(state, view).to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Grid with column letters `A..J` across the top and rows numbered `1..10`.
pub fn render_board(board: &Board, view: View) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "   {}", column_labels());
    for r in 0..BOARD_SIZE {
        let _ = writeln!(out, "{:>2} {}", r + 1, row_cells(board, r, view));
    }
    out
}

/// A party's guesses next to its own placements.
pub fn render_side_by_side(guesses: &Board, fleet: &Board, name: &str) -> String {
    let labels = column_labels();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28}{}",
        format!("   {}'s Guesses", name),
        format!("{}'s Placements", name)
    );
    let _ = writeln!(out, "   {}      {}", labels, labels);
    for r in 0..BOARD_SIZE {
        let _ = writeln!(
            out,
            "{:>2} {} {:>4} {}",
            r + 1,
            row_cells(guesses, r, View::Guesses),
            r + 1,
            row_cells(fleet, r, View::Fleet)
        );
    }
    out
}

/// Text shown to players for a resolved shot.
pub fn describe_shot(result: GuessResult) -> &'static str {
    match result {
        GuessResult::Hit => "It's a hit!",
        GuessResult::Miss => "It's a miss!",
        GuessResult::Sink(_) => "It's a hit! Ship was sunk!",
    }
}

/// Prints match notifications to a writer. With `bell` set, hit and win cues
/// ring the terminal bell.
pub struct ConsoleSink<W: Write> {
    out: W,
    bell: bool,
    show_placements: bool,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, bell: bool) -> Self {
        Self {
            out,
            bell,
            show_placements: false,
        }
    }

    /// Also report accepted placements (off by default to keep fleets secret).
    pub fn with_placements(mut self, show: bool) -> Self {
        self.show_placements = show;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout(bell: bool) -> Self {
        Self::new(std::io::stdout(), bell)
    }
}

impl<W: Write> EventSink for ConsoleSink<W> {
    fn on_event(&mut self, event: &MatchEvent<'_>) {
        let _ = match event {
            MatchEvent::ShipPlaced { player, size } if self.show_placements => {
                writeln!(self.out, "{} placed a {}x1 ship.", player, size)
            }
            MatchEvent::ShipPlaced { .. } => Ok(()),
            // the agent that made the attempt reports these to its own user
            MatchEvent::PlacementRejected { .. } | MatchEvent::ShotRejected { .. } => Ok(()),
            MatchEvent::Shot {
                player,
                coord,
                result,
            } => writeln!(self.out, "{} fires at {}. {}", player, coord, describe_shot(*result)),
            MatchEvent::Won { winner, loser } => {
                writeln!(self.out, "{} wins! All ships of {} are sunk.", winner, loser)
            }
        };
    }

    fn cue(&mut self, cue: Cue) {
        if self.bell && matches!(cue, Cue::Hit | Cue::Win) {
            let _ = write!(self.out, "\x07");
            let _ = self.out.flush();
        }
    }
}
