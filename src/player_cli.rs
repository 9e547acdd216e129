#![cfg(feature = "std")]

use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Read, Write};
use std::rc::Rc;

use rand::rngs::SmallRng;

use crate::{
    board::{Board, Placement},
    common::{BoardError, Coord, PlayerError},
    config::{validate_fleet_size, BOARD_SIZE, MAX_FLEET, MIN_FLEET},
    player::Player,
    ship::Orientation,
    ui::{render_board, View},
};

/// Malformed text typed at a prompt. Never leaves the console layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFormatError(String);

impl fmt::Display for InputFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InputFormatError {}

/// Parses `LetterNumber` text such as `B3` into `(row 2, col 1)`.
pub fn parse_coord(input: &str) -> Result<Coord, InputFormatError> {
    let input = input.trim();
    let mut chars = input.chars();
    let col_ch = chars.next().map(|c| c.to_ascii_uppercase());
    let row_str = chars.as_str();
    let col_ch = match col_ch {
        Some(c) if c.is_ascii_alphabetic() && !row_str.is_empty() => c,
        _ => {
            return Err(InputFormatError(
                "Invalid input format. Please use the format 'LetterNumber' (e.g., B3).".into(),
            ))
        }
    };
    let row: usize = row_str.parse().map_err(|_| {
        InputFormatError(
            "Invalid input format. Please use the format 'LetterNumber' (e.g., B3).".into(),
        )
    })?;
    let col = (col_ch as u8 - b'A') as usize;
    if row == 0 || row > BOARD_SIZE || col >= BOARD_SIZE {
        return Err(InputFormatError(
            "Position out of bounds. Please choose a valid position on the board.".into(),
        ));
    }
    Ok(Coord::new(row - 1, col))
}

/// `H` or `V`, case-insensitive.
pub fn parse_orientation(input: &str) -> Result<Orientation, InputFormatError> {
    match input.trim().to_ascii_uppercase().as_str() {
        "H" => Ok(Orientation::Horizontal),
        "V" => Ok(Orientation::Vertical),
        _ => Err(InputFormatError(
            "Invalid orientation. Please enter 'H' for horizontal or 'V' for vertical.".into(),
        )),
    }
}

pub fn parse_fleet_size(input: &str) -> Result<usize, InputFormatError> {
    input
        .trim()
        .parse()
        .ok()
        .and_then(|n| validate_fleet_size(n).ok())
        .ok_or_else(|| {
            InputFormatError(format!(
                "Please enter a valid number of ships ({}-{}).",
                MIN_FLEET, MAX_FLEET
            ))
        })
}

/// Writes `prompt` and reads one line, without the line ending.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String, PlayerError> {
    let _ = write!(output, "{}", prompt);
    let _ = output.flush();
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => Err(PlayerError::InputClosed),
        Ok(_) => Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
    }
}

/// Prompts until `parse` accepts the line.
pub fn prompt_until<R, W, T, F>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    mut parse: F,
) -> Result<T, PlayerError>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<T, InputFormatError>,
{
    loop {
        let line = prompt_line(input, output, prompt)?;
        match parse(&line) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let _ = writeln!(output, "{}", e);
            }
        }
    }
}

/// Asks `name` for the number of ships, re-prompting until it is in range.
pub fn prompt_fleet_size<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    name: &str,
) -> Result<usize, PlayerError> {
    let prompt = format!(
        "{}, enter the number of ships ({}-{}): ",
        name, MIN_FLEET, MAX_FLEET
    );
    prompt_until(input, output, &prompt, parse_fleet_size)
}

/// Line-at-a-time view of an input shared by several players, so two
/// humans at one terminal never consume each other's lines.
pub struct SharedInput {
    source: Rc<RefCell<Box<dyn BufRead>>>,
    line: Vec<u8>,
    pos: usize,
}

impl SharedInput {
    pub fn new(source: Box<dyn BufRead>) -> Self {
        Self {
            source: Rc::new(RefCell::new(source)),
            line: Vec::new(),
            pos: 0,
        }
    }
}

impl Clone for SharedInput {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            line: Vec::new(),
            pos: 0,
        }
    }
}

impl Read for SharedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for SharedInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.line.len() {
            self.line.clear();
            self.pos = 0;
            self.source.borrow_mut().read_until(b'\n', &mut self.line)?;
        }
        Ok(&self.line[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.line.len());
    }
}

/// Human agent reading moves from a line-oriented input.
pub struct CliPlayer<R, W> {
    name: String,
    input: R,
    output: W,
    rng: SmallRng,
}

impl<R: BufRead, W: Write> CliPlayer<R, W> {
    /// `rng` backs the blank-line random placement shortcut.
    pub fn new(name: impl Into<String>, input: R, output: W, rng: SmallRng) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            rng,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Player for CliPlayer<R, W> {
    fn propose_placement(&mut self, fleet: &Board, size: usize) -> Result<Placement, PlayerError> {
        let _ = write!(self.output, "{}", render_board(fleet, View::Fleet));
        let prompt = format!(
            "{}, place your {}x1 ship (e.g., B3, blank for random): ",
            self.name, size
        );
        let anchor = prompt_until(&mut self.input, &mut self.output, &prompt, |line| {
            if line.trim().is_empty() {
                Ok(None)
            } else {
                parse_coord(line).map(Some)
            }
        })?;
        let Some(anchor) = anchor else {
            return Ok(Board::random_placement(&mut self.rng, size));
        };
        let orientation = prompt_until(
            &mut self.input,
            &mut self.output,
            "Choose orientation (H for horizontal, V for vertical): ",
            parse_orientation,
        )?;
        Ok(Placement {
            anchor,
            orientation,
        })
    }

    fn select_target(&mut self, guesses: &Board, _opponent: &Board) -> Result<Coord, PlayerError> {
        let _ = write!(self.output, "{}", render_board(guesses, View::Guesses));
        let prompt = format!("{}, enter your guess (e.g., B3): ", self.name);
        prompt_until(&mut self.input, &mut self.output, &prompt, parse_coord)
    }

    fn handle_rejection(&mut self, error: &BoardError) {
        let _ = writeln!(self.output, "{}", error);
    }
}
