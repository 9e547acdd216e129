use std::io::{self, BufReader, Write};

use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use salvo::{
    init_logging, prompt_fleet_size, prompt_line, ui::render_side_by_side, ui::ConsoleSink,
    AiPlayer, CliPlayer, Difficulty, Match, MatchConfig, Party, Player, Seat, SeatConfig,
    SharedInput, MAX_FLEET,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Who sits in a seat.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum SeatKind {
    Human,
    Easy,
    Medium,
    Hard,
}

impl From<SeatKind> for Seat {
    fn from(kind: SeatKind) -> Self {
        match kind {
            SeatKind::Human => Seat::Human,
            SeatKind::Easy => Seat::Ai(Difficulty::Easy),
            SeatKind::Medium => Seat::Ai(Difficulty::Medium),
            SeatKind::Hard => Seat::Ai(Difficulty::Hard),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match on this terminal.
    Play {
        #[arg(long, value_enum, default_value_t = SeatKind::Human)]
        p1: SeatKind,
        #[arg(long, value_enum, default_value_t = SeatKind::Medium)]
        p2: SeatKind,
        /// Name of the first player (prompted for humans when omitted).
        #[arg(long)]
        name1: Option<String>,
        #[arg(long)]
        name2: Option<String>,
        /// Number of ships per fleet, 1-5 (prompted when omitted and a human plays).
        #[arg(long)]
        ships: Option<usize>,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        /// Ring the terminal bell on hits and on the win.
        #[arg(long)]
        sound: bool,
    },
    /// Watch two computer players fight it out.
    Demo {
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        p1: Difficulty,
        #[arg(long, value_enum, default_value_t = Difficulty::Hard)]
        p2: Difficulty,
        #[arg(long, default_value_t = MAX_FLEET)]
        ships: usize,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

fn build_party(config: &MatchConfig, index: usize, input: &SharedInput) -> Party {
    let seat = &config.seats[index];
    let rng = make_rng(config.seat_seed(index));
    let player: Box<dyn Player> = match seat.seat {
        Seat::Human => Box::new(CliPlayer::new(
            seat.name.clone(),
            input.clone(),
            io::stdout(),
            rng,
        )),
        Seat::Ai(difficulty) => Box::new(AiPlayer::new(difficulty, rng)),
    };
    Party::new(seat.name.clone(), player)
}

fn run_match(config: &MatchConfig, input: &SharedInput, bell: bool) -> anyhow::Result<()> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    let first = build_party(config, 0, input);
    let second = build_party(config, 1, input);
    let mut game = Match::new(config.fleet_size, first, second)?;
    let mut sink = ConsoleSink::stdout(bell);
    let report = game.run(&mut sink)?;

    println!();
    for party in game.parties() {
        println!(
            "{}",
            render_side_by_side(party.guesses(), party.fleet(), party.name())
        );
    }
    println!(
        "{} won after {} shots ({} vs {}).",
        report.winner,
        report.shots[0] + report.shots[1],
        report.shots[0],
        report.shots[1]
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut input = SharedInput::new(Box::new(BufReader::new(io::stdin())));
    let mut out = io::stdout();

    match cli.command {
        Commands::Play {
            p1,
            p2,
            name1,
            name2,
            ships,
            seed,
            sound,
        } => {
            let kinds = [p1, p2];
            let mut names = [name1, name2];
            let mut seats = Vec::with_capacity(2);
            for (i, kind) in kinds.into_iter().enumerate() {
                let seat = Seat::from(kind);
                let name = match (names[i].take(), seat) {
                    (Some(n), _) => n,
                    (None, Seat::Human) => {
                        let prompt = format!("Enter name for Player {}: ", i + 1);
                        let line = prompt_line(&mut input, &mut out, &prompt)?;
                        if line.trim().is_empty() {
                            format!("Player {}", i + 1)
                        } else {
                            line.trim().to_string()
                        }
                    }
                    (None, Seat::Ai(d)) => format!("Computer {} ({:?})", i + 1, d),
                };
                seats.push(SeatConfig { name, seat });
            }
            let fleet_size = match ships {
                Some(n) => n,
                None => match seats.iter().find(|s| s.seat == Seat::Human) {
                    Some(human) => prompt_fleet_size(&mut input, &mut out, &human.name)?,
                    None => MAX_FLEET,
                },
            };
            let [first, second]: [SeatConfig; 2] = seats
                .try_into()
                .map_err(|_| anyhow::anyhow!("expected two seats"))?;
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let _ = out.flush();
            let config = MatchConfig {
                fleet_size,
                seats: [first, second],
                seed,
            };
            run_match(&config, &input, sound)?;
        }
        Commands::Demo {
            p1,
            p2,
            ships,
            seed,
        } => {
            let config = MatchConfig {
                fleet_size: ships,
                seats: [
                    SeatConfig {
                        name: format!("Computer 1 ({:?})", p1),
                        seat: Seat::Ai(p1),
                    },
                    SeatConfig {
                        name: format!("Computer 2 ({:?})", p2),
                        seat: Seat::Ai(p2),
                    },
                ],
                seed,
            };
            run_match(&config, &input, false)?;
        }
    }
    Ok(())
}
