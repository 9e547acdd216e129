use rand::{rngs::SmallRng, SeedableRng};
use salvo::{AiPlayer, Difficulty, Match, NullSink, Party, MAX_FLEET};
use serde_json::json;

fn parse_difficulty(arg: Option<&String>, default: Difficulty) -> anyhow::Result<Difficulty> {
    match arg.map(|s| s.to_ascii_lowercase()).as_deref() {
        None => Ok(default),
        Some("easy") => Ok(Difficulty::Easy),
        Some("medium") => Ok(Difficulty::Medium),
        Some("hard") => Ok(Difficulty::Hard),
        Some(other) => Err(anyhow::anyhow!("unknown difficulty '{}'", other)),
    }
}

fn main() -> anyhow::Result<()> {
    salvo::init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <seed1> <seed2> [easy|medium|hard] [easy|medium|hard] [ships]",
            args.first().map_or("sim", String::as_str)
        );
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;
    let d1 = parse_difficulty(args.get(3), Difficulty::Medium)?;
    let d2 = parse_difficulty(args.get(4), Difficulty::Medium)?;
    let ships = match args.get(5) {
        Some(s) => s.parse()?,
        None => MAX_FLEET,
    };

    let p1 = AiPlayer::new(d1, SmallRng::seed_from_u64(seed1));
    let p2 = AiPlayer::new(d2, SmallRng::seed_from_u64(seed2));
    let mut game = Match::new(
        ships,
        Party::new("player1", Box::new(p1)),
        Party::new("player2", Box::new(p2)),
    )?;
    let report = game.run(&mut NullSink)?;

    let result = json!({
        "player1": {"difficulty": d1, "shots": report.shots[0]},
        "player2": {"difficulty": d2, "shots": report.shots[1]},
        "winner": report.winner,
        "report": report,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
