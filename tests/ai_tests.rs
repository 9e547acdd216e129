use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use salvo::{
    submit_guess, AiPlayer, Board, Coord, Difficulty, Direction, GuessResult, HuntPhase,
    HuntTarget, Orientation, Oracle, RandomFire, Ship, Strategy, BOARD_SIZE,
};

fn fleet(ships: &[(usize, usize, usize, Orientation)]) -> Board {
    let mut board = Board::new();
    for &(size, row, col, o) in ships {
        board
            .place_ship(Ship::new(size, Coord::new(row, col), o).unwrap())
            .unwrap();
    }
    board
}

/// Chooses, fires and reports back one hunt-target shot.
fn fire(
    hunt: &mut HuntTarget,
    rng: &mut SmallRng,
    guesses: &mut Board,
    opponent: &mut Board,
) -> (Coord, GuessResult) {
    let c = hunt.choose_shot(rng, guesses).unwrap();
    let r = submit_guess(guesses, opponent, c).unwrap();
    hunt.observe(c, r, opponent);
    (c, r)
}

/// Seeds the state machine with a first hit at `at`.
fn first_hit(hunt: &mut HuntTarget, guesses: &mut Board, opponent: &mut Board, at: Coord) {
    let r = submit_guess(guesses, opponent, at).unwrap();
    assert_eq!(r, GuessResult::Hit);
    hunt.observe(at, r, opponent);
    assert_eq!(hunt.phase(), HuntPhase::Orient);
    assert_eq!(hunt.first_hit(), Some(at));
}

#[test]
fn test_direction_steps() {
    let c = Coord::new(0, 9);
    assert_eq!(Direction::Up.step(c), None);
    assert_eq!(Direction::Right.step(c), None);
    assert_eq!(Direction::Down.step(c), Some(Coord::new(1, 9)));
    assert_eq!(Direction::Left.step(c), Some(Coord::new(0, 8)));
}

#[test]
fn test_hunt_probes_in_priority_order() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut hunt = HuntTarget::new();
    let mut guesses = Board::new();
    let mut opponent = fleet(&[(3, 5, 4, Orientation::Horizontal)]);
    first_hit(&mut hunt, &mut guesses, &mut opponent, Coord::new(5, 6));

    let shots: Vec<_> = (0..5)
        .map(|_| fire(&mut hunt, &mut rng, &mut guesses, &mut opponent))
        .collect();
    assert_eq!(
        shots,
        vec![
            (Coord::new(4, 6), GuessResult::Miss),
            (Coord::new(5, 7), GuessResult::Miss),
            (Coord::new(6, 6), GuessResult::Miss),
            (Coord::new(5, 5), GuessResult::Hit),
            (Coord::new(5, 4), GuessResult::Sink(3)),
        ]
    );
    assert_eq!(hunt.phase(), HuntPhase::Search);
}

#[test]
fn test_hunt_returns_to_first_hit_after_miss() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut hunt = HuntTarget::new();
    let mut guesses = Board::new();
    let mut opponent = fleet(&[(4, 3, 4, Orientation::Vertical)]);
    first_hit(&mut hunt, &mut guesses, &mut opponent, Coord::new(5, 4));

    assert_eq!(
        fire(&mut hunt, &mut rng, &mut guesses, &mut opponent),
        (Coord::new(4, 4), GuessResult::Hit)
    );
    assert_eq!(hunt.phase(), HuntPhase::Extend);
    assert_eq!(hunt.direction(), Some(Direction::Up));
    assert_eq!(
        fire(&mut hunt, &mut rng, &mut guesses, &mut opponent),
        (Coord::new(3, 4), GuessResult::Hit)
    );
    assert_eq!(
        fire(&mut hunt, &mut rng, &mut guesses, &mut opponent),
        (Coord::new(2, 4), GuessResult::Miss)
    );
    assert_eq!(hunt.phase(), HuntPhase::Orient);
    // up is spent, so the next probe goes right, then down
    assert_eq!(
        fire(&mut hunt, &mut rng, &mut guesses, &mut opponent),
        (Coord::new(5, 5), GuessResult::Miss)
    );
    assert_eq!(
        fire(&mut hunt, &mut rng, &mut guesses, &mut opponent),
        (Coord::new(6, 4), GuessResult::Sink(4))
    );
    assert_eq!(hunt.phase(), HuntPhase::Search);
}

#[test]
fn test_hunt_treats_board_edge_as_exhausted() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut hunt = HuntTarget::new();
    let mut guesses = Board::new();
    let mut opponent = fleet(&[(3, 2, 7, Orientation::Horizontal)]);
    first_hit(&mut hunt, &mut guesses, &mut opponent, Coord::new(2, 8));

    let shots: Vec<_> = (0..4)
        .map(|_| fire(&mut hunt, &mut rng, &mut guesses, &mut opponent).0)
        .collect();
    assert_eq!(
        shots,
        vec![
            Coord::new(1, 8),
            Coord::new(2, 9),
            Coord::new(3, 8),
            Coord::new(2, 7),
        ]
    );
    assert!(opponent.all_sunk());
}

#[test]
fn test_hunt_skips_off_board_neighbours() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut hunt = HuntTarget::new();
    let mut guesses = Board::new();
    let mut opponent = fleet(&[(2, 0, 0, Orientation::Horizontal)]);
    first_hit(&mut hunt, &mut guesses, &mut opponent, Coord::new(0, 0));
    assert_eq!(
        fire(&mut hunt, &mut rng, &mut guesses, &mut opponent),
        (Coord::new(0, 1), GuessResult::Sink(2))
    );
}

#[test]
fn test_hunt_first_probe_after_random_hit() {
    let mut rng = SmallRng::seed_from_u64(77);
    let mut hunt = HuntTarget::new();
    let mut guesses = Board::new();
    let mut opponent = fleet(&[
        (5, 1, 1, Orientation::Horizontal),
        (4, 6, 2, Orientation::Vertical),
        (3, 3, 7, Orientation::Vertical),
    ]);
    let hit = loop {
        let (c, r) = fire(&mut hunt, &mut rng, &mut guesses, &mut opponent);
        if r.is_hit() {
            break c;
        }
    };
    let expected = Direction::PRIORITY
        .into_iter()
        .filter_map(|d| d.step(hit))
        .find(|c| !guesses.is_fired(*c))
        .unwrap();
    assert_eq!(hunt.choose_shot(&mut rng, &guesses), Some(expected));
}

/// Shots hunt-and-target should take after `first` hit `ship`, given the
/// cells already fired: probe neighbours in priority order, follow a hit
/// until it misses or runs off the board, then probe again.
fn expected_walk(first: Coord, ship: &Ship, guesses: &Board) -> Vec<Coord> {
    let mut fired: HashSet<Coord> = guesses.fired().iter_set_bits().map(Coord::from).collect();
    let mut remaining: HashSet<Coord> = ship
        .cells()
        .iter()
        .copied()
        .filter(|c| !fired.contains(c))
        .collect();
    let mut shots = Vec::new();
    while !remaining.is_empty() {
        let (d, c) = Direction::PRIORITY
            .into_iter()
            .find_map(|d| d.step(first).filter(|c| !fired.contains(c)).map(|c| (d, c)))
            .unwrap();
        shots.push(c);
        fired.insert(c);
        if !remaining.remove(&c) {
            continue;
        }
        let mut last = c;
        while !remaining.is_empty() {
            let Some(next) = d.step(last).filter(|n| !fired.contains(n)) else {
                break;
            };
            shots.push(next);
            fired.insert(next);
            if !remaining.remove(&next) {
                break;
            }
            last = next;
        }
    }
    shots
}

#[test]
fn test_hunt_walk_after_seeded_hit() {
    for seed in 0..40 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut hunt = HuntTarget::new();
        let mut guesses = Board::new();
        let mut opponent = if seed % 2 == 0 {
            fleet(&[(4, 3, 2, Orientation::Horizontal)])
        } else {
            fleet(&[(4, 2, 6, Orientation::Vertical)])
        };
        let first = loop {
            let (c, r) = fire(&mut hunt, &mut rng, &mut guesses, &mut opponent);
            if r.is_hit() {
                break c;
            }
            assert_eq!(hunt.phase(), HuntPhase::Search);
        };
        assert_eq!(hunt.first_hit(), Some(first));

        let expected = expected_walk(first, &opponent.ships()[0], &guesses);
        assert!(expected.len() <= 7, "seed {}: {:?}", seed, expected);
        let actual: Vec<_> = (0..expected.len())
            .map(|_| fire(&mut hunt, &mut rng, &mut guesses, &mut opponent))
            .collect();
        let coords: Vec<_> = actual.iter().map(|(c, _)| *c).collect();
        assert_eq!(coords, expected, "seed {}", seed);
        assert_eq!(actual.last().map(|(_, r)| *r), Some(GuessResult::Sink(4)));
        assert!(opponent.all_sunk());
        assert_eq!(hunt.phase(), HuntPhase::Search);
    }
}

#[test]
fn test_oracle_fires_row_major() {
    let mut opponent = fleet(&[
        (3, 6, 2, Orientation::Horizontal),
        (2, 1, 8, Orientation::Vertical),
        (1, 4, 0, Orientation::Vertical),
    ]);
    let mut expected: Vec<Coord> = opponent
        .ships()
        .iter()
        .flat_map(|s| s.cells().to_vec())
        .collect();
    expected.sort();

    let mut oracle = Oracle;
    let mut guesses = Board::new();
    let mut shots = Vec::new();
    while let Some(c) = oracle.choose_shot(&guesses, &opponent) {
        submit_guess(&mut guesses, &mut opponent, c).unwrap();
        shots.push(c);
    }
    assert_eq!(shots, expected);
    assert!(opponent.all_sunk());
}

#[test]
fn test_random_fire_never_repeats() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mut easy = RandomFire;
    let mut guesses = Board::new();
    let mut opponent = Board::new();
    for _ in 0..BOARD_SIZE * BOARD_SIZE {
        let c = easy.choose_shot(&mut rng, &guesses).unwrap();
        assert!(!guesses.is_fired(c));
        submit_guess(&mut guesses, &mut opponent, c).unwrap();
    }
    assert_eq!(easy.choose_shot(&mut rng, &guesses), None);
}

#[test]
fn test_strategy_tiers() {
    for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        assert_eq!(Strategy::new(d).difficulty(), d);
    }
    assert!(matches!(
        Strategy::new(Difficulty::Medium),
        Strategy::HuntTarget(_)
    ));
}

#[test]
fn test_ai_player_keeps_its_tier() {
    for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let player = AiPlayer::new(d, SmallRng::seed_from_u64(0));
        assert_eq!(player.strategy().difficulty(), d);
    }
}
