use rand::rngs::SmallRng;
use rand::SeedableRng;
use salvo::{AiPlayer, Difficulty, Match, MatchReport, NullSink, Party, MAX_FLEET};

const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

fn play(d1: Difficulty, d2: Difficulty, seed: u64, ships: usize) -> (Match, MatchReport) {
    let p1 = AiPlayer::new(d1, SmallRng::seed_from_u64(seed));
    let p2 = AiPlayer::new(d2, SmallRng::seed_from_u64(seed.wrapping_add(1)));
    let mut game = Match::new(
        ships,
        Party::new("one", Box::new(p1)),
        Party::new("two", Box::new(p2)),
    )
    .unwrap();
    let report = game.run(&mut NullSink).unwrap();
    (game, report)
}

#[test]
fn test_every_pairing_finishes() {
    for d1 in ALL {
        for d2 in ALL {
            for seed in 0..4 {
                let (game, report) = play(d1, d2, seed, MAX_FLEET);
                let winner = game.winner().unwrap();
                let loser = game.party(if winner.name() == "one" { 1 } else { 0 }).unwrap();
                assert_eq!(report.winner, winner.name());
                assert!(loser.fleet().all_sunk());
                assert!(!winner.fleet().all_sunk());
                // each guesses board mirrors the opposing fleet's fired cells
                for (me, them) in [(0, 1), (1, 0)] {
                    let g = game.party(me).unwrap().guesses();
                    let f = game.party(them).unwrap().fleet();
                    assert_eq!(g.hits(), f.hits());
                    assert_eq!(g.misses(), f.misses());
                    assert_eq!(game.party(me).unwrap().shots(), g.fired().count_ones());
                }
                // first seat moves first every round
                assert!(report.shots[0] == report.shots[1] || report.shots[0] == report.shots[1] + 1);
            }
        }
    }
}

#[test]
fn test_hard_needs_exactly_one_shot_per_ship_cell() {
    for seed in 0..8 {
        let (_, report) = play(Difficulty::Hard, Difficulty::Easy, seed, MAX_FLEET);
        assert_eq!(report.winner, "one");
        assert_eq!(report.shots[0], 15);

        let (_, report) = play(Difficulty::Easy, Difficulty::Hard, seed, 3);
        assert_eq!(report.winner, "two");
        assert_eq!(report.shots[1], 6);
    }
}

#[test]
fn test_hard_mirror_goes_to_first_seat() {
    let (_, report) = play(Difficulty::Hard, Difficulty::Hard, 5, 4);
    assert_eq!(report.winner, "one");
    assert_eq!(report.shots, [10, 9]);
}

#[test]
fn test_medium_beats_easy_most_of_the_time() {
    let wins = (0..30)
        .filter(|&seed| play(Difficulty::Medium, Difficulty::Easy, seed, MAX_FLEET).1.winner == "one")
        .count();
    assert!(wins >= 20, "medium only won {} of 30", wins);
}

#[test]
fn test_same_seeds_replay_identically() {
    let (a, ra) = play(Difficulty::Medium, Difficulty::Medium, 123, MAX_FLEET);
    let (b, rb) = play(Difficulty::Medium, Difficulty::Medium, 123, MAX_FLEET);
    assert_eq!(ra, rb);
    for i in 0..2 {
        assert_eq!(a.party(i).unwrap().fleet(), b.party(i).unwrap().fleet());
        assert_eq!(a.party(i).unwrap().guesses(), b.party(i).unwrap().guesses());
    }
}

#[test]
fn test_single_ship_fleet() {
    for d in ALL {
        let (game, report) = play(d, d, 9, 1);
        assert_eq!(report.fleet_size, 1);
        assert_eq!(game.party(0).unwrap().fleet().ships().len(), 1);
        assert_eq!(game.party(1).unwrap().fleet().ships()[0].size(), 1);
    }
}
