// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Plays random games headlessly, end to end through the session API. Handy for smoke-testing the rules:
//! every selection and every chosen target below comes from the engine's own legal move sets, so any
//! rejection is a bug and the driver panics on it.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use structopt::StructOpt;

use shashki::core::{Color, Move};
use shashki::movegen;
use shashki::{GameSession, MoveOutcome, SelectOutcome};

#[derive(Debug, StructOpt)]
struct Options {
    /// Number of games to play.
    #[structopt(short, long, default_value = "1")]
    games: u32,

    /// RNG seed, for reproducible playouts.
    #[structopt(short, long)]
    seed: Option<u64>,

    /// Stop a game after this many plies.
    #[structopt(long, default_value = "500")]
    max_plies: u32,
}

fn main() {
    let ops = Options::from_args();
    let mut rng = match ops.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    for game in 0..ops.games {
        let (winner, plies) = play(&mut rng, ops.max_plies);
        match winner {
            Some(color) => println!("game {}: {} wins after {} plies", game, color, plies),
            None => println!("game {}: no winner after {} plies", game, plies),
        }
    }
}

fn play(rng: &mut SmallRng, max_plies: u32) -> (Option<Color>, u32) {
    let mut session = GameSession::new();
    let mut plies = 0;
    while session.winner().is_none() && plies < max_plies {
        let mov = match session.forced() {
            Some(forced) => {
                let targets: Vec<_> = session.legal_destinations(forced).into_iter().collect();
                Move::jump(forced, targets[rng.gen_range(0..targets.len())])
            }
            None => {
                let mut moves = Vec::new();
                movegen::generate_moves(session.to_move(), session.board(), &mut moves);
                if moves.is_empty() {
                    // The side to move is stuck. The rules have no stalemate provision, so the playout
                    // just stops here.
                    break;
                }

                moves[rng.gen_range(0..moves.len())]
            }
        };

        match session.select(mov.source()) {
            SelectOutcome::Selected { .. } => (),
            SelectOutcome::Rejected => panic!("selfplay selected an illegal piece: {}", mov),
        }
        match session.choose(mov.destination()) {
            MoveOutcome::Rejected => panic!("selfplay chose an illegal target: {}", mov),
            _ => (),
        }

        plies += 1;
    }

    (session.winner(), plies)
}
