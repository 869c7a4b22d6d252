// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use structopt::StructOpt;

use shashki::movegen;
use shashki::GameSession;

#[derive(Debug, StructOpt)]
struct Options {
    /// Diagram of the position to analyze, e.g. "8/8/8/8/3b4/2w5/8/8 w".
    #[structopt(name = "DIAGRAM")]
    diagram: String,
}

fn main() {
    let ops = Options::from_args();
    let session = GameSession::from_diagram(ops.diagram).unwrap();
    let mut moves = Vec::new();
    movegen::generate_moves(session.to_move(), session.board(), &mut moves);
    for mov in moves {
        println!("{}", mov);
    }
}
