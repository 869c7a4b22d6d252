// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A line-oriented text protocol for driving a game session from a front-end process. Commands arrive on
//! stdin as whitespace-separated tokens; responses leave on stdout as single JSON lines tagged with a
//! `"type"` field. The front-end resolves its own gestures down to squares before talking to us; nothing
//! here knows about pixels or animation, beyond the `busy`/`resolved` latch the front-end may hold while an
//! animation settles.
//!
//! Commands:
//!   * `new` - start a fresh game and emit a snapshot.
//!   * `position <placement> <w|b>` - load a diagram and emit a snapshot.
//!   * `select <square>` - a piece was selected; emits the selection outcome.
//!   * `target <square>` - a target square was chosen; emits the move outcome.
//!   * `moves` - emit every move available to the side to move.
//!   * `show` - print the board grid, for eyeballing.
//!   * `busy` / `resolved` - hold and release the input latch.

use std::io::{self, BufRead};

use anyhow::anyhow;
use serde_json::json;

use crate::core::{Move, Square, SquareSet};
use crate::game::{GameSession, MoveOutcome, SelectOutcome};
use crate::movegen;

pub fn run() -> io::Result<()> {
    let stdin = io::stdin();
    let locked_stdin = stdin.lock();
    let mut session = GameSession::new();
    for maybe_line in locked_stdin.lines() {
        let line = maybe_line?;
        let components: Vec<_> = line.split_whitespace().collect();
        let (&command, arguments) = components.split_first().unwrap_or((&"", &[]));
        match (command, arguments) {
            ("new", []) => {
                session = GameSession::new();
                emit_snapshot(&session);
            }
            ("position", args) => handle_position(&mut session, args),
            ("select", args) => handle_select(&mut session, args),
            ("target", args) => handle_target(&mut session, args),
            ("moves", []) => handle_moves(&session),
            ("show", []) => print!("{}", session.board()),
            ("busy", []) => session.set_busy(),
            ("resolved", []) => session.set_resolved(),
            ("quit", []) => break,
            _ => println!("unrecognized command: {} {:?}", command, arguments),
        }
    }

    Ok(())
}

fn emit(value: serde_json::Value) {
    println!("{}", value);
}

fn emit_snapshot(session: &GameSession) {
    emit(json!({ "type": "snapshot", "state": session.snapshot() }));
}

fn squares(set: SquareSet) -> Vec<String> {
    set.into_iter().map(|sq| sq.to_string()).collect()
}

fn handle_position(session: &mut GameSession, args: &[&str]) {
    let result: anyhow::Result<GameSession> = (|| {
        if args.is_empty() {
            return Err(anyhow!("diagram expected"));
        }

        Ok(GameSession::from_diagram(args.join(" "))?)
    })();

    match result {
        Ok(new_session) => {
            *session = new_session;
            emit_snapshot(session);
        }
        Err(e) => println!("invalid position command: {}", e),
    }
}

fn handle_select(session: &mut GameSession, args: &[&str]) {
    let result: anyhow::Result<SelectOutcome> = (|| {
        let raw = args.first().ok_or_else(|| anyhow!("square expected"))?;
        let square = raw.parse::<Square>()?;
        Ok(session.select(square))
    })();

    match result {
        Ok(SelectOutcome::Selected { piece, targets }) => emit(json!({
            "type": "selected",
            "piece": piece.to_string(),
            "targets": squares(targets),
        })),
        Ok(SelectOutcome::Rejected) => emit(json!({ "type": "rejected" })),
        Err(e) => println!("invalid select command: {}", e),
    }
}

fn handle_target(session: &mut GameSession, args: &[&str]) {
    let result: anyhow::Result<MoveOutcome> = (|| {
        let raw = args.first().ok_or_else(|| anyhow!("square expected"))?;
        let square = raw.parse::<Square>()?;
        Ok(session.choose(square))
    })();

    match result {
        Ok(outcome) => emit(outcome_json(outcome)),
        Err(e) => println!("invalid target command: {}", e),
    }
}

fn handle_moves(session: &GameSession) {
    let mut moves: Vec<Move> = Vec::new();
    movegen::generate_moves(session.to_move(), session.board(), &mut moves);
    let rendered: Vec<String> = moves.iter().map(|mov| mov.to_string()).collect();
    emit(json!({ "type": "moves", "moves": rendered }));
}

fn outcome_json(outcome: MoveOutcome) -> serde_json::Value {
    match outcome {
        MoveOutcome::Rejected => json!({ "type": "rejected" }),
        MoveOutcome::Moved { from, to } => json!({
            "type": "move",
            "from": from.to_string(),
            "to": to.to_string(),
        }),
        MoveOutcome::Jumped {
            from,
            to,
            captured,
            chain_continues,
        } => json!({
            "type": "jump",
            "from": from.to_string(),
            "to": to.to_string(),
            "captured": captured.to_string(),
            "chain": chain_continues,
        }),
        MoveOutcome::Won {
            winner,
            from,
            to,
            captured,
        } => json!({
            "type": "win",
            "winner": winner,
            "from": from.to_string(),
            "to": to.to_string(),
            "captured": captured.to_string(),
        }),
    }
}
