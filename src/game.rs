// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The game session: turn ownership, piece selection, move execution, and win detection.
//!
//! A [`GameSession`] owns the board and all per-game state and accepts exactly two events from the outside
//! world: a piece was selected ([`GameSession::select`]) and a target square was chosen
//! ([`GameSession::choose`]). Illegal events are rejected without mutating anything; the outcome value always
//! makes rejection distinguishable from success so a front-end can decide what to show. All rule evaluation
//! is synchronous; any pacing of animations between the jumps of a chain is the front-end's concern and is
//! modeled only by the host-driven busy latch.

use serde::Serialize;

use crate::board::{Board, DiagramParseError};
use crate::core::{self, Color, Move, Piece, Square, SquareSet};
use crate::movegen;

/// The diagram of the starting layout: twelve black men on the dark squares of ranks 6 through 8, twelve
/// white men on the dark squares of ranks 1 through 3, white to move.
pub const START_DIAGRAM: &str = "1b1b1b1b/b1b1b1b1/1b1b1b1b/8/8/w1w1w1w1/1w1w1w1w/w1w1w1w1 w";

/// The result of a selection event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The piece is now selected; `targets` are the destinations it may legally be moved to, for the
    /// front-end to highlight.
    Selected { piece: Square, targets: SquareSet },
    /// The selection was illegal and nothing changed.
    Rejected,
}

/// The result of a target-square event: what logically happened, for the front-end to animate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The target was illegal and nothing changed.
    Rejected,
    /// A simple advance was applied and the turn passed to the opponent.
    Moved { from: Square, to: Square },
    /// A jump was applied, capturing the man on `captured`. If `chain_continues` is true the same piece must
    /// jump again and the turn has not passed.
    Jumped {
        from: Square,
        to: Square,
        captured: Square,
        chain_continues: bool,
    },
    /// The jump captured the opponent's last man, ending the game.
    Won {
        winner: Color,
        from: Square,
        to: Square,
        captured: Square,
    },
}

/// A serializable view of the session for a front-end to draw from.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub to_move: Color,
    pub winner: Option<Color>,
    pub pieces: Vec<PieceSnapshot>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PieceSnapshot {
    pub color: Color,
    pub square: String,
}

/// One game of checkers in progress. Constructed per game; there is no ambient global state.
#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    to_move: Color,
    selected: Option<Square>,
    forced: Option<Square>,
    winner: Option<Color>,
    busy: bool,
    history: Vec<Move>,
}

impl GameSession {
    /// Creates a session with the deterministic starting layout.
    pub fn new() -> GameSession {
        GameSession::from_diagram(START_DIAGRAM).unwrap()
    }

    /// Creates a session from a full diagram: a placement field followed by the side to move.
    pub fn from_diagram(diagram: impl AsRef<str>) -> Result<GameSession, DiagramParseError> {
        let mut fields = diagram.as_ref().split_whitespace();
        let placement = fields.next().ok_or(DiagramParseError::UnexpectedEnd)?;
        let side = fields.next().ok_or(DiagramParseError::UnexpectedEnd)?;

        let board = Board::from_diagram(placement)?;
        let to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(DiagramParseError::InvalidSideToMove),
        };

        Ok(GameSession {
            board,
            to_move,
            selected: None,
            forced: None,
            winner: None,
            busy: false,
            history: Vec::new(),
        })
    }

    pub fn as_diagram(&self) -> String {
        let side = match self.to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!("{} {}", self.board.as_diagram(), side)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn forced(&self) -> Option<Square> {
        self.forced
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The destinations the man on `square` may legally be moved to right now, or the empty set if the square
    /// is empty.
    pub fn legal_destinations(&self, square: Square) -> SquareSet {
        match self.board.piece_at(square) {
            Some(piece) => movegen::legal_destinations(&self.board, piece),
            None => SquareSet::empty(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut pieces = Vec::new();
        for color in core::colors() {
            for square in self.board.pieces(color) {
                pieces.push(PieceSnapshot {
                    color,
                    square: square.to_string(),
                });
            }
        }

        Snapshot {
            to_move: self.to_move,
            winner: self.winner,
            pieces,
        }
    }

    /// While the latch is held, `select` and `choose` reject all events. The engine never sets the latch
    /// itself; a front-end holds it while a movement animation is settling so that clicks arriving mid-flight
    /// are ignored.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_busy(&mut self) {
        self.busy = true;
    }

    pub fn set_resolved(&mut self) {
        self.busy = false;
    }
}

impl GameSession {
    /// Handles a "piece selected" event. The selection is rejected if the game is over, the latch is held,
    /// the square does not hold a man of the side to move, or a chain is in progress and a different piece
    /// was named. A successful selection replaces any prior one and reports the legal destinations for
    /// highlighting; legality is re-derived independently at commit time in [`GameSession::choose`].
    pub fn select(&mut self, square: Square) -> SelectOutcome {
        if self.winner.is_some() || self.busy {
            return SelectOutcome::Rejected;
        }

        if let Some(forced) = self.forced {
            if square != forced {
                return SelectOutcome::Rejected;
            }
        }

        let piece = match self.board.piece_at(square) {
            Some(piece) if piece.color == self.to_move => piece,
            _ => return SelectOutcome::Rejected,
        };

        self.selected = Some(square);
        let targets = movegen::legal_destinations(&self.board, piece);
        tracing::debug!(piece = %square, side = %piece.color, "piece selected");
        SelectOutcome::Selected {
            piece: square,
            targets,
        }
    }

    /// Handles a "target square chosen" event for the currently selected piece.
    ///
    /// The legal move and jump sets are recomputed here rather than trusted from selection time. A simple
    /// advance is rejected outright while the piece has a jump available. After a jump, the jump set is
    /// recomputed from the landing square: if it is non-empty the same piece is pinned as forced and the turn
    /// is held, otherwise selection clears and the turn passes. The win detector runs after every capture.
    pub fn choose(&mut self, target: Square) -> MoveOutcome {
        if self.winner.is_some() || self.busy {
            return MoveOutcome::Rejected;
        }

        let source = match self.selected {
            Some(source) => source,
            None => return MoveOutcome::Rejected,
        };

        let piece = self
            .board
            .piece_at(source)
            .expect("selected square holds no piece");
        let jumps = movegen::jump_moves(&self.board, piece);
        let simples = movegen::simple_moves(&self.board, piece);

        if !jumps.is_empty() && !jumps.contains(target) {
            // Mandatory capture: while a jump exists, every other target is illegal, simple advances
            // included.
            return MoveOutcome::Rejected;
        }

        if !jumps.contains(target) && !simples.contains(target) {
            return MoveOutcome::Rejected;
        }

        if jumps.contains(target) {
            self.apply_jump(Move::jump(source, target))
        } else {
            self.apply_advance(Move::advance(source, target))
        }
    }

    fn apply_advance(&mut self, mov: Move) -> MoveOutcome {
        self.relocate(mov);
        self.history.push(mov);
        self.selected = None;
        self.to_move = self.to_move.toggle();
        tracing::debug!(%mov, next = %self.to_move, "advance applied, turn switched");
        MoveOutcome::Moved {
            from: mov.source(),
            to: mov.destination(),
        }
    }

    fn apply_jump(&mut self, mov: Move) -> MoveOutcome {
        let us = self.to_move;
        let captured = mov.captured_square();
        let victim = self
            .board
            .remove_piece(captured)
            .expect("jump over an empty square");
        debug_assert!(victim.color != us, "jump over a friendly piece");
        self.relocate(mov);
        self.history.push(mov);

        if self.board.count(us.toggle()) == 0 {
            self.winner = Some(us);
            self.selected = None;
            self.forced = None;
            tracing::debug!(winner = %us, "game won");
            return MoveOutcome::Won {
                winner: us,
                from: mov.source(),
                to: mov.destination(),
                captured,
            };
        }

        let landed = self
            .board
            .piece_at(mov.destination())
            .expect("jumped piece missing from landing square");
        let chain_continues = !movegen::jump_moves(&self.board, landed).is_empty();
        if chain_continues {
            self.forced = Some(mov.destination());
            self.selected = Some(mov.destination());
            tracing::debug!(%mov, captured = %captured, "jump applied, chain continues");
        } else {
            self.forced = None;
            self.selected = None;
            self.to_move = us.toggle();
            tracing::debug!(%mov, captured = %captured, next = %self.to_move, "jump applied, turn switched");
        }

        MoveOutcome::Jumped {
            from: mov.source(),
            to: mov.destination(),
            captured,
            chain_continues,
        }
    }

    fn relocate(&mut self, mov: Move) {
        let piece = self
            .board
            .remove_piece(mov.source())
            .expect("no piece at move source");
        self.board
            .add_piece(Piece {
                square: mov.destination(),
                ..piece
            })
            .expect("move destination occupied");
    }
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{GameSession, MoveOutcome, SelectOutcome, START_DIAGRAM};
    use crate::core::*;

    fn session(diagram: &'static str) -> GameSession {
        GameSession::from_diagram(diagram).unwrap()
    }

    fn assert_selected(outcome: SelectOutcome) -> SquareSet {
        match outcome {
            SelectOutcome::Selected { targets, .. } => targets,
            SelectOutcome::Rejected => panic!("selection was rejected"),
        }
    }

    mod setup {
        use super::*;

        #[test]
        fn initial_layout() {
            let session = GameSession::new();
            assert_eq!(Color::White, session.to_move());
            assert_eq!(12, session.board().count(Color::White));
            assert_eq!(12, session.board().count(Color::Black));
            assert!(session.winner().is_none());

            // Spot checks: the corners of each camp.
            assert_eq!(Color::White, session.board().piece_at(A1).unwrap().color);
            assert_eq!(Color::White, session.board().piece_at(G3).unwrap().color);
            assert_eq!(Color::Black, session.board().piece_at(B8).unwrap().color);
            assert_eq!(Color::Black, session.board().piece_at(H6).unwrap().color);
            assert!(session.board().is_empty(D4));
        }

        #[test]
        fn diagram_roundtrip() {
            let session = GameSession::new();
            assert_eq!(START_DIAGRAM, session.as_diagram());
        }

        #[test]
        fn diagram_missing_side() {
            let err = GameSession::from_diagram("8/8/8/8/8/8/8/8").unwrap_err();
            assert_eq!(crate::board::DiagramParseError::UnexpectedEnd, err);
        }

        #[test]
        fn diagram_bad_side() {
            let err = GameSession::from_diagram("8/8/8/8/8/8/8/8 x").unwrap_err();
            assert_eq!(crate::board::DiagramParseError::InvalidSideToMove, err);
        }
    }

    mod selection {
        use super::*;

        #[test]
        fn select_own_piece() {
            let mut session = GameSession::new();
            let targets = assert_selected(session.select(C3));
            assert!(targets.contains(B4));
            assert!(targets.contains(D4));
            assert_eq!(Some(C3), session.selected());
        }

        #[test]
        fn select_opponent_piece_rejected() {
            let mut session = GameSession::new();
            assert_eq!(SelectOutcome::Rejected, session.select(B6));
            assert!(session.selected().is_none());
        }

        #[test]
        fn select_empty_square_rejected() {
            let mut session = GameSession::new();
            assert_eq!(SelectOutcome::Rejected, session.select(D4));
        }

        #[test]
        fn reselection_replaces_selection() {
            let mut session = GameSession::new();
            assert_selected(session.select(C3));
            assert_selected(session.select(E3));
            assert_eq!(Some(E3), session.selected());
        }

        #[test]
        fn highlight_shows_jumps_only_when_jump_exists() {
            let mut session = session("8/8/8/8/3b4/2w5/8/8 w");
            let targets = assert_selected(session.select(C3));
            assert!(targets.contains(E5));
            assert_eq!(1, targets.len());
        }

        #[test]
        fn busy_latch_rejects_events() {
            let mut session = GameSession::new();
            session.set_busy();
            assert!(session.is_busy());
            assert_eq!(SelectOutcome::Rejected, session.select(C3));
            assert_eq!(MoveOutcome::Rejected, session.choose(D4));

            session.set_resolved();
            assert_selected(session.select(C3));
        }
    }

    mod moves {
        use super::*;

        #[test]
        fn simple_move_switches_turn() {
            // Scenario: a lone white man advances and the turn passes.
            let mut session = session("8/8/8/8/8/2w5/8/8 w");
            assert_selected(session.select(C3));
            assert_eq!(
                MoveOutcome::Moved { from: C3, to: B4 },
                session.choose(B4)
            );
            assert_eq!(Color::Black, session.to_move());
            assert!(session.board().is_empty(C3));
            assert_eq!(Color::White, session.board().piece_at(B4).unwrap().color);
            assert!(session.selected().is_none());
        }

        #[test]
        fn choose_without_selection_rejected() {
            let mut session = GameSession::new();
            assert_eq!(MoveOutcome::Rejected, session.choose(D4));
        }

        #[test]
        fn illegal_target_rejected() {
            let mut session = GameSession::new();
            assert_selected(session.select(C3));
            assert_eq!(MoveOutcome::Rejected, session.choose(C5));
            // The rejection left the selection and the turn alone.
            assert_eq!(Some(C3), session.selected());
            assert_eq!(Color::White, session.to_move());
        }

        #[test]
        fn turn_alternates_across_moves() {
            let mut session = GameSession::new();
            assert_selected(session.select(C3));
            assert!(matches!(session.choose(D4), MoveOutcome::Moved { .. }));
            assert_eq!(Color::Black, session.to_move());

            assert_selected(session.select(B6));
            assert!(matches!(session.choose(A5), MoveOutcome::Moved { .. }));
            assert_eq!(Color::White, session.to_move());
        }

        #[test]
        fn history_records_moves() {
            let mut session = GameSession::new();
            assert_selected(session.select(C3));
            session.choose(D4);
            assert_eq!(session.history(), [Move::advance(C3, D4)]);
        }
    }

    mod jumps {
        use super::*;

        #[test]
        fn jump_captures_and_switches_turn() {
            // White jumps c3xe5; the black man on d4 is captured and, with no further jump from e5, the
            // turn passes to black.
            let mut session = session("1b6/8/8/8/3b4/2w5/8/8 w");
            assert_selected(session.select(C3));
            assert_eq!(
                MoveOutcome::Jumped {
                    from: C3,
                    to: E5,
                    captured: D4,
                    chain_continues: false,
                },
                session.choose(E5)
            );
            assert_eq!(1, session.board().count(Color::Black));
            assert!(session.board().is_empty(D4));
            assert_eq!(Color::White, session.board().piece_at(E5).unwrap().color);
            assert_eq!(Color::Black, session.to_move());
            assert!(session.forced().is_none());
        }

        #[test]
        fn mandatory_capture_rejects_simple_move() {
            let mut session = session("1b6/8/8/8/3b4/2w5/8/8 w");
            assert_selected(session.select(C3));
            assert_eq!(MoveOutcome::Rejected, session.choose(B4));
            assert_eq!(Color::White, session.to_move());
            assert_eq!(2, session.board().count(Color::Black));
        }

        #[test]
        fn chain_pins_piece_and_holds_turn() {
            // White jumps c3xe5, after which e5xc7 is immediately available: the turn is held and the
            // jumping piece is forced.
            let mut session = session("8/b7/3b4/8/3b4/2w5/8/w7 w");
            assert_selected(session.select(C3));
            assert_eq!(
                MoveOutcome::Jumped {
                    from: C3,
                    to: E5,
                    captured: D4,
                    chain_continues: true,
                },
                session.choose(E5)
            );
            assert_eq!(Color::White, session.to_move());
            assert_eq!(Some(E5), session.forced());
            assert_eq!(Some(E5), session.selected());

            // No other piece may be selected while the chain is open.
            assert_eq!(SelectOutcome::Rejected, session.select(A1));

            // Re-selecting the forced piece is allowed and highlights only the continuation.
            let targets = assert_selected(session.select(E5));
            assert!(targets.contains(C7));
            assert_eq!(1, targets.len());

            assert_eq!(
                MoveOutcome::Jumped {
                    from: E5,
                    to: C7,
                    captured: D6,
                    chain_continues: false,
                },
                session.choose(C7)
            );
            assert_eq!(Color::Black, session.to_move());
            assert!(session.forced().is_none());
            assert_eq!(1, session.board().count(Color::Black));
        }

        #[test]
        fn chain_turn_switches_only_at_end() {
            let mut session = session("8/b7/3b4/8/3b4/2w5/8/w7 w");
            assert_selected(session.select(C3));
            session.choose(E5);
            assert_eq!(Color::White, session.to_move());
            session.choose(C7);
            assert_eq!(Color::Black, session.to_move());
        }
    }

    mod win {
        use super::*;

        #[test]
        fn capturing_last_man_wins() {
            let mut session = session("8/8/8/8/3b4/2w5/8/8 w");
            assert_selected(session.select(C3));
            assert_eq!(
                MoveOutcome::Won {
                    winner: Color::White,
                    from: C3,
                    to: E5,
                    captured: D4,
                },
                session.choose(E5)
            );
            assert!(session.is_over());
            assert_eq!(Some(Color::White), session.winner());
            assert_eq!(0, session.board().count(Color::Black));
        }

        #[test]
        fn finished_game_rejects_all_events() {
            let mut session = session("8/8/8/8/3b4/2w5/8/8 w");
            assert_selected(session.select(C3));
            session.choose(E5);

            assert_eq!(SelectOutcome::Rejected, session.select(E5));
            assert_eq!(MoveOutcome::Rejected, session.choose(D6));
        }

        #[test]
        fn black_can_win_too() {
            let mut session = session("8/8/8/2b5/3w4/8/8/8 b");
            assert_selected(session.select(C5));
            assert_eq!(
                MoveOutcome::Won {
                    winner: Color::Black,
                    from: C5,
                    to: E3,
                    captured: D4,
                },
                session.choose(E3)
            );
            assert_eq!(Some(Color::Black), session.winner());
        }
    }

    mod playout {
        use super::*;
        use crate::movegen;
        use rand::{rngs::SmallRng, Rng, SeedableRng};

        // Drives whole games through the public API. Every selection and every chosen target comes from
        // the engine's own legal move sets, so any rejection is a bug; piece counts may only ever shrink.
        #[test]
        fn random_playouts_stay_legal() {
            for seed in 0..4u64 {
                let mut rng = SmallRng::seed_from_u64(seed);
                let mut session = GameSession::new();
                let mut plies = 0;
                while session.winner().is_none() && plies < 500 {
                    let mov = match session.forced() {
                        Some(forced) => {
                            let targets: Vec<_> =
                                session.legal_destinations(forced).into_iter().collect();
                            Move::jump(forced, targets[rng.gen_range(0..targets.len())])
                        }
                        None => {
                            let mut moves = Vec::new();
                            movegen::generate_moves(session.to_move(), session.board(), &mut moves);
                            if moves.is_empty() {
                                break;
                            }

                            moves[rng.gen_range(0..moves.len())]
                        }
                    };

                    let white_before = session.board().count(Color::White);
                    let black_before = session.board().count(Color::Black);
                    assert_ne!(SelectOutcome::Rejected, session.select(mov.source()));
                    assert_ne!(MoveOutcome::Rejected, session.choose(mov.destination()));
                    assert!(session.board().count(Color::White) <= white_before);
                    assert!(session.board().count(Color::Black) <= black_before);
                    plies += 1;
                }

                if let Some(winner) = session.winner() {
                    assert_eq!(0, session.board().count(winner.toggle()));
                }
            }
        }
    }

    mod queries {
        use super::*;

        #[test]
        fn legal_destinations_of_empty_square() {
            let session = GameSession::new();
            assert!(session.legal_destinations(D4).is_empty());
        }

        #[test]
        fn snapshot_reflects_state() {
            let session = GameSession::new();
            let snapshot = session.snapshot();
            assert_eq!(Color::White, snapshot.to_move);
            assert!(snapshot.winner.is_none());
            assert_eq!(24, snapshot.pieces.len());
        }
    }
}
