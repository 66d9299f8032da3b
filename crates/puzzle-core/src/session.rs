//! Solve session: one puzzle attempt, move by move.
//!
//! The user plays the even-indexed moves of the solution; each correct move is
//! answered immediately by the scripted reply at the next odd index. Wrong but
//! legal moves are taken back, illegal ones never reach the position.

use std::sync::Arc;

use shakmaty::uci::UciMove;
use shakmaty::{Color, Role, Square};
use tracing::{debug, error, info};

use crate::board::BoardConfig;
use crate::error::SessionError;
use crate::puzzle::Puzzle;
use crate::rules::{parse_uci_move, ChessRules, LegalDestinations, RulesEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Illegal,
    Incorrect,
    Solved,
}

impl Feedback {
    /// Inline text shown next to the board.
    pub fn message(self) -> &'static str {
        match self {
            Feedback::None => "",
            Feedback::Correct => "Correct move!",
            Feedback::Illegal => "Illegal move!",
            Feedback::Incorrect => "Try again",
            Feedback::Solved => "Puzzle solved!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    AwaitingUserMove,
    Solved,
    /// The stored solution turned out to be unplayable, or a wrong move
    /// could not be taken back.
    Faulted,
}

/// Result of one `attempt_move` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    pub feedback: Feedback,
    pub fen: String,
    pub cursor: usize,
    pub attempted: (Square, Square),
    /// The user's move as played; `None` when it was illegal.
    pub played: Option<UciMove>,
    /// Scripted reply played on the user's behalf.
    pub reply: Option<UciMove>,
}

impl AttemptOutcome {
    /// False when the board must snap the piece back.
    pub fn is_consumed(&self) -> bool {
        self.feedback != Feedback::Illegal
    }
}

#[derive(Debug)]
pub struct SolveSession<E = ChessRules> {
    puzzle: Arc<Puzzle>,
    solution: Vec<UciMove>,
    engine: E,
    cursor: usize,
    feedback: Feedback,
    user_color: Color,
    /// Set once the session hits a fatal error; replayed on every later attempt.
    fault: Option<SessionError>,
}

impl SolveSession<ChessRules> {
    pub fn start(puzzle: Arc<Puzzle>) -> Result<Self, SessionError> {
        let engine = ChessRules::from_fen(&puzzle.fen).map_err(|e| SessionError::InvalidPuzzle {
            id: puzzle.id.clone(),
            reason: e.to_string(),
        })?;
        Self::with_engine(puzzle, engine)
    }
}

impl<E: RulesEngine> SolveSession<E> {
    /// Start a session on an engine already set up at the puzzle's position.
    pub fn with_engine(puzzle: Arc<Puzzle>, engine: E) -> Result<Self, SessionError> {
        let invalid = |reason: String| SessionError::InvalidPuzzle {
            id: puzzle.id.clone(),
            reason,
        };

        if puzzle.moves.is_empty() {
            return Err(invalid("no expected moves".to_string()));
        }

        let solution = puzzle
            .moves
            .iter()
            .enumerate()
            .map(|(i, text)| {
                parse_uci_move(text)
                    .ok_or_else(|| invalid(format!("move {i} '{text}' is not a UCI move")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let user_color = engine.turn();
        debug!(
            puzzle = %puzzle.id,
            moves = solution.len(),
            ?user_color,
            "Session started"
        );

        Ok(Self {
            puzzle,
            solution,
            engine,
            cursor: 0,
            feedback: Feedback::None,
            user_color,
            fault: None,
        })
    }

    /// Validate and play a user move. Illegal and incorrect moves are reported
    /// through the feedback and leave the position untouched; an engine that
    /// cannot restore the position faults the session.
    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<AttemptOutcome, SessionError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if self.state() == SessionState::Solved {
            return Err(SessionError::AlreadySolved(self.puzzle.id.clone()));
        }

        debug!(puzzle = %self.puzzle.id, cursor = self.cursor, %from, %to, "Move attempted");

        let before_fen = self.engine.fen();
        let before_dests = self.engine.legal_destinations();
        let played = match self.engine.apply(from, to, promotion) {
            Ok(played) => played,
            Err(e) => {
                self.feedback = Feedback::Illegal;
                info!(puzzle = %self.puzzle.id, %from, %to, reason = "illegal", "Move rejected: {e}");
                return Ok(self.outcome((from, to), None, None));
            }
        };

        let expected = &self.solution[self.cursor];
        if !matches_expected(&played, expected) {
            info!(
                puzzle = %self.puzzle.id,
                %played,
                %expected,
                reason = "incorrect",
                "Move rejected"
            );
            let restored = self.engine.undo()
                && self.engine.fen() == before_fen
                && self.engine.legal_destinations() == before_dests;
            if !restored {
                return Err(self.fail(SessionError::UndoFailed {
                    id: self.puzzle.id.clone(),
                    mv: played.to_string(),
                }));
            }
            self.feedback = Feedback::Incorrect;
            return Ok(self.outcome((from, to), Some(played), None));
        }

        self.feedback = Feedback::Correct;
        self.cursor += 1;
        info!(puzzle = %self.puzzle.id, %played, cursor = self.cursor, "Move accepted");

        let reply = match self.solution.get(self.cursor).cloned() {
            Some(scripted) => {
                self.play_reply(&scripted)?;
                Some(scripted)
            }
            None => None,
        };

        if self.cursor == self.solution.len() {
            self.feedback = Feedback::Solved;
            info!(puzzle = %self.puzzle.id, "Puzzle solved");
        }

        Ok(self.outcome((from, to), Some(played), reply))
    }

    fn play_reply(&mut self, scripted: &UciMove) -> Result<(), SessionError> {
        let applied = match scripted {
            UciMove::Normal { from, to, promotion } => self.engine.apply(*from, *to, *promotion).is_ok(),
            _ => false,
        };

        if !applied {
            return Err(self.fail(SessionError::CorruptPuzzleData {
                id: self.puzzle.id.clone(),
                index: self.cursor,
                mv: self.puzzle.moves[self.cursor].clone(),
            }));
        }

        self.cursor += 1;
        debug!(puzzle = %self.puzzle.id, reply = %scripted, cursor = self.cursor, "Reply auto-played");
        Ok(())
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        error!(puzzle = %self.puzzle.id, "{err}");
        self.fault = Some(err.clone());
        err
    }

    fn outcome(
        &self,
        attempted: (Square, Square),
        played: Option<UciMove>,
        reply: Option<UciMove>,
    ) -> AttemptOutcome {
        AttemptOutcome {
            feedback: self.feedback,
            fen: self.engine.fen(),
            cursor: self.cursor,
            attempted,
            played,
            reply,
        }
    }

    /// Legal moves in the live position; nothing once the session is over.
    pub fn legal_destinations(&self) -> LegalDestinations {
        match self.state() {
            SessionState::Solved | SessionState::Faulted => LegalDestinations::default(),
            SessionState::Ready | SessionState::AwaitingUserMove => self.engine.legal_destinations(),
        }
    }

    /// Fresh board configuration for the current live position.
    pub fn board_config(&self, last_move: Option<(Square, Square)>) -> BoardConfig {
        BoardConfig {
            fen: self.engine.fen(),
            board: self.engine.board().clone(),
            orientation: self.user_color,
            turn: self.engine.turn(),
            dests: self.legal_destinations(),
            last_move,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.fault.is_some() {
            SessionState::Faulted
        } else if self.cursor == self.solution.len() {
            SessionState::Solved
        } else if self.cursor == 0 && self.feedback == Feedback::None {
            SessionState::Ready
        } else {
            SessionState::AwaitingUserMove
        }
    }

    pub fn fen(&self) -> String {
        self.engine.fen()
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn puzzle(&self) -> &Arc<Puzzle> {
        &self.puzzle
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn user_color(&self) -> Color {
        self.user_color
    }

    pub fn turn(&self) -> Color {
        self.engine.turn()
    }

    pub fn is_solved(&self) -> bool {
        self.state() == SessionState::Solved
    }

    /// Moves the user still has to find.
    pub fn remaining_user_moves(&self) -> usize {
        (self.solution.len() - self.cursor).div_ceil(2)
    }
}

/// Expected moves without a promotion letter count as queen promotions.
fn matches_expected(played: &UciMove, expected: &UciMove) -> bool {
    match (played, expected) {
        (
            UciMove::Normal {
                from: played_from,
                to: played_to,
                promotion: played_promotion,
            },
            UciMove::Normal {
                from: expected_from,
                to: expected_to,
                promotion: expected_promotion,
            },
        ) => {
            let expected_promotion = expected_promotion.or(played_promotion.map(|_| Role::Queen));
            played_from == expected_from
                && played_to == expected_to
                && *played_promotion == expected_promotion
        }
        _ => false,
    }
}
