//! The puzzle view: board, header and inline feedback around one session.

use std::sync::Arc;

use puzzle_core::shakmaty::uci::UciMove;
use puzzle_core::shakmaty::{Role, Square};
use puzzle_core::{AttemptOutcome, BoardSurface, Feedback, Puzzle, SessionError, SessionState, SolveSession};

/// Signals the view raises to whoever decides what to show next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalSignal {
    Solved,
    Closed,
}

#[derive(Debug)]
pub struct PuzzleModal {
    session: SolveSession,
    message: String,
}

impl PuzzleModal {
    /// Start a session and hand the surface its first configuration.
    pub fn open(puzzle: Arc<Puzzle>, surface: &mut impl BoardSurface) -> Result<Self, SessionError> {
        let session = SolveSession::start(puzzle)?;
        surface.configure(session.board_config(None));
        Ok(Self {
            session,
            message: String::new(),
        })
    }

    /// Move-completion handler for the board. Reconfigures the surface after
    /// every attempt, whatever its outcome.
    pub fn on_move(
        &mut self,
        surface: &mut impl BoardSurface,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<Option<ModalSignal>, SessionError> {
        let outcome = self.session.attempt_move(from, to, promotion)?;
        self.message = outcome.feedback.message().to_string();
        surface.configure(self.session.board_config(last_move(&outcome)));

        Ok((outcome.feedback == Feedback::Solved).then_some(ModalSignal::Solved))
    }

    /// "Next puzzle" without solving: asks for the same follow-up as a solve.
    pub fn request_next(&self) -> ModalSignal {
        ModalSignal::Solved
    }

    pub fn close(self) -> ModalSignal {
        ModalSignal::Closed
    }

    pub fn session(&self) -> &SolveSession {
        &self.session
    }

    pub fn puzzle(&self) -> &Arc<Puzzle> {
        self.session.puzzle()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// "N moves to find", or nothing once the puzzle is over.
    pub fn progress(&self) -> Option<String> {
        if self.session.is_solved() || self.session.state() == SessionState::Faulted {
            return None;
        }
        match self.session.remaining_user_moves() {
            1 => Some("1 move to find".to_string()),
            n => Some(format!("{n} moves to find")),
        }
    }
}

/// Squares to highlight after an attempt: the wrong try, or the latest move
/// on the board when the attempt was accepted.
fn last_move(outcome: &AttemptOutcome) -> Option<(Square, Square)> {
    if !outcome.is_consumed() {
        return None;
    }
    match (outcome.feedback, &outcome.reply) {
        (Feedback::Incorrect, _) => Some(outcome.attempted),
        (_, Some(UciMove::Normal { from, to, .. })) => Some((*from, *to)),
        _ => Some(outcome.attempted),
    }
}
