//! Error types for the rules engine and solve sessions.

use thiserror::Error;

use crate::puzzle::PuzzleId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Illegal move: {0}")]
    IllegalMove(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid puzzle {id}: {reason}")]
    InvalidPuzzle { id: PuzzleId, reason: String },

    #[error("Corrupt puzzle data in {id}: scripted move {mv} at index {index} is illegal")]
    CorruptPuzzleData {
        id: PuzzleId,
        index: usize,
        mv: String,
    },

    #[error("Could not take back {mv} in {id}: position no longer matches")]
    UndoFailed { id: PuzzleId, mv: String },

    #[error("Puzzle {0} is already solved")]
    AlreadySolved(PuzzleId),
}

impl SessionError {
    /// The session cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::CorruptPuzzleData { .. } | SessionError::UndoFailed { .. }
        )
    }
}
