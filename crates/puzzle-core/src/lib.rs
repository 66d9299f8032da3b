pub use shakmaty;

pub mod board;
pub mod error;
pub mod puzzle;
pub mod rules;
pub mod session;

pub use board::{BoardConfig, BoardSurface};
pub use error::{RulesError, SessionError};
pub use puzzle::{Puzzle, PuzzleId};
pub use rules::{ChessRules, LegalDestinations, RulesEngine};
pub use session::{AttemptOutcome, Feedback, SessionState, SolveSession};
