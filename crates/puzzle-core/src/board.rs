//! Board interaction surface: the widget that shows a position and lets the
//! user drag pieces.
//!
//! Every transition hands the surface a fresh [`BoardConfig`]; the surface
//! never keeps handler state of its own between configurations.

use shakmaty::{Board, Color, Square};

use crate::rules::LegalDestinations;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub fen: String,
    pub board: Board,
    /// Side shown at the bottom; always the solving side.
    pub orientation: Color,
    pub turn: Color,
    /// Only these moves may be dragged. Empty when the puzzle is finished.
    pub dests: LegalDestinations,
    pub last_move: Option<(Square, Square)>,
}

impl BoardConfig {
    pub fn is_interactive(&self) -> bool {
        !self.dests.is_empty()
    }
}

pub trait BoardSurface {
    fn configure(&mut self, config: BoardConfig);
}
