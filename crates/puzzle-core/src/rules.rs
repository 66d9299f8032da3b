//! Chess rules capability consumed by solve sessions.
//!
//! `RulesEngine` is the seam: sessions only need legal destinations, apply,
//! undo and side to move. `ChessRules` is the shakmaty-backed implementation.

use std::collections::BTreeMap;

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Board, CastlingMode, Chess, Color, EnPassantMode, Position, Rank, Role, Square};

use crate::error::RulesError;

/// Origin square -> legal destination squares, both ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalDestinations(BTreeMap<Square, Vec<Square>>);

impl LegalDestinations {
    pub fn insert(&mut self, from: Square, to: Square) {
        let dests = self.0.entry(from).or_default();
        if let Err(idx) = dests.binary_search(&to) {
            dests.insert(idx, to);
        }
    }

    /// Destinations for a piece on `from` (empty if it cannot move).
    pub fn get(&self, from: Square) -> &[Square] {
        self.0.get(&from).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, from: Square, to: Square) -> bool {
        self.get(from).contains(&to)
    }

    pub fn origins(&self) -> impl Iterator<Item = Square> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, &[Square])> + '_ {
        self.0.iter().map(|(from, dests)| (*from, dests.as_slice()))
    }

    /// Number of (origin, destination) pairs.
    pub fn move_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a solve session needs from a chess rules implementation.
pub trait RulesEngine {
    /// Legal destinations for the side to move in the current position.
    fn legal_destinations(&self) -> LegalDestinations;

    /// Play `from`->`to` if legal. A pawn reaching the last rank without a
    /// promotion hint promotes to a queen. Returns the move as standard UCI.
    fn apply(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<UciMove, RulesError>;

    /// Take back the last applied move. Returns false if nothing to undo.
    fn undo(&mut self) -> bool;

    fn turn(&self) -> Color;

    fn fen(&self) -> String;

    fn board(&self) -> &Board;
}

/// Standard chess rules on top of `shakmaty::Chess`.
#[derive(Debug, Clone, Default)]
pub struct ChessRules {
    position: Chess,
    history: Vec<Chess>,
}

impl ChessRules {
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let invalid = |reason: String| RulesError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };

        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;

        Ok(Self {
            position,
            history: Vec::new(),
        })
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    fn promotion_for(&self, from: Square, to: Square, hint: Option<Role>) -> Option<Role> {
        hint.or_else(|| {
            let is_pawn = self
                .position
                .board()
                .piece_at(from)
                .is_some_and(|p| p.role == Role::Pawn);
            let last_rank = matches!(to.rank(), Rank::First | Rank::Eighth);
            (is_pawn && last_rank).then_some(Role::Queen)
        })
    }
}

impl RulesEngine for ChessRules {
    fn legal_destinations(&self) -> LegalDestinations {
        let mut dests = LegalDestinations::default();
        for mv in &self.position.legal_moves() {
            // Standard mode reports castling as the king's two-square step.
            if let UciMove::Normal { from, to, .. } = mv.to_uci(CastlingMode::Standard) {
                dests.insert(from, to);
            }
        }
        dests
    }

    fn apply(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<UciMove, RulesError> {
        let uci = UciMove::Normal {
            from,
            to,
            promotion: self.promotion_for(from, to, promotion),
        };
        let mv = uci
            .to_move(&self.position)
            .map_err(|_| RulesError::IllegalMove(uci.to_string()))?;

        // King-takes-rook castling is accepted by shakmaty but is not a
        // destination we hand out.
        let played = mv.to_uci(CastlingMode::Standard);
        if !matches!(played, UciMove::Normal { from: f, to: t, .. } if f == from && t == to) {
            return Err(RulesError::IllegalMove(uci.to_string()));
        }

        self.history.push(self.position.clone());
        self.position.play_unchecked(mv);
        Ok(played)
    }

    fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.position = previous;
                true
            }
            None => false,
        }
    }

    fn turn(&self) -> Color {
        self.position.turn()
    }

    fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    fn board(&self) -> &Board {
        self.position.board()
    }
}

/// Parse a plain `from`+`to`(+promotion) UCI move. Null moves and drops are
/// not valid puzzle moves.
pub fn parse_uci_move(text: &str) -> Option<UciMove> {
    match text.trim().parse::<UciMove>() {
        Ok(mv @ UciMove::Normal { .. }) => Some(mv),
        _ => None,
    }
}
