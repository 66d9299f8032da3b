//! Puzzle records as delivered by the puzzle source.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a puzzle in the source dataset (e.g. Lichess puzzle ids).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PuzzleId(String);

impl PuzzleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for PuzzleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PuzzleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A puzzle as loaded from the source. Never mutated once built;
/// sessions share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: PuzzleId,
    /// Starting position.
    pub fen: String,
    /// Expected half-moves in UCI (`f3g5`, `e7e8q`), alternating
    /// user move / scripted reply.
    pub moves: Vec<String>,
    pub rating: i32,
    pub themes: Vec<String>,
}

impl Puzzle {
    /// Theme used to label the puzzle in the grid.
    pub fn primary_theme(&self) -> &str {
        self.themes.first().map(String::as_str).unwrap_or("Other")
    }

    /// Header line shown above the board: `"{id} · {rating}"`.
    pub fn title(&self) -> String {
        format!("{} · {}", self.id, self.rating)
    }

    pub fn themes_line(&self) -> String {
        self.themes.join(", ")
    }
}
