//! Wire format of the puzzle API and its normalization into [`Puzzle`].
//!
//! Records come in slightly different shapes depending on the endpoint:
//! `/puzzles` and `/puzzle/{id}` use `id`, `/similar` uses `puzzle_id`;
//! `themes` may be missing or null. Everything is folded into one canonical
//! `Puzzle` here so nothing downstream sees the variants.

use puzzle_core::{Puzzle, PuzzleId};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::SourceError;

/// A list of strings, or one whitespace-separated string (the dataset's CSV
/// form, e.g. `"e8d7 a2e6 d7d8 f7f8"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    List(Vec<String>),
    Line(String),
}

impl StringList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StringList::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            StringList::Line(line) => line.split_whitespace().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPuzzle {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub puzzle_id: Option<String>,
    #[serde(default)]
    pub fen: Option<String>,
    #[serde(default)]
    pub moves: Option<StringList>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub themes: Option<StringList>,
}

impl RawPuzzle {
    pub fn normalize(self) -> Result<Puzzle, SourceError> {
        let id = self
            .id
            .or(self.puzzle_id)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SourceError::Malformed("record has neither 'id' nor 'puzzle_id'".into()))?;

        Ok(Puzzle {
            id: PuzzleId::new(id),
            fen: self.fen.unwrap_or_default(),
            moves: self.moves.map(StringList::into_vec).unwrap_or_default(),
            rating: self.rating.map(|r| r.round() as i32).unwrap_or(0),
            themes: self.themes.map(StringList::into_vec).unwrap_or_default(),
        })
    }
}

/// `GET /puzzles`
#[derive(Debug, Deserialize)]
pub struct DiverseEnvelope {
    #[serde(default)]
    pub puzzles: Vec<Value>,
}

/// `GET /similar`
#[derive(Debug, Deserialize)]
pub struct SimilarEnvelope {
    #[serde(default)]
    pub query_puzzle_id: Option<String>,
    #[serde(default)]
    pub results: Vec<Value>,
}

/// `GET /puzzle/{id}`
#[derive(Debug, Deserialize)]
pub struct DetailEnvelope {
    #[serde(default)]
    pub puzzle: Option<Value>,
}

pub fn parse_record(value: Value) -> Result<Puzzle, SourceError> {
    serde_json::from_value::<RawPuzzle>(value)?.normalize()
}

/// Parse a list of records, skipping (and logging) the malformed ones.
pub fn parse_records(values: Vec<Value>) -> Vec<Puzzle> {
    values
        .into_iter()
        .filter_map(|value| match parse_record(value) {
            Ok(puzzle) => Some(puzzle),
            Err(e) => {
                warn!("Skipping puzzle record: {e}");
                None
            }
        })
        .collect()
}
