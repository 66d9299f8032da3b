//! Puzzle source error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Puzzle source unavailable: {0}")]
    Unavailable(String),

    #[error("Puzzle not found: {0}")]
    NotFound(String),

    #[error("Malformed puzzle data: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SourceError::Malformed(e.to_string())
        } else if e.is_timeout() {
            SourceError::Unavailable(format!("request timed out: {e}"))
        } else {
            SourceError::Unavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Malformed(e.to_string())
    }
}
