use std::env;

use reqwest::Url;

use crate::error::SourceError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceConfig {
    /// Base URL of the puzzle API
    pub api_url: String,
    /// Puzzles requested for the grid
    pub limit: u32,
    /// Similar puzzles requested per lookup
    pub top_k: u32,
    /// Upper rating bound for every query
    pub max_rating: u32,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            limit: 15,
            top_k: 15,
            max_rating: 2100,
            timeout_secs: 10,
        }
    }
}

impl SourceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("PUZZLE_API_URL").unwrap_or(defaults.api_url),
            limit: env::var("PUZZLE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.limit),
            top_k: env::var("PUZZLE_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.top_k),
            max_rating: env::var("PUZZLE_MAX_RATING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_rating),
            timeout_secs: env::var("PUZZLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
        .clamped()
    }

    /// Keep query parameters inside the ranges the API accepts. A zero
    /// timeout would fail every request, so it becomes one second.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, 50),
            top_k: self.top_k.clamp(1, 100),
            max_rating: self.max_rating.clamp(300, 4000),
            timeout_secs: self.timeout_secs.max(1),
            ..self
        }
    }

    /// URL for an API path given as raw segments; each segment is
    /// percent-encoded, so ids containing `?`, `#` or `/` stay one segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let invalid = || SourceError::Unavailable(format!("invalid API URL: {}", self.api_url));

        let mut url = Url::parse(&self.api_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
