use std::time::Duration;

use puzzle_core::{Puzzle, PuzzleId};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::wire::{parse_record, parse_records, DetailEnvelope, DiverseEnvelope, SimilarEnvelope};

/// HTTP client for the puzzle API. Cheap to clone; clones share the
/// connection pool.
#[derive(Clone, Debug)]
pub struct PuzzleSource {
    client: Client,
    config: SourceConfig,
}

impl PuzzleSource {
    /// Build a client. Query limits and the timeout are clamped to what the
    /// API accepts.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let config = config.clamped();
        let client = Client::builder()
            .user_agent("PuzzleTrainer/1.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// A varied set of puzzles for the grid.
    /// GET /puzzles?limit=N&max_rating=R
    pub async fn fetch_diverse(&self) -> Result<Vec<Puzzle>, SourceError> {
        let params = [
            ("limit", self.config.limit.to_string()),
            ("max_rating", self.config.max_rating.to_string()),
        ];
        let envelope: DiverseEnvelope = self.get_json(&["puzzles"], &params, None).await?;
        Ok(parse_records(envelope.puzzles))
    }

    /// Puzzles similar to `id`, most similar first.
    /// GET /similar?puzzle_id=ID&top_k=K&max_rating=R
    pub async fn fetch_similar(&self, id: &PuzzleId) -> Result<Vec<Puzzle>, SourceError> {
        let params = [
            ("puzzle_id", id.to_string()),
            ("top_k", self.config.top_k.to_string()),
            ("max_rating", self.config.max_rating.to_string()),
        ];
        let envelope: SimilarEnvelope = self.get_json(&["similar"], &params, Some(id)).await?;

        if let Some(query) = envelope.query_puzzle_id.as_deref() {
            if query != id.as_str() {
                warn!(requested = %id, answered = query, "Similar-puzzle response for a different query");
            }
        }

        Ok(parse_records(envelope.results))
    }

    /// Full puzzle detail.
    /// GET /puzzle/{id}
    pub async fn fetch_puzzle(&self, id: &PuzzleId) -> Result<Puzzle, SourceError> {
        let envelope: DetailEnvelope = self
            .get_json(&["puzzle", id.as_str()], &[], Some(id))
            .await?;
        let record = envelope
            .puzzle
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;
        parse_record(record)
    }

    /// Ask the API to warm its similarity cache for `id`.
    /// POST /prefetch/{id}?top_k=K&max_rating=R
    pub async fn prefetch(&self, id: &PuzzleId) -> Result<(), SourceError> {
        let url = self.config.endpoint(&["prefetch", id.as_str()])?;
        let params = [
            ("top_k", self.config.top_k.to_string()),
            ("max_rating", self.config.max_rating.to_string()),
        ];

        let resp = self.client.post(url).query(&params).send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::Unavailable(format!("HTTP {}", resp.status())));
        }
        Ok(())
    }

    /// Fire-and-forget prefetch. Failures are logged and otherwise ignored.
    pub fn spawn_prefetch(&self, id: PuzzleId) -> JoinHandle<()> {
        let source = self.clone();
        tokio::spawn(async move {
            match source.prefetch(&id).await {
                Ok(()) => debug!(puzzle = %id, "Prefetch requested"),
                Err(e) => debug!(puzzle = %id, "Prefetch failed (ignored): {e}"),
            }
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
        subject: Option<&PuzzleId>,
    ) -> Result<T, SourceError> {
        let url = self.config.endpoint(segments)?;
        let path = url.path().to_string();

        let resp = self.client.get(url).query(params).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = subject {
                return Err(SourceError::NotFound(id.to_string()));
            }
        }
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!("HTTP {status} from {path}")));
        }

        Ok(resp.json::<T>().await?)
    }
}
