#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use puzzle_core::{BoardConfig, BoardSurface, Puzzle, PuzzleId};
use puzzle_source::{PuzzleSource, SourceConfig};
use serde_json::{json, Value};

/// Italian game after 3...Nc6 4.Nf3, white to move.
pub const ITALIAN_FEN: &str = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
pub const PROMOTION_FEN: &str = "8/4P3/8/8/8/k7/8/K7 w - - 0 1";

/// Build a shared puzzle from FEN and UCI moves.
pub fn puzzle(id: &str, fen: &str, moves: &[&str]) -> Arc<Puzzle> {
    Arc::new(Puzzle {
        id: PuzzleId::new(id),
        fen: fen.to_string(),
        moves: moves.iter().map(|m| m.to_string()).collect(),
        rating: 1500,
        themes: vec!["short".to_string()],
    })
}

/// Board surface that keeps every configuration it was handed.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub configs: Vec<BoardConfig>,
}

impl RecordingSurface {
    pub fn last(&self) -> &BoardConfig {
        self.configs.last().expect("surface was never configured")
    }
}

impl BoardSurface for RecordingSurface {
    fn configure(&mut self, config: BoardConfig) {
        self.configs.push(config);
    }
}

// ---------------------------------------------------------------------------
// Mock puzzle API
// ---------------------------------------------------------------------------

/// Requests seen by the mock server, as `"METHOD path?query"`.
#[derive(Clone, Default)]
pub struct Requests(Arc<Mutex<Vec<String>>>);

impl Requests {
    fn record(&self, method: &str, uri: &Uri) {
        self.0.lock().unwrap().push(format!("{method} {uri}"));
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn find(&self, prefix: &str) -> Option<String> {
        self.all().into_iter().find(|r| r.starts_with(prefix))
    }
}

fn fixture(id: &str) -> Option<Value> {
    let record = match id {
        "000aY" => json!({
            "id": "000aY",
            "fen": ITALIAN_FEN,
            "moves": ["f3g5", "h7h6"],
            "rating": 1379,
            "themes": ["opening", "short"],
        }),
        "0009B" => json!({
            "id": "0009B",
            "fen": "r2qr1k1/b1p2ppp/pp4n1/P1P1p3/4P1n1/B2P2Pb/3NBP1P/RN1QR1K1 b - - 1 16",
            "moves": "b6c5 e2g4 h3g4 d1g4",
            "rating": 1112.4,
            "themes": "advantage middlegame short",
        }),
        "sim1" => json!({
            "id": "sim1",
            "fen": START_FEN,
            "moves": ["e2e4", "e7e5", "g1f3"],
            "rating": 1400,
            "themes": null,
        }),
        "sim2" => json!({
            "id": "sim2",
            "fen": PROMOTION_FEN,
            "moves": ["e7e8q"],
            "rating": 900,
            "themes": ["endgame", "promotion"],
        }),
        _ => return None,
    };
    Some(record)
}

/// `/similar` records use `puzzle_id` and carry a score.
fn similar_record(id: &str, score: f64) -> Option<Value> {
    let mut record = fixture(id)?;
    let obj = record.as_object_mut()?;
    let id = obj.remove("id")?;
    obj.insert("puzzle_id".to_string(), id);
    obj.insert("score".to_string(), json!(score));
    Some(record)
}

async fn diverse(State(requests): State<Requests>, uri: Uri) -> Json<Value> {
    requests.record("GET", &uri);
    Json(json!({
        "puzzles": [
            fixture("000aY"),
            { "fen": START_FEN, "moves": ["e2e4"] },
            fixture("0009B"),
        ]
    }))
}

async fn similar(
    State(requests): State<Requests>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    requests.record("GET", &uri);
    let query = params.get("puzzle_id").cloned().unwrap_or_default();
    if query == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": format!("Puzzle {query} not found") })),
        );
    }

    // The query puzzle itself ranks first, as a real similarity index would.
    let neighbours = ["sim1", "sim2"].into_iter().filter(|id| *id != query);
    let results: Vec<Value> = std::iter::once(query.as_str())
        .chain(neighbours)
        .enumerate()
        .filter_map(|(rank, id)| similar_record(id, 1.0 - rank as f64 * 0.1))
        .collect();

    (
        StatusCode::OK,
        Json(json!({ "query_puzzle_id": query, "results": results })),
    )
}

async fn detail(
    State(requests): State<Requests>,
    uri: Uri,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    requests.record("GET", &uri);
    if id == "broken" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "boom" })),
        );
    }
    match fixture(&id) {
        Some(record) => (StatusCode::OK, Json(json!({ "puzzle": record }))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": format!("Puzzle {id} not found") })),
        ),
    }
}

async fn prefetch(State(requests): State<Requests>, uri: Uri, Path(id): Path<String>) -> Json<Value> {
    requests.record("POST", &uri);
    Json(json!({ "status": "ok", "puzzle_id": id }))
}

/// Start a mock puzzle API on an ephemeral port. Returns its base URL.
pub async fn spawn_mock_api() -> (String, Requests) {
    let requests = Requests::default();
    let app = Router::new()
        .route("/puzzles", get(diverse))
        .route("/similar", get(similar))
        .route("/puzzle/{id}", get(detail))
        .route("/prefetch/{id}", post(prefetch))
        .with_state(requests.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), requests)
}

/// Client pointed at `base_url` with default limits.
pub fn source(base_url: &str) -> PuzzleSource {
    PuzzleSource::new(SourceConfig {
        api_url: base_url.to_string(),
        ..SourceConfig::default()
    })
    .unwrap()
}
