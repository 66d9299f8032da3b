//! Puzzle trainer CLI
//!
//! Fetches a grid of puzzles from the puzzle API and lets you solve them
//! move by move in the terminal.

use puzzle_core::PuzzleId;
use puzzle_source::SourceConfig;
use tracing_subscriber::EnvFilter;

/// Parse --puzzle <id> from CLI args
fn parse_initial_puzzle() -> Option<PuzzleId> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--puzzle" {
            if let Some(id) = args.get(i + 1) {
                let id = id.trim();
                if !id.is_empty() {
                    return Some(PuzzleId::new(id));
                }
            }
        }
    }
    None
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so they don't interleave with the board
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = SourceConfig::from_env();
    trainer::app::run(config, parse_initial_puzzle()).await
}
