//! Background fetches. Each runs as its own tokio task and reports back to the
//! event loop over a channel, so move handling never waits on the network.

use puzzle_core::{Puzzle, PuzzleId};
use puzzle_source::{PuzzleSource, SourceError};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::navigator::Fetched;

#[derive(Debug)]
pub enum AppEvent {
    Grid(Result<Vec<Puzzle>, SourceError>),
    Detail(Fetched<Puzzle>),
    Similar(Fetched<Vec<Puzzle>>),
}

fn deliver(tx: &UnboundedSender<AppEvent>, event: AppEvent) {
    if tx.send(event).is_err() {
        debug!("Event loop gone, dropping fetch result");
    }
}

pub fn spawn_grid(source: &PuzzleSource, tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
    let source = source.clone();
    tokio::spawn(async move {
        let result = source.fetch_diverse().await;
        deliver(&tx, AppEvent::Grid(result));
    })
}

pub fn spawn_detail(
    source: &PuzzleSource,
    id: PuzzleId,
    tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    let source = source.clone();
    tokio::spawn(async move {
        let result = source.fetch_puzzle(&id).await;
        deliver(&tx, AppEvent::Detail(Fetched::new(id, result)));
    })
}

pub fn spawn_similar(
    source: &PuzzleSource,
    id: PuzzleId,
    tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    let source = source.clone();
    tokio::spawn(async move {
        let result = source.fetch_similar(&id).await;
        deliver(&tx, AppEvent::Similar(Fetched::new(id, result)));
    })
}
