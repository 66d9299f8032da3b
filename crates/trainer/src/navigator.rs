//! Shell state: the puzzle grid, the open puzzle view, and the async results
//! that arrive while the user keeps playing.
//!
//! Fetches are never cancelled. Each result carries the id it was requested
//! for and is dropped on arrival if the user has moved on.

use std::sync::Arc;

use puzzle_core::shakmaty::{Role, Square};
use puzzle_core::{BoardSurface, Puzzle, PuzzleId};
use puzzle_source::SourceError;
use tracing::{debug, error, info, warn};

use crate::modal::{ModalSignal, PuzzleModal};

/// Result of an async request, tagged with the puzzle it was made for.
#[derive(Debug)]
pub struct Fetched<T> {
    pub requested_for: PuzzleId,
    pub result: Result<T, SourceError>,
}

impl<T> Fetched<T> {
    pub fn new(requested_for: PuzzleId, result: Result<T, SourceError>) -> Self {
        Self {
            requested_for,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A new puzzle is now open.
    Opened(PuzzleId),
    /// Result used, current view unchanged (error or nothing usable).
    Kept,
    /// Result was for a puzzle no longer shown; ignored.
    Stale,
}

#[derive(Debug)]
pub struct Navigator<S> {
    surface: S,
    grid: Vec<Arc<Puzzle>>,
    modal: Option<PuzzleModal>,
    /// Puzzle requested by id whose detail has not arrived yet.
    pending: Option<PuzzleId>,
    notice: Option<String>,
}

impl<S: BoardSurface> Navigator<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            grid: Vec::new(),
            modal: None,
            pending: None,
            notice: None,
        }
    }

    pub fn set_grid(&mut self, result: Result<Vec<Puzzle>, SourceError>) {
        match result {
            Ok(puzzles) => {
                info!(count = puzzles.len(), "Loaded puzzle grid");
                self.grid = puzzles.into_iter().map(Arc::new).collect();
            }
            Err(e) => self.report(&e),
        }
    }

    /// Open a puzzle view. On an invalid puzzle the previous view stays and a
    /// notice explains why.
    pub fn open(&mut self, puzzle: Arc<Puzzle>) -> bool {
        let id = puzzle.id.clone();
        match PuzzleModal::open(puzzle, &mut self.surface) {
            Ok(modal) => {
                info!(puzzle = %id, "Opened puzzle");
                self.modal = Some(modal);
                self.pending = None;
                self.notice = None;
                true
            }
            Err(e) => {
                warn!(puzzle = %id, "Cannot open puzzle: {e}");
                self.notice = Some(e.to_string());
                false
            }
        }
    }

    /// Open the grid entry at `index` (0-based).
    pub fn open_index(&mut self, index: usize) -> bool {
        match self.grid.get(index).cloned() {
            Some(puzzle) => self.open(puzzle),
            None => {
                self.notice = Some(format!("No puzzle #{}", index + 1));
                false
            }
        }
    }

    /// Forward a board move to the open puzzle. A fatal session error (corrupt
    /// solution data, failed take-back) ends the session.
    pub fn handle_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Option<ModalSignal> {
        let modal = self.modal.as_mut()?;
        match modal.on_move(&mut self.surface, from, to, promotion) {
            Ok(signal) => signal,
            Err(e) if e.is_fatal() => {
                error!("Abandoning puzzle session: {e}");
                self.modal = None;
                self.notice = Some(e.to_string());
                None
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                None
            }
        }
    }

    pub fn close(&mut self) -> Option<ModalSignal> {
        self.modal.take().map(PuzzleModal::close)
    }

    pub fn request_next(&self) -> Option<ModalSignal> {
        self.modal.as_ref().map(PuzzleModal::request_next)
    }

    /// Remember a direct-open request; only its detail will be accepted.
    pub fn request_open(&mut self, id: PuzzleId) {
        self.pending = Some(id);
    }

    pub fn apply_detail(&mut self, fetched: Fetched<Puzzle>) -> Applied {
        if self.pending.as_ref() != Some(&fetched.requested_for) {
            debug!(puzzle = %fetched.requested_for, "Discarding stale puzzle detail");
            return Applied::Stale;
        }
        self.pending = None;

        match fetched.result {
            Ok(puzzle) => {
                let id = puzzle.id.clone();
                if self.open(Arc::new(puzzle)) {
                    Applied::Opened(id)
                } else {
                    Applied::Kept
                }
            }
            Err(e) => {
                self.report(&e);
                Applied::Kept
            }
        }
    }

    /// Move on to the most similar puzzle, unless the user already left the
    /// puzzle these results were fetched for.
    pub fn apply_similar(&mut self, fetched: Fetched<Vec<Puzzle>>) -> Applied {
        let current = match self.current_id() {
            Some(id) if *id == fetched.requested_for => id.clone(),
            _ => {
                debug!(puzzle = %fetched.requested_for, "Discarding stale similar-puzzle results");
                return Applied::Stale;
            }
        };

        let puzzles = match fetched.result {
            Ok(puzzles) => puzzles,
            Err(e) => {
                self.report(&e);
                return Applied::Kept;
            }
        };

        for puzzle in puzzles.into_iter().filter(|p| p.id != current) {
            let id = puzzle.id.clone();
            if self.open(Arc::new(puzzle)) {
                return Applied::Opened(id);
            }
        }

        if self.notice.is_none() {
            self.notice = Some("No similar puzzles found".to_string());
        }
        Applied::Kept
    }

    /// Surface a failed fetch without touching the current view.
    pub fn report(&mut self, error: &SourceError) {
        warn!("Puzzle source request failed: {error}");
        self.notice = Some(error.to_string());
    }

    pub fn grid(&self) -> &[Arc<Puzzle>] {
        &self.grid
    }

    pub fn modal(&self) -> Option<&PuzzleModal> {
        self.modal.as_ref()
    }

    pub fn current_id(&self) -> Option<&PuzzleId> {
        self.modal.as_ref().map(|m| &m.puzzle().id)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
