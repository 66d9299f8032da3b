//! CLI event loop: stdin commands and fetch results, handled one at a time.

use std::io::Write;

use puzzle_core::PuzzleId;
use puzzle_source::{PuzzleSource, SourceConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::info;

use crate::command::{Command, HELP};
use crate::modal::ModalSignal;
use crate::navigator::{Applied, Navigator};
use crate::tasks::{self, AppEvent};
use crate::terminal::TerminalBoard;

struct App {
    source: PuzzleSource,
    nav: Navigator<TerminalBoard>,
    tx: UnboundedSender<AppEvent>,
}

pub async fn run(config: SourceConfig, initial: Option<PuzzleId>) -> anyhow::Result<()> {
    info!(api = %config.api_url, "Starting puzzle trainer");

    let source = PuzzleSource::new(config)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App {
        source,
        nav: Navigator::new(TerminalBoard::default()),
        tx,
    };

    tasks::spawn_grid(&app.source, app.tx.clone());
    if let Some(id) = initial {
        app.lookup(id);
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => app.handle_command(command),
                    Err(msg) => println!("{msg}"),
                }
            }
            Some(event) = rx.recv() => app.handle_event(event),
        }

        print!("{}", app.screen());
        std::io::stdout().flush()?;
    }

    Ok(())
}

impl App {
    fn handle_command(&mut self, command: Command) {
        self.nav.clear_notice();
        match command {
            Command::List | Command::Close => {
                if let Some(signal) = self.nav.close() {
                    self.on_signal(signal);
                }
            }
            Command::Refresh => {
                tasks::spawn_grid(&self.source, self.tx.clone());
            }
            Command::Open(index) => {
                if self.nav.open_index(index) {
                    self.prefetch_current();
                }
            }
            Command::Lookup(id) => self.lookup(id),
            Command::Move {
                from,
                to,
                promotion,
            } => {
                if self.nav.modal().is_none() {
                    println!("Open a puzzle first.");
                    return;
                }
                if let Some(signal) = self.nav.handle_move(from, to, promotion) {
                    self.on_signal(signal);
                }
            }
            Command::Next => match self.nav.request_next() {
                Some(signal) => self.on_signal(signal),
                None => println!("Open a puzzle first."),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        let applied = match event {
            AppEvent::Grid(result) => {
                self.nav.set_grid(result);
                return;
            }
            AppEvent::Detail(fetched) => self.nav.apply_detail(fetched),
            AppEvent::Similar(fetched) => self.nav.apply_similar(fetched),
        };
        if let Applied::Opened(_) = applied {
            self.prefetch_current();
        }
    }

    fn lookup(&mut self, id: PuzzleId) {
        self.nav.request_open(id.clone());
        tasks::spawn_detail(&self.source, id, self.tx.clone());
    }

    /// Solved (or "next") moves on to a similar puzzle; closing just shows
    /// the grid again.
    fn on_signal(&mut self, signal: ModalSignal) {
        match signal {
            ModalSignal::Solved => {
                if let Some(id) = self.nav.current_id().cloned() {
                    tasks::spawn_similar(&self.source, id, self.tx.clone());
                }
            }
            ModalSignal::Closed => {}
        }
    }

    fn prefetch_current(&self) {
        if let Some(id) = self.nav.current_id() {
            self.source.spawn_prefetch(id.clone());
        }
    }

    fn screen(&self) -> String {
        let mut out = String::from("\n");

        match self.nav.modal() {
            Some(modal) => {
                let puzzle = modal.puzzle();
                out.push_str(&format!("{}\n", puzzle.title()));
                if !puzzle.themes.is_empty() {
                    out.push_str(&format!("{}\n", puzzle.themes_line()));
                }
                out.push_str(&self.nav.surface().render());
                if !modal.message().is_empty() {
                    out.push_str(&format!("{}\n", modal.message()));
                }
                if let Some(progress) = modal.progress() {
                    out.push_str(&format!("{progress}\n"));
                }
            }
            None if self.nav.grid().is_empty() => out.push_str("No puzzles loaded.\n"),
            None => {
                for (i, puzzle) in self.nav.grid().iter().enumerate() {
                    out.push_str(&format!(
                        "{:>3}. {:<8} {:>5}  {}\n",
                        i + 1,
                        puzzle.id,
                        puzzle.rating,
                        puzzle.primary_theme()
                    ));
                }
            }
        }

        if let Some(notice) = self.nav.notice() {
            out.push_str(&format!("! {notice}\n"));
        }
        out.push_str("> ");
        out
    }
}
