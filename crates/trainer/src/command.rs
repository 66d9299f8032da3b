//! Input lines typed at the CLI prompt.

use puzzle_core::rules::parse_uci_move;
use puzzle_core::shakmaty::uci::UciMove;
use puzzle_core::shakmaty::{Role, Square};
use puzzle_core::PuzzleId;

pub const HELP: &str = "\
Commands:
  list            show the puzzle grid
  refresh         fetch a new set of puzzles
  open <n|id>     open puzzle number n from the grid, or a puzzle by id
  <move>          play a move in UCI notation (f3g5, e7e8n)
  next            skip to a similar puzzle
  close           close the puzzle
  help            show this text
  quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Refresh,
    /// 0-based grid index
    Open(usize),
    Lookup(PuzzleId),
    Move {
        from: Square,
        to: Square,
        promotion: Option<Role>,
    },
    Next,
    Close,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Command::Help);
        };
        let arg = words.next();

        match (head.to_ascii_lowercase().as_str(), arg) {
            ("list" | "ls", None) => Ok(Command::List),
            ("refresh", None) => Ok(Command::Refresh),
            ("open", Some(arg)) => match arg.parse::<usize>() {
                Ok(0) => Err("Puzzles are numbered from 1".to_string()),
                Ok(n) => Ok(Command::Open(n - 1)),
                Err(_) => Ok(Command::Lookup(PuzzleId::new(arg))),
            },
            ("puzzle", Some(id)) => Ok(Command::Lookup(PuzzleId::new(id))),
            ("next", None) => Ok(Command::Next),
            ("close", None) => Ok(Command::Close),
            ("help" | "?", None) => Ok(Command::Help),
            ("quit" | "exit" | "q", None) => Ok(Command::Quit),
            (_, None) => match parse_uci_move(head) {
                Some(UciMove::Normal { from, to, promotion }) => Ok(Command::Move { from, to, promotion }),
                _ => Err(format!("Unknown command: {head}")),
            },
            _ => Err(format!("Unknown command: {}", line.trim())),
        }
    }
}
