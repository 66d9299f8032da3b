//! Plain-text board surface for the CLI.

use puzzle_core::shakmaty::{Color, File, Rank, Square};
use puzzle_core::{BoardConfig, BoardSurface};

#[derive(Debug, Default)]
pub struct TerminalBoard {
    config: Option<BoardConfig>,
}

impl TerminalBoard {
    pub fn config(&self) -> Option<&BoardConfig> {
        self.config.as_ref()
    }

    pub fn render(&self) -> String {
        self.config.as_ref().map(render_board).unwrap_or_default()
    }
}

impl BoardSurface for TerminalBoard {
    fn configure(&mut self, config: BoardConfig) {
        self.config = Some(config);
    }
}

/// Board from the solving side's point of view, with the movable pieces and
/// the highlighted move listed underneath.
pub fn render_board(config: &BoardConfig) -> String {
    let (ranks, files): (Vec<u32>, Vec<u32>) = match config.orientation {
        Color::White => ((0..8).rev().collect(), (0..8).collect()),
        Color::Black => ((0..8).collect(), (0..8).rev().collect()),
    };

    let mut out = String::new();
    for &rank in &ranks {
        out.push_str(&format!("{} ", rank + 1));
        for &file in &files {
            let sq = Square::from_coords(File::new(file), Rank::new(rank));
            let c = config.board.piece_at(sq).map(|p| p.char()).unwrap_or('.');
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("  ");
    for &file in &files {
        out.push(' ');
        out.push(File::new(file).char());
    }
    out.push('\n');

    let side = match config.turn {
        Color::White => "White",
        Color::Black => "Black",
    };
    if config.is_interactive() {
        let origins: Vec<String> = config.dests.origins().map(|sq| sq.to_string()).collect();
        out.push_str(&format!(
            "{side} to move, {} legal moves. Movable: {}\n",
            config.dests.move_count(),
            origins.join(" ")
        ));
    } else {
        out.push_str(&format!("{side} to move.\n"));
    }
    if let Some((from, to)) = config.last_move {
        out.push_str(&format!("Last: {from}{to}\n"));
    }
    out
}
