use colored::{ColoredString, Colorize};
use std::io::{self, Write};
use tile_core::ResultBoard;
use tile_rules::{CardCatalog, Connector, Direction, Edges};

/// Shows a board to the user.
pub trait Visualizer {
    /// Displays the board; cards are looked up in `catalog`.
    fn display_state(&mut self, board: &ResultBoard, catalog: &CardCatalog) -> anyhow::Result<()>;
}

/// Glyph for an empty cell.
pub const EMPTY_GLYPH: char = '?';

// Indexed by road mask: north in bit 0, then east, south, west.
const ROAD_GLYPHS: [char; 16] = [
    '.', '╵', '╶', '└', '╷', '│', '┌', '├', '╴', '┘', '─', '┴', '┐', '┤', '┬', '┼',
];

/// Glyph for a card: box-drawing lines for road edges, `.` for all grass.
pub fn card_glyph(edges: &Edges) -> char {
    let road = |direction: Direction| edges[direction].contains(Connector::ROAD);
    let mask = usize::from(road(Direction::North))
        | usize::from(road(Direction::East)) << 1
        | usize::from(road(Direction::South)) << 2
        | usize::from(road(Direction::West)) << 3;
    ROAD_GLYPHS[mask]
}

fn cell_glyph(slot: Option<&Edges>) -> char {
    slot.map_or(EMPTY_GLYPH, card_glyph)
}

/// The board as plain glyph rows.
pub fn render_plain(board: &ResultBoard, catalog: &CardCatalog) -> Vec<String> {
    board
        .rows()
        .map(|row| {
            row.iter()
                .map(|slot| cell_glyph(slot.and_then(|id| catalog.get(id)).map(|card| &card.edges)))
                .collect()
        })
        .collect()
}

fn colorize(glyph: char) -> ColoredString {
    let text = glyph.to_string();
    match glyph {
        EMPTY_GLYPH => text.red().bold(),
        '.' => text.green(),
        _ => text.yellow(),
    }
}

/// Prints colored glyph rows to a writer, stdout by default.
pub struct TerminalVisualizer<W: Write = io::Stdout> {
    writer: W,
}

impl TerminalVisualizer {
    pub fn new() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl Default for TerminalVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalVisualizer<W> {
    pub const fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Visualizer for TerminalVisualizer<W> {
    fn display_state(&mut self, board: &ResultBoard, catalog: &CardCatalog) -> anyhow::Result<()> {
        for row in render_plain(board, catalog) {
            let line: String = row.chars().map(|glyph| colorize(glyph).to_string()).collect();
            writeln!(self.writer, "{line}")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
