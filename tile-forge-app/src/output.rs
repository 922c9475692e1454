use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tile_core::ResultBoard;

/// Marker written for cells without a card.
pub const EMPTY_CELL: &str = ".";

/// Writes the board as text: one line per row, space-separated card ids,
/// [`EMPTY_CELL`] where nothing was placed.
pub fn write_board<W: Write>(board: &ResultBoard, writer: &mut W) -> io::Result<()> {
    for row in board.rows() {
        let line = row
            .iter()
            .map(|slot| slot.map_or_else(|| EMPTY_CELL.to_string(), |id| id.to_string()))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Saves the board to `output_path` in the [`write_board`] format.
///
/// Boards with empty cells are saved as-is.
pub fn save_board_to_file(board: &ResultBoard, output_path: &Path) -> Result<()> {
    log::info!("Saving board to {}...", output_path.display());

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    let mut writer = io::BufWriter::new(file);
    write_board(board, &mut writer)
        .with_context(|| format!("Failed to write board to {}", output_path.display()))?;
    writer
        .flush()
        .context("Failed to flush writer for output file")?;

    log::info!("Successfully saved board to {}", output_path.display());
    Ok(())
}
