use crate::formats::{FormatParser, JsonFormatParser, RonFormatParser};
use crate::{LoadError, RuleBook};
use log::info;
use std::path::Path;

/// Picks the parser for a rule file from its extension.
///
/// # Errors
///
/// `LoadError::UnsupportedFormat` for anything other than `.json` or `.ron`.
pub fn parser_for_path(path: &Path) -> Result<Box<dyn FormatParser>, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => Ok(Box::new(JsonFormatParser::new())),
        Some("ron") => Ok(Box::new(RonFormatParser::new())),
        _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Loads a rule book (board rules, expanded card catalog, sprites) from a
/// rule file.
///
/// # Arguments
///
/// * `path` - The path to the rule definition file (`.json` or `.ron`).
///
/// # Returns
///
/// The loaded `RuleBook` on success, or a `LoadError` on failure.
pub fn load_from_file(path: &Path) -> Result<RuleBook, LoadError> {
    let parser = parser_for_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let book = parser.parse(&content)?;
    info!(
        "Loaded {} rules from {:?}: {}x{} board, {} cards, {} seed tiles",
        parser.format_name(),
        path,
        book.rules.width,
        book.rules.height,
        book.catalog.len(),
        book.rules.seed_tiles.len()
    );
    Ok(book)
}
