use crate::formats::document::RuleDocument;
use crate::formats::FormatParser;
use crate::generator::build_rule_book;
use crate::{LoadError, RuleBook};

/// A parser implementation for RON (Rusty Object Notation) format rules.
///
/// RON files use the same field names as the JSON format:
///
/// ```ron
/// (
///     boardWidth: 4,
///     boardHeight: 4,
///     baseCards: [ (connectors: "RRGG", rotations: [90, 180, 270]) ],
/// )
/// ```
#[derive(Debug, Default)]
pub struct RonFormatParser;

impl RonFormatParser {
    /// Creates a new RON format parser
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for RonFormatParser {
    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    fn parse(&self, ron_content: &str) -> Result<RuleBook, LoadError> {
        let document: RuleDocument = ron::from_str(ron_content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        build_rule_book(document)
    }
}

/// Parses a rule book defined in a RON string.
pub fn parse_ron_rules(ron_content: &str) -> Result<RuleBook, LoadError> {
    RonFormatParser::new().parse(ron_content)
}
