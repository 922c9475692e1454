use crate::formats::document::RuleDocument;
use crate::formats::FormatParser;
use crate::generator::build_rule_book;
use crate::types::RandomizerMode;
use crate::{LoadError, RuleBook};
use serde_json::Value;

const RANDOMISER_KEY: &str = "randomiser";

/// Rewrites a numeric `randomiser` into its variant name.
fn normalize_randomiser(value: &mut Value) -> Result<(), LoadError> {
    let Some(field) = value.get_mut(RANDOMISER_KEY) else {
        return Ok(());
    };
    if !field.is_number() {
        return Ok(());
    }
    let mode = field
        .as_u64()
        .and_then(RandomizerMode::from_index)
        .ok_or_else(|| LoadError::InvalidData(format!("Unknown randomiser index {field}")))?;
    *field = Value::String(format!("{mode:?}"));
    Ok(())
}

/// Parser for JSON rule files, the native rule format.
#[derive(Debug, Default)]
pub struct JsonFormatParser;

impl JsonFormatParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for JsonFormatParser {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn parse(&self, content: &str) -> Result<RuleBook, LoadError> {
        let parse_error = |e: serde_json::Error| {
            LoadError::ParseError(format!("JSON deserialization failed: {e}"))
        };
        let mut value: Value = serde_json::from_str(content).map_err(parse_error)?;
        normalize_randomiser(&mut value)?;
        let document: RuleDocument = serde_json::from_value(value).map_err(parse_error)?;
        build_rule_book(document)
    }
}

/// Parses a rule book from a JSON string.
pub fn parse_json_rules(content: &str) -> Result<RuleBook, LoadError> {
    JsonFormatParser::new().parse(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardId, RandomizerMode};

    #[test]
    fn test_defaults_applied() {
        let book = parse_json_rules(
            r#"{"boardWidth": 2, "boardHeight": 1,
                "baseCards": [{"connectors": "GGGG"}]}"#,
        )
        .unwrap();
        assert_eq!(book.rules.randomizer, RandomizerMode::Basic);
        assert!(book.rules.seed_tiles.is_empty());
        assert_eq!(book.catalog.weight(CardId(1)), Some(1));
        assert_eq!(book.image_size, None);
    }

    #[test]
    fn test_legacy_randomiser_name() {
        let book = parse_json_rules(
            r#"{"boardWidth": 1, "boardHeight": 1, "randomiser": "SimpleWeighted",
                "baseCards": [{"connectors": "GGGG"}]}"#,
        )
        .unwrap();
        assert_eq!(book.rules.randomizer, RandomizerMode::Weighted);
    }

    #[test]
    fn test_numeric_randomiser() {
        let parse = |index: &str| {
            parse_json_rules(&format!(
                r#"{{"boardWidth": 1, "boardHeight": 1, "randomiser": {index},
                    "baseCards": [{{"connectors": "GGGG"}}]}}"#
            ))
        };
        assert_eq!(parse("0").unwrap().rules.randomizer, RandomizerMode::Basic);
        assert_eq!(parse("1").unwrap().rules.randomizer, RandomizerMode::Weighted);
        match parse("7") {
            Err(LoadError::InvalidData(msg)) => assert!(msg.contains("index 7"), "{msg}"),
            other => panic!("Expected InvalidData, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let result = parse_json_rules(r#"{"boardWidth": 1, "baseCards": []}"#);
        assert!(matches!(result, Err(LoadError::ParseError(msg)) if msg.contains("JSON")));
    }
}
