//! Module defining parsers for different rule file formats.

pub mod document;
pub mod json_format;
pub mod parser;
pub mod ron_format;

pub use json_format::JsonFormatParser;
pub use parser::FormatParser;
pub use ron_format::RonFormatParser;
