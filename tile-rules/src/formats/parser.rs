use crate::{LoadError, RuleBook};

/// Trait defining the interface for format-specific rule parsers.
///
/// Implementors parse a rule document from one file format (JSON, RON, ...)
/// and expand it into a [`RuleBook`].
pub trait FormatParser {
    /// Parses rule content into a `RuleBook`.
    ///
    /// # Errors
    ///
    /// `LoadError::ParseError` if the content is not valid for the format,
    /// `LoadError::InvalidData` if it parses but describes an invalid board or
    /// catalog.
    fn parse(&self, content: &str) -> Result<RuleBook, LoadError>;

    /// Returns a descriptive name for this parser format.
    fn format_name(&self) -> &'static str;
}
