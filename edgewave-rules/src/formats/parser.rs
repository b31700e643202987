use crate::{LoadError, TileCatalog};

/// Trait defining the interface for format-specific catalog parsers.
///
/// Every format describes the same document: a list of tiles, each with a
/// name, four edge labels, an optional weight and an optional glyph.
pub trait FormatParser {
    /// Parses catalog content into a validated [`TileCatalog`].
    ///
    /// # Returns
    ///
    /// * `Ok(TileCatalog)` - Successfully parsed catalog
    /// * `Err(LoadError::ParseError)` - The text is not a valid document
    /// * `Err(LoadError::InvalidData)` - The document describes an invalid tile set
    fn parse(&self, content: &str) -> Result<TileCatalog, LoadError>;

    /// Returns a descriptive name for this parser format.
    fn format_name(&self) -> &'static str;
}
