use crate::formats::schema::CatalogFile;
use crate::formats::FormatParser;
use crate::{LoadError, TileCatalog};

/// A parser implementation for RON (Rusty Object Notation) catalogs.
#[derive(Debug, Default, Clone, Copy)]
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

    fn parse(&self, content: &str) -> Result<TileCatalog, LoadError> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        file.into_catalog()
    }
}
