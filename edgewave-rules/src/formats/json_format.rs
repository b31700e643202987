use crate::formats::schema::CatalogFile;
use crate::formats::FormatParser;
use crate::{LoadError, TileCatalog};

/// Reads the catalog document from JSON.
#[derive(Debug, Default, Clone, Copy)]
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

    fn parse(&self, content: &str) -> Result<TileCatalog, LoadError> {
        let file: CatalogFile = serde_json::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("JSON deserialization failed: {e}")))?;
        file.into_catalog()
    }
}
