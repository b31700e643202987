use crate::formats::{FormatParser, JsonFormatParser, RonFormatParser};
use crate::{LoadError, TileCatalog};
use log::info;
use std::path::Path;

/// Picks a parser from the file extension (`.ron` or `.json`, case-insensitive).
pub fn parser_for_path(path: &Path) -> Result<Box<dyn FormatParser>, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("ron") => Ok(Box::new(RonFormatParser::new())),
        Some("json") => Ok(Box::new(JsonFormatParser::new())),
        Some(other) => Err(LoadError::UnsupportedFormat(format!(
            "unknown extension '.{other}' for {}",
            path.display()
        ))),
        None => Err(LoadError::UnsupportedFormat(format!(
            "no extension on {}",
            path.display()
        ))),
    }
}

/// Loads a tile catalog from a specified file.
///
/// # Arguments
///
/// * `path` - The path to the catalog file (RON or JSON).
///
/// # Returns
///
/// The validated `TileCatalog`, or a `LoadError` if the file is missing,
/// malformed, or describes an invalid tile set.
pub fn load_from_file(path: &Path) -> Result<TileCatalog, LoadError> {
    let parser = parser_for_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let catalog = parser.parse(&content)?;
    info!(
        "Loaded {} tiles from {} ({})",
        catalog.len(),
        path.display(),
        parser.format_name()
    );
    Ok(catalog)
}
