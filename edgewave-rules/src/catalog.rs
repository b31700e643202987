//! Catalogs shipped with the crate.

use crate::formats::{FormatParser, RonFormatParser};
use crate::{LoadError, TileCatalog};

const PIPES: &str = include_str!("../catalogs/pipes.ron");

/// Nine red-pipe tiles on green ground, drawn with box characters.
pub fn pipes() -> Result<TileCatalog, LoadError> {
    RonFormatParser::new().parse(PIPES)
}

/// Looks up a built-in catalog by name.
pub fn builtin(name: &str) -> Option<Result<TileCatalog, LoadError>> {
    match name {
        "pipes" => Some(pipes()),
        _ => None,
    }
}
