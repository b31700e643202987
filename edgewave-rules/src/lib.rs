//! Loading tile catalogs from rule files.

use edgewave_core::{TileId, TileSet, TileSetError};
use std::sync::Arc;
use thiserror::Error;

pub mod catalog;
pub mod formats;
pub mod loader;

pub use catalog::pipes;
pub use loader::load_from_file;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rules format (e.g., RON/JSON): {0}")]
    ParseError(String),
    #[error("Invalid rule data: {0}")]
    InvalidData(String),
    #[error("Unsupported rule file format: {0}")]
    UnsupportedFormat(String),
}

impl From<TileSetError> for LoadError {
    fn from(error: TileSetError) -> Self {
        Self::InvalidData(format!("TileSet Error: {error}"))
    }
}

/// A validated tile set plus the glyph each tile renders as.
#[derive(Debug, Clone)]
pub struct TileCatalog {
    pub tileset: Arc<TileSet>,
    glyphs: Vec<char>,
}

impl TileCatalog {
    /// Pairs `tileset` with `glyphs`; missing glyphs fall back to the first
    /// character of the tile name.
    pub fn new(tileset: TileSet, glyphs: Vec<Option<char>>) -> Self {
        let glyphs = tileset
            .tiles()
            .iter()
            .enumerate()
            .map(|(index, tile)| {
                glyphs
                    .get(index)
                    .copied()
                    .flatten()
                    .or_else(|| tile.name().chars().next())
                    .unwrap_or('?')
            })
            .collect();
        Self {
            tileset: Arc::new(tileset),
            glyphs,
        }
    }

    pub fn glyph(&self, tile: TileId) -> char {
        self.glyphs.get(tile.0).copied().unwrap_or('?')
    }

    pub fn name(&self, tile: TileId) -> Option<&str> {
        self.tileset.get(tile).map(|tile| tile.name())
    }

    pub fn len(&self) -> usize {
        self.tileset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tileset.is_empty()
    }
}
