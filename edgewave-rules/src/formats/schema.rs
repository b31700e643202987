use crate::{LoadError, TileCatalog};
use edgewave_core::{Edges, Tile, TileSet};
use log::debug;
use serde::Deserialize;

fn default_weight() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct EdgeData {
    up: String,
    down: String,
    left: String,
    right: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct TileData {
    name: String,
    edges: EdgeData,
    #[serde(default = "default_weight")]
    weight: f32,
    #[serde(default)]
    glyph: Option<char>,
}

/// Top-level document shared by every catalog format.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CatalogFile {
    tiles: Vec<TileData>,
}

impl CatalogFile {
    pub(crate) fn into_catalog(self) -> Result<TileCatalog, LoadError> {
        if self.tiles.is_empty() {
            return Err(LoadError::InvalidData("No tiles defined.".to_owned()));
        }
        let mut glyphs = Vec::with_capacity(self.tiles.len());
        let tiles = self
            .tiles
            .into_iter()
            .map(|data| {
                glyphs.push(data.glyph);
                let EdgeData {
                    up,
                    down,
                    left,
                    right,
                } = data.edges;
                Tile::new(data.name, Edges::new(up, down, left, right)).with_weight(data.weight)
            })
            .collect();
        let tileset = TileSet::new(tiles)?;
        debug!("Parsed catalog with {} tiles", tileset.len());
        Ok(TileCatalog::new(tileset, glyphs))
    }
}
