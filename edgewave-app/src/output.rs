use crate::config::OutputFormat;
use anyhow::{bail, Context, Result};
use edgewave_core::GridSnapshot;
use edgewave_rules::TileCatalog;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// JSON document written by [`save_grid_to_file`].
#[derive(Serialize)]
struct JsonOutput<'a> {
    seed: u64,
    tile_names: Vec<&'a str>,
    grid: &'a GridSnapshot,
}

/// Text form of a resolved snapshot: space-separated tile ids along X,
/// one line per row.
pub fn format_text(snapshot: &GridSnapshot) -> Result<String> {
    let mut text = String::new();
    for (y, row) in snapshot.rows().enumerate() {
        let mut ids = Vec::with_capacity(row.len());
        for (x, cell) in row.iter().enumerate() {
            match cell {
                Some(tile) => ids.push(tile.0.to_string()),
                None => bail!("Grid cell ({x}, {y}) is not resolved, cannot save."),
            }
        }
        text.push_str(&ids.join(" "));
        text.push('\n');
    }
    Ok(text)
}

/// Saves a fully resolved grid in the requested format.
pub fn save_grid_to_file(
    snapshot: &GridSnapshot,
    catalog: &TileCatalog,
    seed: u64,
    format: OutputFormat,
    output_path: &Path,
) -> Result<()> {
    log::info!("Attempting to save grid to {:?}...", output_path);

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {:?}", output_path))?;
    let mut writer = io::BufWriter::new(file);

    match format {
        OutputFormat::Text => {
            writer.write_all(format_text(snapshot)?.as_bytes())?;
        }
        OutputFormat::Json => {
            let document = JsonOutput {
                seed,
                tile_names: catalog
                    .tileset
                    .tiles()
                    .iter()
                    .map(|tile| tile.name())
                    .collect(),
                grid: snapshot,
            };
            serde_json::to_writer_pretty(&mut writer, &document)
                .context("Failed to serialize grid as JSON")?;
            writeln!(writer)?;
        }
    }

    writer
        .flush()
        .context("Failed to flush writer for output file")?;
    log::info!("Successfully saved grid to {:?}", output_path);

    Ok(())
}
