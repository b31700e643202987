//! CSV trace of the collapses made during a solve.

use crate::error::AppError;
use edgewave_core::Collapse;
use edgewave_rules::TileCatalog;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct TraceRecord<'a> {
    step: usize,
    x: usize,
    y: usize,
    tile: usize,
    name: &'a str,
}

/// Writes one CSV row per collapse, in order.
pub fn write_trace<W: Write>(
    writer: W,
    history: &[Collapse],
    catalog: &TileCatalog,
) -> Result<(), AppError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, collapse) in history.iter().enumerate() {
        csv_writer.serialize(TraceRecord {
            step: index + 1,
            x: collapse.position.x,
            y: collapse.position.y,
            tile: collapse.tile.0,
            name: catalog.name(collapse.tile).unwrap_or("?"),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_trace_file(
    path: &Path,
    history: &[Collapse],
    catalog: &TileCatalog,
) -> Result<(), AppError> {
    let file = std::fs::File::create(path)?;
    write_trace(file, history, catalog)?;
    log::info!("Wrote {} collapses to {:?}", history.len(), path);
    Ok(())
}
