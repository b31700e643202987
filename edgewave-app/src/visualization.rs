use crate::error::AppError;
use colored::Colorize;
use edgewave_core::{Grid, Position, SolveStatus};
use edgewave_rules::TileCatalog;
use std::io::Write;

/// Clears the terminal and homes the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Trait for types that can visualize the state of the solver's grid.
///
/// Implementors define how the grid (resolved tiles, remaining candidates, the
/// contradiction cell) is presented, such as via terminal output.
pub trait Visualizer {
    /// Displays or updates the visualization for the current grid.
    fn display_state(&mut self, grid: &Grid, status: SolveStatus) -> Result<(), AppError>;
}

/// Character for one cell: the tile glyph once resolved, `!` at the
/// contradiction, otherwise the number of candidates left (`+` above nine).
pub fn cell_char(grid: &Grid, catalog: &TileCatalog, status: SolveStatus, position: Position) -> char {
    if status == (SolveStatus::Contradiction { at: position }) {
        return '!';
    }
    if let Some(tile) = grid.chosen(position) {
        return catalog.glyph(tile);
    }
    match grid.domain_size(position) {
        0 => '!',
        size @ 1..=9 => char::from_digit(size as u32, 10).unwrap_or('+'),
        _ => '+',
    }
}

/// Renders the grid as text, one line per row.
pub fn render_plain(grid: &Grid, catalog: &TileCatalog, status: SolveStatus) -> String {
    let mut frame = String::with_capacity((grid.width() + 1) * grid.height());
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            frame.push(cell_char(grid, catalog, status, Position::new(x, y)));
        }
        frame.push('\n');
    }
    frame
}

/// Renders the grid to a terminal, optionally with colour.
pub struct TerminalVisualizer<W: Write> {
    out: W,
    catalog: TileCatalog,
    use_color: bool,
    clear_screen: bool,
}

impl<W: Write> TerminalVisualizer<W> {
    pub fn new(out: W, catalog: TileCatalog) -> Self {
        Self {
            out,
            catalog,
            use_color: true,
            clear_screen: false,
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Redraw in place instead of appending frames; used for animation.
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&self, grid: &Grid, status: SolveStatus) -> String {
        if !self.use_color {
            return render_plain(grid, &self.catalog, status);
        }
        let mut frame = String::new();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let position = Position::new(x, y);
                let ch = cell_char(grid, &self.catalog, status, position).to_string();
                let styled = if status == (SolveStatus::Contradiction { at: position }) {
                    ch.red().bold()
                } else if grid.is_resolved(position) {
                    ch.bright_red().on_green()
                } else {
                    ch.dimmed()
                };
                frame.push_str(&styled.to_string());
            }
            frame.push('\n');
        }
        frame
    }
}

impl<W: Write> Visualizer for TerminalVisualizer<W> {
    fn display_state(&mut self, grid: &Grid, status: SolveStatus) -> Result<(), AppError> {
        let frame = self.render(grid, status);
        if self.clear_screen {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }
        write!(self.out, "{frame}")?;
        writeln!(
            self.out,
            "[{}/{} resolved] {}",
            grid.resolved_count(),
            grid.len(),
            status
        )?;
        self.out
            .flush()
            .map_err(|e| AppError::Visualization(format!("Failed to flush terminal: {e}")))
    }
}
