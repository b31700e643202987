//! Handles the core execution logic for the standard, animate and survey modes.

use crate::{
    config::{Settings, VisualizationMode},
    error::AppError,
    output,
    progress::{ConsoleProgressReporter, ProgressReporter},
    survey, trace,
    visualization::{TerminalVisualizer, Visualizer},
};
use edgewave_core::{until_resolved_with, RetryOutcome, SolveEvent, SolveStatus, Solver};
use edgewave_rules::{catalog, loader::load_from_file, TileCatalog};
use log::{debug, info};
use std::io::Write;
use std::path::Path;
use std::thread;

/// Resolves `name` as a built-in catalog first, then as a file path.
pub fn load_catalog(name: &str) -> Result<TileCatalog, AppError> {
    if let Some(builtin) = catalog::builtin(name) {
        info!("Using built-in catalog '{name}'");
        return Ok(builtin?);
    }
    Ok(load_from_file(Path::new(name))?)
}

/// Runs the configured mode, printing to stdout.
pub fn execute(settings: &Settings) -> Result<(), AppError> {
    let catalog = load_catalog(&settings.catalog)?;
    info!(
        "Catalog loaded: {} tiles, grid {}x{}",
        catalog.len(),
        settings.width,
        settings.height
    );

    if let Some(runs) = settings.survey {
        return run_survey_mode(settings, &catalog, runs);
    }

    let outcome = run_standard_mode(settings, &catalog, std::io::stdout())?;
    let solver = &outcome.solver;
    println!(
        "{} {}x{} grid with seed {} in {} steps ({} attempt(s))",
        if outcome.resolved() { "Resolved" } else { "Failed to resolve" },
        settings.width,
        settings.height,
        solver.seed(),
        solver.steps(),
        outcome.attempts
    );
    Ok(())
}

/// Solves with retries, rendering and reporting along the way, then writes
/// the trace and output files.
///
/// # Errors
///
/// `AppError::Unresolved` when every attempt ends in a contradiction. The trace
/// of the last attempt is still written.
pub fn run_standard_mode<W: Write>(
    settings: &Settings,
    catalog: &TileCatalog,
    out: W,
) -> Result<RetryOutcome, AppError> {
    info!("Running standard mode...");
    let mode = settings.visualization_mode;
    let animate = mode == VisualizationMode::Animate;
    let mut visualizer = match mode {
        VisualizationMode::None => None,
        VisualizationMode::Terminal => Some(TerminalVisualizer::new(out, catalog.clone())),
        VisualizationMode::Animate => {
            Some(TerminalVisualizer::new(out, catalog.clone()).with_clear_screen(true))
        }
    };
    let mut reporter = settings
        .progress_interval
        .map(ConsoleProgressReporter::new);

    let outcome = until_resolved_with(
        settings.attempts,
        settings.seed,
        |seed| {
            Solver::builder(catalog.tileset.clone(), settings.width, settings.height)
                .seed(seed)
                .selection_strategy(settings.selection)
                .build()
                .map_err(AppError::from)
        },
        |solver, event| -> Result<(), AppError> {
            match event {
                SolveEvent::Started { attempt, seed } => {
                    debug!("Attempt {attempt} starts with seed {seed}");
                    if animate {
                        if let Some(visualizer) = visualizer.as_mut() {
                            visualizer.display_state(solver.grid(), solver.status())?;
                        }
                    }
                }
                SolveEvent::Stepped(report) => {
                    if let Some(reporter) = reporter.as_mut() {
                        let progress = solver.progress();
                        reporter.report(&progress);
                        if report.status.is_terminal() {
                            reporter.finish(&progress, report.status);
                        }
                    }
                    if animate {
                        if let Some(visualizer) = visualizer.as_mut() {
                            visualizer.display_state(solver.grid(), report.status)?;
                        }
                        thread::sleep(settings.frame_delay);
                    }
                }
            }
            Ok(())
        },
    )?;

    let solver = &outcome.solver;
    if mode == VisualizationMode::Terminal {
        if let Some(visualizer) = visualizer.as_mut() {
            visualizer.display_state(solver.grid(), solver.status())?;
        }
    }

    if let Some(path) = &settings.trace_csv {
        trace::write_trace_file(path, solver.history(), catalog)?;
    }

    match solver.status() {
        SolveStatus::Resolved => {
            if let Some(path) = &settings.output_path {
                output::save_grid_to_file(
                    &solver.snapshot(),
                    catalog,
                    solver.seed(),
                    settings.output_format,
                    path,
                )?;
            }
            Ok(outcome)
        }
        status => Err(AppError::Unresolved {
            attempts: outcome.attempts,
            status,
        }),
    }
}

/// Surveys consecutive seeds and prints statistics.
pub fn run_survey_mode(
    settings: &Settings,
    catalog: &TileCatalog,
    runs: usize,
) -> Result<(), AppError> {
    let results = survey::run_survey(
        &catalog.tileset,
        settings.width,
        settings.height,
        settings.selection,
        settings.seed,
        runs,
    )?;
    let summary = survey::summarize(&results);
    survey::print_summary(&summary);

    if let Some(path) = &settings.survey_csv {
        survey::write_runs_csv(&results, path)?;
    }
    Ok(())
}
