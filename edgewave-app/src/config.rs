use crate::error::AppError;
use clap::{Parser, ValueEnum};
use edgewave_core::SelectionStrategy;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Name of the catalog used when none is configured.
pub const DEFAULT_CATALOG: &str = "pipes";
pub const DEFAULT_WIDTH: usize = 20;
pub const DEFAULT_HEIGHT: usize = 20;
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(50);
/// Prefix of environment variables read as configuration.
pub const ENV_PREFIX: &str = "EDGEWAVE_";

/// Represents the different visualization modes available.
#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationMode {
    #[default]
    None,
    /// Print the final grid once.
    Terminal,
    /// Redraw the grid after every step.
    Animate,
}

/// File format for the saved grid.
#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Tile ids, one row per line.
    #[default]
    Text,
    /// Snapshot plus tile names.
    Json,
}

/// Log level for the whole application.
#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Log level for progress reports only.
#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
}

/// Command line of the edgewave application.
///
/// Every option is optional here: values left unset fall back to the config
/// file, then to `EDGEWAVE_*` environment variables, then to built-in defaults.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Edge-label wave function collapse", long_about = None)]
pub struct AppConfig {
    /// Built-in catalog name ("pipes") or path to a RON/JSON catalog file.
    #[arg(short, long, value_name = "CATALOG")]
    pub catalog: Option<String>,

    /// Width of the output grid.
    #[arg(long)]
    pub width: Option<usize>,

    /// Height of the output grid.
    #[arg(long)]
    pub height: Option<usize>,

    /// Seed for the random number generator. Random when unset.
    #[arg(long)]
    pub seed: Option<u64>,

    /// How many seeds to try before giving up on a contradiction.
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Tie-break among cells with the same number of candidates.
    #[arg(long, value_enum)]
    pub selection: Option<SelectionStrategy>,

    /// Path to save the resolved grid.
    #[arg(short, long, value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Format of the saved grid.
    #[arg(long, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Write every collapse of the final attempt to this CSV file.
    #[arg(long, value_name = "CSV_FILE")]
    pub trace_csv: Option<PathBuf>,

    /// Choose the visualization mode.
    #[arg(long, value_enum)]
    pub visualization_mode: Option<VisualizationMode>,

    /// Pause between frames in animate mode (e.g., "50ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub frame_delay: Option<Duration>,

    /// Report progress updates every specified interval (e.g., "1s", "500ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub progress_interval: Option<Duration>,

    /// Solve this many consecutive seeds in parallel and report statistics.
    #[arg(long, value_name = "RUNS")]
    pub survey: Option<usize>,

    /// Per-run results of the survey as CSV.
    #[arg(long, value_name = "CSV_FILE")]
    pub survey_csv: Option<PathBuf>,

    /// TOML file with defaults for any of the options above.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Global log level.
    #[arg(long, value_enum)]
    pub log_level: Option<GlobalLogLevel>,

    /// Log level of the progress reporter.
    #[arg(long, value_enum)]
    pub progress_log_level: Option<ProgressLogLevel>,
}

/// Values read from the config file and the environment. Durations are
/// humantime strings.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    catalog: Option<String>,
    width: Option<usize>,
    height: Option<usize>,
    seed: Option<u64>,
    attempts: Option<u32>,
    selection: Option<SelectionStrategy>,
    output_path: Option<PathBuf>,
    output_format: Option<OutputFormat>,
    trace_csv: Option<PathBuf>,
    visualization_mode: Option<VisualizationMode>,
    frame_delay: Option<String>,
    progress_interval: Option<String>,
    survey: Option<usize>,
    survey_csv: Option<PathBuf>,
    log_level: Option<GlobalLogLevel>,
    progress_log_level: Option<ProgressLogLevel>,
}

/// Fully resolved settings the application runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub catalog: String,
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub attempts: u32,
    pub selection: SelectionStrategy,
    pub output_path: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub trace_csv: Option<PathBuf>,
    pub visualization_mode: VisualizationMode,
    pub frame_delay: Duration,
    pub progress_interval: Option<Duration>,
    pub survey: Option<usize>,
    pub survey_csv: Option<PathBuf>,
    pub log_level: GlobalLogLevel,
    pub progress_log_level: ProgressLogLevel,
}

fn parse_duration(key: &str, value: Option<String>) -> Result<Option<Duration>, AppError> {
    value
        .map(|text| {
            humantime::parse_duration(&text)
                .map_err(|e| AppError::Config(format!("Invalid duration for {key}: '{text}' ({e})")))
        })
        .transpose()
}

impl AppConfig {
    /// Merges the command line with the config file and environment, applies
    /// defaults and validates the result.
    pub fn resolve(self) -> Result<Settings, AppError> {
        let mut figment = Figment::new();
        if let Some(path) = &self.config {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        let file: FileConfig = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let frame_delay = match self.frame_delay {
            Some(delay) => Some(delay),
            None => parse_duration("frame_delay", file.frame_delay)?,
        };
        let progress_interval = match self.progress_interval {
            Some(interval) => Some(interval),
            None => parse_duration("progress_interval", file.progress_interval)?,
        };

        let settings = Settings {
            catalog: self
                .catalog
                .or(file.catalog)
                .unwrap_or_else(|| DEFAULT_CATALOG.to_owned()),
            width: self.width.or(file.width).unwrap_or(DEFAULT_WIDTH),
            height: self.height.or(file.height).unwrap_or(DEFAULT_HEIGHT),
            seed: self.seed.or(file.seed).unwrap_or_else(rand::random),
            attempts: self.attempts.or(file.attempts).unwrap_or(1),
            selection: self.selection.or(file.selection).unwrap_or_default(),
            output_path: self.output_path.or(file.output_path),
            output_format: self.output_format.or(file.output_format).unwrap_or_default(),
            trace_csv: self.trace_csv.or(file.trace_csv),
            visualization_mode: self
                .visualization_mode
                .or(file.visualization_mode)
                .unwrap_or_default(),
            frame_delay: frame_delay.unwrap_or(DEFAULT_FRAME_DELAY),
            progress_interval,
            survey: self.survey.or(file.survey),
            survey_csv: self.survey_csv.or(file.survey_csv),
            log_level: self.log_level.or(file.log_level).unwrap_or_default(),
            progress_log_level: self
                .progress_log_level
                .or(file.progress_log_level)
                .unwrap_or_default(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Settings {
    fn validate(&self) -> Result<(), AppError> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Config(format!(
                "Grid dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.attempts == 0 {
            return Err(AppError::Config("attempts must be at least 1".to_owned()));
        }
        if self.survey == Some(0) {
            return Err(AppError::Config("survey needs at least 1 run".to_owned()));
        }
        if self.survey_csv.is_some() && self.survey.is_none() {
            log::warn!("survey_csv is set without survey; it will be ignored");
        }
        Ok(())
    }
}
