//! Logging setup for the application.

use crate::config::{GlobalLogLevel, ProgressLogLevel, Settings};
use crate::error::AppError;
use env_logger::Builder;
use log::LevelFilter;

/// Module whose records follow the progress log level.
const PROGRESS_MODULE: &str = "edgewave_app::progress";

impl From<GlobalLogLevel> for LevelFilter {
    fn from(level: GlobalLogLevel) -> Self {
        match level {
            GlobalLogLevel::Trace => Self::Trace,
            GlobalLogLevel::Debug => Self::Debug,
            GlobalLogLevel::Info => Self::Info,
            GlobalLogLevel::Warn => Self::Warn,
            GlobalLogLevel::Error => Self::Error,
        }
    }
}

impl From<ProgressLogLevel> for LevelFilter {
    fn from(level: ProgressLogLevel) -> Self {
        match level {
            ProgressLogLevel::Trace => Self::Trace,
            ProgressLogLevel::Debug => Self::Debug,
            ProgressLogLevel::Info => Self::Info,
            ProgressLogLevel::Warn => Self::Warn,
        }
    }
}

/// Builds the logger without installing it.
///
/// The global level applies everywhere, the progress level to progress
/// reports. Directives in `RUST_LOG` are applied last and win.
pub fn build_logger(settings: &Settings, rust_log: Option<&str>) -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(settings.log_level.into());
    builder.filter_module(PROGRESS_MODULE, settings.progress_log_level.into());
    if let Some(filters) = rust_log {
        builder.parse_filters(filters);
    }
    builder
}

/// Initializes the global logger from the application settings.
///
/// # Errors
///
/// `AppError::Logger` if a logger was already installed.
pub fn init_logger(settings: &Settings) -> Result<(), AppError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    build_logger(settings, rust_log.as_deref()).try_init()?;

    log::debug!(
        "Logger initialized with global log level: {:?}, progress log level: {:?}",
        settings.log_level,
        settings.progress_log_level
    );
    Ok(())
}
