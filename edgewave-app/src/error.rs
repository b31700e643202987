use edgewave_core::{SolveStatus, SolverError};
use edgewave_rules::LoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog Error: {0}")]
    Catalog(#[from] LoadError),

    #[error("Solver Error: {0}")]
    Solver(#[from] SolverError),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Logger Error: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Visualization Error: {0}")]
    Visualization(String),

    /// Every attempt ended in a contradiction.
    #[error("No solution after {attempts} attempt(s): {status}")]
    Unresolved { attempts: u32, status: SolveStatus },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
