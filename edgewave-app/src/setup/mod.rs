//! Setup module for the edgewave application.
//!
//! Catalog loading and the standard, animated and survey execution modes.

pub mod execution;
