//! Module defining parsers for different rule file formats.

pub mod parser;
pub use parser::FormatParser;

pub mod json_format;
pub mod ron_format;
mod schema;

pub use json_format::JsonFormatParser;
pub use ron_format::RonFormatParser;
