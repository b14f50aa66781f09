//! CSV loader for the epidash observation table.
//!
//! Parses the flat observation file into an [`epidash_core::Table`] with
//! canonical field names and coerced counts, and keeps loaded tables cached
//! by path.

mod parse;
mod store;

pub mod error;

pub use error::{LoadError, Result};
pub use parse::{REQUIRED_COLUMNS, parse_reader};
pub use store::{CsvStore, DEFAULT_DATA_PATH};

#[cfg(test)]
mod tests;
