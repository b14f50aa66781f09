//! Error type for `epidash-store-csv`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("cannot read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("missing required column: {0:?}")]
  MissingColumn(&'static str),

  #[error("line {line}: invalid date {value:?}")]
  InvalidDate { line: u64, value: String },

  #[error("line {line}: invalid {column} count {value:?}")]
  InvalidCount {
    line:   u64,
    column: &'static str,
    value:  String,
  },

  #[error("line {line}: blank Country/Region")]
  BlankRegion { line: u64 },

  #[error("line {line}: invalid SNo {value:?}")]
  InvalidId { line: u64, value: String },
}

pub type Result<T, E = LoadError> = std::result::Result<T, E>;
