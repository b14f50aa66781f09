//! Error types for `epidash-core`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("dataset is empty")]
  EmptyDataset,

  #[error("region not found: {0:?}")]
  RegionNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
