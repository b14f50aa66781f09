//! The `DatasetSource` trait.
//!
//! Implemented by loaders (e.g. `epidash-store-csv`). Higher layers
//! (`epidash-api`, `epidash-cli`) depend on this abstraction, not on any
//! concrete file format.

use std::sync::Arc;

use crate::table::Table;

/// Something that can produce the observation table.
pub trait DatasetSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the table, reusing a previously loaded copy when the source
  /// keeps one.
  fn load(&self) -> Result<Arc<Table>, Self::Error>;

  /// Re-read the underlying data unconditionally. The returned table carries
  /// a version newer than any previously returned one.
  fn reload(&self) -> Result<Arc<Table>, Self::Error>;
}
