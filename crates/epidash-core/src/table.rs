//! The immutable, versioned observation table.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::Observation;

/// Identity of a loaded table. Every reload produces a new, larger version;
/// caches key their entries on it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TableVersion(pub u64);

impl fmt::Display for TableVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "v{}", self.0)
  }
}

/// A loaded dataset. Never mutated after construction; share it as
/// `Arc<Table>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
  version: TableVersion,
  rows:    Vec<Observation>,
}

impl Table {
  pub fn new(version: TableVersion, rows: Vec<Observation>) -> Self {
    Self { version, rows }
  }

  pub fn version(&self) -> TableVersion {
    self.version
  }

  pub fn rows(&self) -> &[Observation] {
    &self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// The most recent observation date, or `None` for an empty table.
  pub fn latest_date(&self) -> Option<NaiveDate> {
    self.rows.iter().map(|r| r.observation_date).max()
  }

  /// Rows reported on `date`.
  pub fn rows_on(&self, date: NaiveDate) -> impl Iterator<Item = &Observation> {
    self.rows.iter().filter(move |r| r.observation_date == date)
  }

  /// Rows whose `country_region` equals `region` exactly.
  pub fn rows_for<'a>(
    &'a self,
    region: &'a str,
  ) -> impl Iterator<Item = &'a Observation> + 'a {
    self.rows.iter().filter(move |r| r.country_region == region)
  }
}
