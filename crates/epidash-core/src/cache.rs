//! Memoisation of aggregate results keyed by (table version, query).

use std::{
  collections::HashMap,
  sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
  record::{CountryReport, DatedTotals, RegionTotals},
  table::TableVersion,
};

// ─── Keys and values ─────────────────────────────────────────────────────────

/// A query together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
  Regions,
  GlobalSnapshot,
  GlobalSeries,
  Country(String),
  /// The full ranking; callers truncate it to the `n` they asked for.
  Ranking,
}

/// A cached result. The variant always matches the [`Query`] it was stored
/// under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cached {
  Regions(Vec<String>),
  Snapshot(DatedTotals),
  Series(Vec<DatedTotals>),
  Country(CountryReport),
  Top(Vec<RegionTotals>),
}

// ─── Cache ───────────────────────────────────────────────────────────────────

/// Thread-safe result cache. Entries belong to exactly one table version and
/// are dropped with [`AggregateCache::invalidate`] when that table is
/// replaced.
#[derive(Debug, Default)]
pub struct AggregateCache {
  entries: Mutex<HashMap<(TableVersion, Query), Cached>>,
}

impl AggregateCache {
  pub fn new() -> Self {
    Self::default()
  }

  fn entries(&self) -> MutexGuard<'_, HashMap<(TableVersion, Query), Cached>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn get(&self, version: TableVersion, query: &Query) -> Option<Cached> {
    self.entries().get(&(version, query.clone())).cloned()
  }

  pub fn insert(&self, version: TableVersion, query: Query, value: Cached) {
    self.entries().insert((version, query), value);
  }

  /// Drop every entry computed against `version`. Returns how many were
  /// removed.
  pub fn invalidate(&self, version: TableVersion) -> usize {
    let mut entries = self.entries();
    let before = entries.len();
    entries.retain(|(v, _), _| *v != version);
    before - entries.len()
  }

  /// Drop every entry not computed against `version`. Returns how many were
  /// removed.
  pub fn retain_version(&self, version: TableVersion) -> usize {
    let mut entries = self.entries();
    let before = entries.len();
    entries.retain(|(v, _), _| *v == version);
    before - entries.len()
  }

  pub fn len(&self) -> usize {
    self.entries().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries().is_empty()
  }
}
