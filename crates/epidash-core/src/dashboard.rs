//! [`Dashboard`]: the consumer-facing query service.
//!
//! Holds the current table and memoises every query against its version.
//! Swapping in a new table invalidates the previous version's entries.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::{
  Result,
  aggregate,
  cache::{AggregateCache, Cached, Query},
  record::{CountryReport, DatedTotals, RegionTotals},
  source::DatasetSource,
  table::{Table, TableVersion},
};

#[derive(Debug)]
pub struct Dashboard {
  table: RwLock<Arc<Table>>,
  cache: AggregateCache,
}

impl Dashboard {
  pub fn new(table: Arc<Table>) -> Self {
    Self {
      table: RwLock::new(table),
      cache: AggregateCache::new(),
    }
  }

  /// Load the initial table from `source`.
  pub fn from_source<S: DatasetSource>(source: &S) -> Result<Self, S::Error> {
    Ok(Self::new(source.load()?))
  }

  /// The table currently in service.
  pub fn table(&self) -> Arc<Table> {
    self
      .table
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  pub fn cache(&self) -> &AggregateCache {
    &self.cache
  }

  /// Put `table` in service and drop cached results of every other version.
  /// Returns the replaced version.
  pub fn replace_table(&self, table: Arc<Table>) -> TableVersion {
    let new_version = table.version();
    let old = {
      let mut slot = self.table.write().unwrap_or_else(PoisonError::into_inner);
      std::mem::replace(&mut *slot, table)
    };
    let old_version = old.version();
    if old_version != new_version {
      let dropped = self.cache.retain_version(new_version);
      info!(%old_version, %new_version, dropped, "table replaced");
    }
    old_version
  }

  /// Re-read `source` and put the fresh table in service. On error the
  /// current table stays in service.
  pub fn reload_from<S: DatasetSource>(
    &self,
    source: &S,
  ) -> Result<Arc<Table>, S::Error> {
    let table = source.reload()?;
    self.replace_table(table.clone());
    Ok(table)
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  /// `listRegions()`
  pub fn list_regions(&self) -> Vec<String> {
    let regions = self.memo(
      Query::Regions,
      |t| Ok(aggregate::regions(t)),
      Cached::Regions,
      |c| match c {
        Cached::Regions(v) => Some(v),
        _ => None,
      },
    );
    // `aggregate::regions` cannot fail.
    regions.unwrap_or_default()
  }

  /// `globalSnapshot()`
  pub fn global_snapshot(&self) -> Result<DatedTotals> {
    self.memo(
      Query::GlobalSnapshot,
      aggregate::global_snapshot,
      Cached::Snapshot,
      |c| match c {
        Cached::Snapshot(v) => Some(v),
        _ => None,
      },
    )
  }

  /// `globalSeries()`
  pub fn global_series(&self) -> Vec<DatedTotals> {
    let series = self.memo(
      Query::GlobalSeries,
      |t| Ok(aggregate::global_series(t)),
      Cached::Series,
      |c| match c {
        Cached::Series(v) => Some(v),
        _ => None,
      },
    );
    series.unwrap_or_default()
  }

  /// `countrySeries(region)`
  pub fn country_series(&self, region: &str) -> Result<CountryReport> {
    self.memo(
      Query::Country(region.to_owned()),
      |t| aggregate::country_series(t, region),
      Cached::Country,
      |c| match c {
        Cached::Country(v) => Some(v),
        _ => None,
      },
    )
  }

  /// `topRanked(n)`
  ///
  /// One ranking is cached per table whatever `n` is asked for.
  pub fn top_ranked(&self, n: usize) -> Result<Vec<RegionTotals>> {
    let mut ranked = self.memo(
      Query::Ranking,
      aggregate::ranking,
      Cached::Top,
      |c| match c {
        Cached::Top(v) => Some(v),
        _ => None,
      },
    )?;
    ranked.truncate(n);
    Ok(ranked)
  }

  /// Serve `query` from the cache or compute it against the current table.
  /// Errors are returned but never cached.
  fn memo<T: Clone>(
    &self,
    query: Query,
    compute: impl FnOnce(&Table) -> Result<T>,
    wrap: fn(T) -> Cached,
    unwrap: fn(Cached) -> Option<T>,
  ) -> Result<T> {
    let table = self.table();
    let version = table.version();

    if let Some(hit) = self.cache.get(version, &query).and_then(unwrap) {
      debug!(?query, %version, "aggregate cache hit");
      return Ok(hit);
    }

    debug!(?query, %version, "aggregate cache miss");
    let value = compute(&table)?;
    self.cache.insert(version, query, wrap(value.clone()));
    // The table may have been swapped while computing.
    if self.table().version() != version {
      self.cache.invalidate(version);
    }
    Ok(value)
  }
}
