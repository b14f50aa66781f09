//! Pure aggregation queries over a [`Table`].
//!
//! Rows sharing a date are summed as-is; overlapping province and country
//! rows are not deduplicated.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::{
  Error, Result,
  record::{CountryReport, DatedTotals, Observation, RegionTotals, Totals},
  table::Table,
};

/// Number of rows returned by [`top_ranked`] when the caller has no
/// preference.
pub const DEFAULT_TOP_N: usize = 10;

/// Distinct region names, sorted by byte order (case-sensitive).
pub fn regions(table: &Table) -> Vec<String> {
  table
    .rows()
    .iter()
    .map(|r| r.country_region.as_str())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .map(str::to_owned)
    .collect()
}

/// Totals across every row at the table's latest date.
pub fn global_snapshot(table: &Table) -> Result<DatedTotals> {
  let date = table.latest_date().ok_or(Error::EmptyDataset)?;
  Ok(DatedTotals {
    date,
    totals: table.rows_on(date).collect(),
  })
}

/// Per-date totals across all regions, strictly ascending by date.
pub fn global_series(table: &Table) -> Vec<DatedTotals> {
  series_by_date(table.rows())
}

/// Per-date totals for `region` and the totals at its own latest date.
pub fn country_series(table: &Table, region: &str) -> Result<CountryReport> {
  let series = series_by_date(table.rows_for(region));
  let snapshot = *series
    .last()
    .ok_or_else(|| Error::RegionNotFound(region.to_owned()))?;
  Ok(CountryReport {
    region: region.to_owned(),
    series,
    snapshot,
  })
}

/// The `n` regions with the most confirmed cases at the global latest date.
///
/// Ordered by `confirmed` descending, ties by region name ascending.
pub fn top_ranked(table: &Table, n: usize) -> Result<Vec<RegionTotals>> {
  let mut ranked = ranking(table)?;
  ranked.truncate(n);
  Ok(ranked)
}

/// Every region at the global latest date, in [`top_ranked`] order.
pub fn ranking(table: &Table) -> Result<Vec<RegionTotals>> {
  let date = table.latest_date().ok_or(Error::EmptyDataset)?;

  let mut by_region: BTreeMap<&str, Totals> = BTreeMap::new();
  for obs in table.rows_on(date) {
    by_region
      .entry(obs.country_region.as_str())
      .or_default()
      .add(obs);
  }

  let mut ranked: Vec<RegionTotals> = by_region
    .into_iter()
    .map(|(region, totals)| RegionTotals {
      region: region.to_owned(),
      totals,
    })
    .collect();
  // Stable sort over name-ordered input keeps the name tie-break.
  ranked.sort_by(|a, b| b.totals.confirmed.cmp(&a.totals.confirmed));
  Ok(ranked)
}

fn series_by_date<'a>(
  rows: impl IntoIterator<Item = &'a Observation>,
) -> Vec<DatedTotals> {
  let mut by_date: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
  for obs in rows {
    by_date.entry(obs.observation_date).or_default().add(obs);
  }
  by_date
    .into_iter()
    .map(|(date, totals)| DatedTotals { date, totals })
    .collect()
}
