//! Observation rows and the aggregate shapes derived from them.
//!
//! Counts are cumulative totals as of the observation date, not daily deltas.
//! Per-row counts fit in `u32`; every sum is widened to `u64`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Observation ─────────────────────────────────────────────────────────────

/// One report for a (region, date) pair, with canonical field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
  /// Source row identifier; unique per row, otherwise unused.
  pub id:               u64,
  pub observation_date: NaiveDate,
  pub province_state:   Option<String>,
  /// Primary grouping key.
  pub country_region:   String,
  /// Carried through verbatim; no aggregation reads it.
  pub last_update:      String,
  pub confirmed:        u32,
  pub deaths:           u32,
  pub recovered:        u32,
}

impl Observation {
  /// Convenience constructor for a row with no province and no update stamp.
  pub fn new(
    id: u64,
    observation_date: NaiveDate,
    country_region: impl Into<String>,
    confirmed: u32,
    deaths: u32,
    recovered: u32,
  ) -> Self {
    Self {
      id,
      observation_date,
      province_state: None,
      country_region: country_region.into(),
      last_update: String::new(),
      confirmed,
      deaths,
      recovered,
    }
  }

  /// The three counts of this row as [`Totals`].
  pub fn totals(&self) -> Totals {
    Totals {
      confirmed: u64::from(self.confirmed),
      deaths:    u64::from(self.deaths),
      recovered: u64::from(self.recovered),
    }
  }
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// Summed confirmed / deaths / recovered counts.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Totals {
  pub confirmed: u64,
  pub deaths:    u64,
  pub recovered: u64,
}

impl Totals {
  /// Add one row's counts into this accumulator.
  pub fn add(&mut self, obs: &Observation) {
    let row = obs.totals();
    self.confirmed += row.confirmed;
    self.deaths += row.deaths;
    self.recovered += row.recovered;
  }
}

impl<'a> FromIterator<&'a Observation> for Totals {
  fn from_iter<I: IntoIterator<Item = &'a Observation>>(iter: I) -> Self {
    let mut totals = Totals::default();
    for obs in iter {
      totals.add(obs);
    }
    totals
  }
}

/// Totals at a single date. Used both for snapshots and for series points;
/// serialises flat as `{date, confirmed, deaths, recovered}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedTotals {
  pub date:   NaiveDate,
  #[serde(flatten)]
  pub totals: Totals,
}

/// Totals for one region; a row of the top-N ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTotals {
  pub region: String,
  #[serde(flatten)]
  pub totals: Totals,
}

/// Per-date series for one region plus its latest-date snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryReport {
  pub region:   String,
  /// Ascending by date.
  pub series:   Vec<DatedTotals>,
  /// The series point at the latest date reported for this region.
  pub snapshot: DatedTotals,
}
