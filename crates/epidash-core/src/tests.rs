//! Tests for the aggregation queries and the `Dashboard` service.

use std::{
  collections::BTreeSet,
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
};

use chrono::NaiveDate;

use crate::{
  Dashboard, Error, Table, TableVersion,
  aggregate::{self, DEFAULT_TOP_N},
  cache::{Cached, Query},
  record::Observation,
  source::DatasetSource,
};

fn d(day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(2020, 3, day).unwrap()
}

fn obs(id: u64, day: u32, region: &str, confirmed: u32) -> Observation {
  Observation::new(id, d(day), region, confirmed, confirmed / 10, confirmed / 2)
}

fn table(rows: Vec<Observation>) -> Table {
  Table::new(TableVersion(1), rows)
}

/// Brazil (D1: 5, D2: 9) and Italy (D1: 3, D2: 3).
fn brazil_italy() -> Table {
  table(vec![
    obs(1, 1, "Brazil", 5),
    obs(2, 1, "Italy", 3),
    obs(3, 2, "Brazil", 9),
    obs(4, 2, "Italy", 3),
  ])
}

/// Several regions, provinces and uneven reporting dates.
fn mixed() -> Table {
  let mut hubei = obs(3, 2, "Mainland China", 400);
  hubei.province_state = Some("Hubei".into());
  let mut beijing = obs(4, 2, "Mainland China", 40);
  beijing.province_state = Some("Beijing".into());

  table(vec![
    obs(1, 1, "Mainland China", 100),
    obs(2, 1, "Italy", 2),
    hubei,
    beijing,
    obs(5, 2, "Italy", 20),
    obs(6, 3, "Italy", 200),
    obs(7, 3, "US", 150),
    obs(8, 1, "Diamond Princess", 61),
    obs(9, 3, "Brazil", 150),
    obs(10, 3, "Mainland China", 800),
  ])
}

// ─── Region catalog ──────────────────────────────────────────────────────────

#[test]
fn regions_are_distinct_and_byte_ordered() {
  let t = table(vec![
    obs(1, 1, "Zambia", 1),
    obs(2, 1, "albania", 1),
    obs(3, 2, "Brazil", 1),
    obs(4, 2, "Zambia", 1),
  ]);
  assert_eq!(aggregate::regions(&t), vec!["Brazil", "Zambia", "albania"]);
}

#[test]
fn regions_of_empty_table() {
  assert!(aggregate::regions(&table(vec![])).is_empty());
}

// ─── Global snapshot ─────────────────────────────────────────────────────────

#[test]
fn brazil_italy_snapshot() {
  let snap = aggregate::global_snapshot(&brazil_italy()).unwrap();
  assert_eq!(snap.date, d(2));
  assert_eq!(snap.totals.confirmed, 12);
}

#[test]
fn snapshot_date_is_latest_date() {
  let t = mixed();
  let snap = aggregate::global_snapshot(&t).unwrap();
  let max = t.rows().iter().map(|r| r.observation_date).max().unwrap();
  assert_eq!(snap.date, max);
  // Italy 200 + US 150 + Brazil 150 + Mainland China 800.
  assert_eq!(snap.totals.confirmed, 1300);
}

#[test]
fn snapshot_of_empty_table_fails() {
  assert_eq!(
    aggregate::global_snapshot(&table(vec![])),
    Err(Error::EmptyDataset)
  );
}

// ─── Global series ───────────────────────────────────────────────────────────

#[test]
fn series_is_strictly_ascending_over_distinct_dates() {
  let t = mixed();
  let series = aggregate::global_series(&t);

  assert!(series.windows(2).all(|w| w[0].date < w[1].date));

  let expected: BTreeSet<_> = t.rows().iter().map(|r| r.observation_date).collect();
  let got: BTreeSet<_> = series.iter().map(|p| p.date).collect();
  assert_eq!(got, expected);
  assert_eq!(series.len(), expected.len());
}

#[test]
fn series_conserves_counts_per_date() {
  let t = mixed();
  for point in aggregate::global_series(&t) {
    let confirmed: u64 = t
      .rows_on(point.date)
      .map(|r| u64::from(r.confirmed))
      .sum();
    let deaths: u64 = t.rows_on(point.date).map(|r| u64::from(r.deaths)).sum();
    assert_eq!(point.totals.confirmed, confirmed, "date {}", point.date);
    assert_eq!(point.totals.deaths, deaths, "date {}", point.date);
  }
}

#[test]
fn series_sums_province_rows() {
  let series = aggregate::global_series(&mixed());
  let day2 = series.iter().find(|p| p.date == d(2)).unwrap();
  // Hubei 400 + Beijing 40 + Italy 20.
  assert_eq!(day2.totals.confirmed, 460);
}

#[test]
fn series_of_empty_table_is_empty() {
  assert!(aggregate::global_series(&table(vec![])).is_empty());
}

// ─── Country series ──────────────────────────────────────────────────────────

#[test]
fn country_snapshot_commutes_with_filtering() {
  let t = mixed();
  for region in aggregate::regions(&t) {
    let report = aggregate::country_series(&t, &region).unwrap();

    let latest = t.rows_for(&region).map(|r| r.observation_date).max().unwrap();
    let expected: u64 = t
      .rows_for(&region)
      .filter(|r| r.observation_date == latest)
      .map(|r| u64::from(r.confirmed))
      .sum();

    assert_eq!(report.snapshot.date, latest, "{region}");
    assert_eq!(report.snapshot.totals.confirmed, expected, "{region}");
    assert_eq!(report.series.last(), Some(&report.snapshot));
  }
}

#[test]
fn country_uses_its_own_latest_date() {
  let report = aggregate::country_series(&mixed(), "Diamond Princess").unwrap();
  assert_eq!(report.snapshot.date, d(1));
  assert_eq!(report.snapshot.totals.confirmed, 61);
  assert_eq!(report.series.len(), 1);
}

#[test]
fn country_series_groups_provinces_by_date() {
  let report = aggregate::country_series(&mixed(), "Mainland China").unwrap();
  let confirmed: Vec<u64> = report.series.iter().map(|p| p.totals.confirmed).collect();
  assert_eq!(confirmed, vec![100, 440, 800]);
}

#[test]
fn unknown_region_is_not_found() {
  assert_eq!(
    aggregate::country_series(&brazil_italy(), "Atlantis"),
    Err(Error::RegionNotFound("Atlantis".into()))
  );
}

#[test]
fn region_match_is_case_sensitive() {
  assert!(aggregate::country_series(&brazil_italy(), "brazil").is_err());
}

// ─── Top-N ───────────────────────────────────────────────────────────────────

#[test]
fn brazil_italy_top_one() {
  let top = aggregate::top_ranked(&brazil_italy(), 1).unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0].region, "Brazil");
  assert_eq!(top[0].totals.confirmed, 9);
}

#[test]
fn top_is_sorted_bounded_and_known() {
  let t = mixed();
  let top = aggregate::top_ranked(&t, DEFAULT_TOP_N).unwrap();
  let regions = aggregate::regions(&t);

  assert!(top.len() <= DEFAULT_TOP_N);
  assert!(
    top
      .windows(2)
      .all(|w| w[0].totals.confirmed >= w[1].totals.confirmed)
  );
  assert!(top.iter().all(|r| regions.contains(&r.region)));
}

#[test]
fn top_only_counts_latest_date() {
  let top = aggregate::top_ranked(&mixed(), DEFAULT_TOP_N).unwrap();
  let names: Vec<&str> = top.iter().map(|r| r.region.as_str()).collect();
  // Diamond Princess has no row on the latest date.
  assert_eq!(names, vec!["Mainland China", "Italy", "Brazil", "US"]);
}

#[test]
fn top_ties_break_by_region_name() {
  let top = aggregate::top_ranked(&mixed(), DEFAULT_TOP_N).unwrap();
  let brazil = top.iter().position(|r| r.region == "Brazil").unwrap();
  let us = top.iter().position(|r| r.region == "US").unwrap();
  assert!(brazil < us);
}

#[test]
fn top_zero_and_empty() {
  assert!(aggregate::top_ranked(&mixed(), 0).unwrap().is_empty());
  assert_eq!(
    aggregate::top_ranked(&table(vec![]), 10),
    Err(Error::EmptyDataset)
  );
}

// ─── Serialisation shape ─────────────────────────────────────────────────────

#[test]
fn dated_totals_serialise_flat() {
  let snap = aggregate::global_snapshot(&brazil_italy()).unwrap();
  let json = serde_json::to_value(snap).unwrap();
  assert_eq!(
    json,
    serde_json::json!({
      "date": "2020-03-02",
      "confirmed": 12,
      "deaths": 0,
      "recovered": 5,
    })
  );
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[test]
fn dashboard_memoises_successful_queries() {
  let dash = Dashboard::new(Arc::new(mixed()));
  assert!(dash.cache().is_empty());

  let first = dash.top_ranked(3).unwrap();
  assert_eq!(dash.cache().len(), 1);
  let second = dash.top_ranked(3).unwrap();
  assert_eq!(first, second);
  assert_eq!(dash.cache().len(), 1);

  dash.list_regions();
  dash.global_series();
  dash.global_snapshot().unwrap();
  dash.country_series("Italy").unwrap();
  assert_eq!(dash.cache().len(), 5);
}

#[test]
fn top_ranked_shares_one_entry_across_n() {
  let dash = Dashboard::new(Arc::new(brazil_italy()));
  for n in 0..500 {
    let top = dash.top_ranked(n).unwrap();
    assert_eq!(top.len(), n.min(2));
  }
  assert_eq!(dash.cache().len(), 1);
  assert_eq!(dash.top_ranked(1).unwrap()[0].region, "Brazil");
}

#[test]
fn dashboard_does_not_cache_errors() {
  let dash = Dashboard::new(Arc::new(mixed()));
  assert!(dash.country_series("Atlantis").is_err());
  assert!(dash.cache().is_empty());
}

#[test]
fn replace_table_invalidates_previous_version() {
  let dash = Dashboard::new(Arc::new(brazil_italy()));
  assert_eq!(dash.global_snapshot().unwrap().totals.confirmed, 12);

  let newer = Table::new(TableVersion(2), vec![obs(1, 5, "Chile", 7)]);
  assert_eq!(dash.replace_table(Arc::new(newer)), TableVersion(1));
  assert!(dash.cache().is_empty());

  let snap = dash.global_snapshot().unwrap();
  assert_eq!(snap.date, d(5));
  assert_eq!(snap.totals.confirmed, 7);
  assert_eq!(dash.list_regions(), vec!["Chile"]);
}

#[test]
fn replace_table_drops_entries_of_any_stale_version() {
  let dash = Dashboard::new(Arc::new(brazil_italy()));
  dash.list_regions();
  // An entry left behind by a computation that raced an earlier swap.
  dash
    .cache()
    .insert(TableVersion(0), Query::Regions, Cached::Regions(vec!["Gone".into()]));
  assert_eq!(dash.cache().len(), 2);

  let newer = Table::new(TableVersion(2), vec![obs(1, 5, "Chile", 7)]);
  dash.replace_table(Arc::new(newer));
  assert!(dash.cache().is_empty());
}

/// Hands out the Brazil/Italy rows with a fresh version on every reload.
struct CountingSource {
  next: AtomicU64,
}

#[derive(Debug, thiserror::Error)]
#[error("unreachable")]
struct NeverFails;

impl DatasetSource for CountingSource {
  type Error = NeverFails;

  fn load(&self) -> Result<Arc<Table>, NeverFails> {
    self.reload()
  }

  fn reload(&self) -> Result<Arc<Table>, NeverFails> {
    let version = TableVersion(self.next.fetch_add(1, Ordering::SeqCst));
    Ok(Arc::new(Table::new(version, brazil_italy().rows().to_vec())))
  }
}

#[test]
fn reload_from_source_bumps_version() {
  let source = CountingSource { next: AtomicU64::new(1) };
  let dash = Dashboard::from_source(&source).unwrap();
  assert_eq!(dash.table().version(), TableVersion(1));
  dash.list_regions();

  let table = dash.reload_from(&source).unwrap();
  assert_eq!(table.version(), TableVersion(2));
  assert_eq!(dash.table().version(), TableVersion(2));
  assert!(dash.cache().is_empty());
  assert_eq!(dash.list_regions(), vec!["Brazil", "Italy"]);
}
