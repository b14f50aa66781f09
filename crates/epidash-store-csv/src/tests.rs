//! Loader tests against in-memory documents and temporary files.

use std::{io::Write, path::Path, sync::Arc};

use chrono::NaiveDate;
use epidash_core::{Dashboard, Error, TableVersion, source::DatasetSource};
use tempfile::NamedTempFile;

use crate::{CsvStore, LoadError, parse_reader};

const HEADER: &str =
  "SNo,ObservationDate,Province/State,Country/Region,Last Update,Confirmed,Deaths,Recovered";

fn doc(rows: &[&str]) -> String {
  let mut out = String::from(HEADER);
  for row in rows {
    out.push('\n');
    out.push_str(row);
  }
  out.push('\n');
  out
}

fn temp_csv(contents: &str) -> NamedTempFile {
  let mut tmp = NamedTempFile::new().unwrap();
  write!(tmp, "{contents}").unwrap();
  tmp
}

fn brazil_italy() -> String {
  doc(&[
    "1,03/01/2020,,Brazil,2020-03-01T10:00:00,5,0,0",
    "2,03/01/2020,,Italy,2020-03-01T10:00:00,3,0,0",
    "3,03/02/2020,,Brazil,2020-03-02T10:00:00,9,1,2",
    "4,03/02/2020,,Italy,2020-03-02T10:00:00,3,0,1",
  ])
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

#[test]
fn rows_get_canonical_fields() {
  let csv = doc(&[
    "1,01/22/2020,Hubei,Mainland China,1/22/2020 17:00,444.0,17.0,28.0",
    "2,01/22/2020,,Japan,1/22/2020 17:00,2,,",
  ]);
  let table = parse_reader(csv.as_bytes(), TableVersion(9)).unwrap();
  assert_eq!(table.version(), TableVersion(9));
  assert_eq!(table.len(), 2);

  let hubei = &table.rows()[0];
  assert_eq!(hubei.id, 1);
  assert_eq!(
    hubei.observation_date,
    NaiveDate::from_ymd_opt(2020, 1, 22).unwrap()
  );
  assert_eq!(hubei.province_state.as_deref(), Some("Hubei"));
  assert_eq!(hubei.country_region, "Mainland China");
  assert_eq!(hubei.last_update, "1/22/2020 17:00");
  assert_eq!((hubei.confirmed, hubei.deaths, hubei.recovered), (444, 17, 28));

  let japan = &table.rows()[1];
  assert_eq!(japan.province_state, None);
  assert_eq!((japan.confirmed, japan.deaths, japan.recovered), (2, 0, 0));
}

#[test]
fn quoted_fields_and_extra_columns() {
  let csv = format!(
    "{HEADER},Notes\n1,2020-03-01,,\"Korea, South\",x,10,1,0,hello\n"
  );
  let table = parse_reader(csv.as_bytes(), TableVersion(1)).unwrap();
  assert_eq!(table.rows()[0].country_region, "Korea, South");
  assert_eq!(table.rows()[0].confirmed, 10);
}

#[test]
fn columns_may_appear_in_any_order() {
  let csv = "Country/Region,Confirmed,Deaths,Recovered,SNo,ObservationDate,Province/State,Last Update\n\
             Peru,4,0,1,1,03/10/2020,,\n";
  let table = parse_reader(csv.as_bytes(), TableVersion(1)).unwrap();
  assert_eq!(table.rows()[0].country_region, "Peru");
  assert_eq!(table.rows()[0].confirmed, 4);
  assert_eq!(table.rows()[0].recovered, 1);
}

#[test]
fn missing_confirmed_column_fails() {
  let csv = "SNo,ObservationDate,Province/State,Country/Region,Last Update,Deaths,Recovered\n\
             1,03/01/2020,,Brazil,x,0,0\n";
  let err = parse_reader(csv.as_bytes(), TableVersion(1)).unwrap_err();
  assert!(matches!(err, LoadError::MissingColumn("Confirmed")), "{err}");
}

#[test]
fn header_names_are_case_sensitive() {
  let csv = HEADER.replace("Deaths", "deaths");
  let err = parse_reader(csv.as_bytes(), TableVersion(1)).unwrap_err();
  assert!(matches!(err, LoadError::MissingColumn("Deaths")), "{err}");
}

#[test]
fn empty_document_is_missing_columns() {
  let err = parse_reader("".as_bytes(), TableVersion(1)).unwrap_err();
  assert!(matches!(err, LoadError::MissingColumn("SNo")), "{err}");
}

#[test]
fn invalid_date_reports_line() {
  let csv = doc(&[
    "1,03/01/2020,,Brazil,x,5,0,0",
    "2,yesterday,,Brazil,x,5,0,0",
  ]);
  match parse_reader(csv.as_bytes(), TableVersion(1)) {
    Err(LoadError::InvalidDate { line, value }) => {
      assert_eq!(line, 3);
      assert_eq!(value, "yesterday");
    }
    other => panic!("expected InvalidDate, got {other:?}"),
  }
}

#[test]
fn negative_count_is_rejected() {
  let csv = doc(&["1,03/01/2020,,Brazil,x,5,0,-1"]);
  let err = parse_reader(csv.as_bytes(), TableVersion(1)).unwrap_err();
  assert!(
    matches!(err, LoadError::InvalidCount { column: "Recovered", .. }),
    "{err}"
  );
}

#[test]
fn invalid_id_is_rejected() {
  let csv = doc(&["one,03/01/2020,,Brazil,x,5,0,0"]);
  let err = parse_reader(csv.as_bytes(), TableVersion(1)).unwrap_err();
  assert!(matches!(err, LoadError::InvalidId { line: 2, .. }), "{err}");
}

#[test]
fn blank_region_is_rejected() {
  let csv = doc(&[
    "1,03/01/2020,,Brazil,x,5,0,0",
    "2,03/01/2020,Somewhere,,x,5,0,0",
  ]);
  let err = parse_reader(csv.as_bytes(), TableVersion(1)).unwrap_err();
  assert!(matches!(err, LoadError::BlankRegion { line: 3 }), "{err}");
}

#[test]
fn ragged_rows_are_csv_errors() {
  let csv = doc(&["1,03/01/2020,,Brazil,x,5"]);
  let err = parse_reader(csv.as_bytes(), TableVersion(1)).unwrap_err();
  assert!(matches!(err, LoadError::Csv(_)), "{err}");
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[test]
fn missing_file_is_io_error() {
  let store = CsvStore::default();
  let err = store
    .load_path(Path::new("/definitely/not/here.csv"))
    .unwrap_err();
  assert!(matches!(err, LoadError::Io { .. }), "{err}");
}

#[test]
fn same_path_returns_same_table() {
  let tmp = temp_csv(&brazil_italy());
  let store = CsvStore::default();

  let first = store.load_path(tmp.path()).unwrap();
  let second = store.load_path(tmp.path()).unwrap();
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(first.len(), 4);
}

#[test]
fn reload_rereads_with_new_version() {
  let mut tmp = temp_csv(&brazil_italy());
  let store = CsvStore::new(tmp.path());

  let first = store.load().unwrap();
  writeln!(tmp, "5,03/03/2020,,Chile,x,7,0,0").unwrap();
  tmp.flush().unwrap();

  // Still cached until reloaded.
  assert_eq!(store.load().unwrap().len(), 4);

  let reloaded = store.reload().unwrap();
  assert_eq!(reloaded.len(), 5);
  assert!(reloaded.version() > first.version());
  assert!(Arc::ptr_eq(&reloaded, &store.load().unwrap()));
}

#[test]
fn failed_reload_keeps_cached_table() {
  let tmp = temp_csv(&brazil_italy());
  let store = CsvStore::new(tmp.path());
  let first = store.load().unwrap();

  std::fs::write(tmp.path(), "not,a,dataset\n").unwrap();
  assert!(store.reload().is_err());
  assert!(Arc::ptr_eq(&first, &store.load().unwrap()));
}

#[test]
fn invalidate_forces_a_fresh_read() {
  let tmp = temp_csv(&brazil_italy());
  let store = CsvStore::default();
  let first = store.load_path(tmp.path()).unwrap();

  assert!(store.invalidate_path(tmp.path()));
  assert!(!store.invalidate_path(tmp.path()));

  let second = store.load_path(tmp.path()).unwrap();
  assert!(!Arc::ptr_eq(&first, &second));
  assert_ne!(first.version(), second.version());
}

// ─── Through the dashboard ───────────────────────────────────────────────────

#[test]
fn dashboard_over_loaded_file() {
  let tmp = temp_csv(&brazil_italy());
  let store = CsvStore::new(tmp.path());
  let dash = Dashboard::from_source(&store).unwrap();

  let snap = dash.global_snapshot().unwrap();
  assert_eq!(snap.date, NaiveDate::from_ymd_opt(2020, 3, 2).unwrap());
  assert_eq!(snap.totals.confirmed, 12);

  let top = dash.top_ranked(1).unwrap();
  assert_eq!(top[0].region, "Brazil");
  assert_eq!(top[0].totals.confirmed, 9);

  assert_eq!(dash.list_regions(), vec!["Brazil", "Italy"]);
}

#[test]
fn header_only_file_is_an_empty_dataset() {
  let tmp = temp_csv(&doc(&[]));
  let store = CsvStore::new(tmp.path());
  let dash = Dashboard::from_source(&store).unwrap();
  assert_eq!(dash.global_snapshot(), Err(Error::EmptyDataset));
  assert!(dash.global_series().is_empty());
}
