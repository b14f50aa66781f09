//! Row parsing and coercion.

use std::io;

use chrono::NaiveDate;
use epidash_core::{Table, TableVersion, record::Observation};
use serde::Deserialize;

use crate::{LoadError, Result};

/// Header names that must be present, matched exactly.
pub const REQUIRED_COLUMNS: [&str; 8] = [
  "SNo",
  "ObservationDate",
  "Province/State",
  "Country/Region",
  "Last Update",
  "Confirmed",
  "Deaths",
  "Recovered",
];

/// One CSV row under its source header names. Blank cells of `Option`
/// fields deserialise as `None`.
#[derive(Debug, Deserialize)]
struct RawRow {
  #[serde(rename = "SNo")]
  sno:              String,
  #[serde(rename = "ObservationDate")]
  observation_date: String,
  #[serde(rename = "Province/State")]
  province_state:   Option<String>,
  #[serde(rename = "Country/Region")]
  country_region:   String,
  #[serde(rename = "Last Update")]
  last_update:      Option<String>,
  #[serde(rename = "Confirmed")]
  confirmed:        Option<String>,
  #[serde(rename = "Deaths")]
  deaths:           Option<String>,
  #[serde(rename = "Recovered")]
  recovered:        Option<String>,
}

/// Parse a whole CSV document into a [`Table`] tagged with `version`.
///
/// Columns beyond [`REQUIRED_COLUMNS`] are ignored.
pub fn parse_reader<R: io::Read>(reader: R, version: TableVersion) -> Result<Table> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .from_reader(reader);

  let headers = reader.headers()?.clone();
  if let Some(missing) = REQUIRED_COLUMNS
    .iter()
    .copied()
    .find(|name| !headers.iter().any(|h| h == *name))
  {
    return Err(LoadError::MissingColumn(missing));
  }

  let mut rows = Vec::new();
  for record in reader.records() {
    let record = record?;
    let line = record.position().map_or(0, |p| p.line());
    let raw: RawRow = record.deserialize(Some(&headers))?;
    rows.push(convert(line, raw)?);
  }

  Ok(Table::new(version, rows))
}

fn convert(line: u64, raw: RawRow) -> Result<Observation> {
  let id = parse_integral(&raw.sno).ok_or_else(|| LoadError::InvalidId {
    line,
    value: raw.sno.clone(),
  })?;

  let observation_date =
    parse_date(&raw.observation_date).ok_or_else(|| LoadError::InvalidDate {
      line,
      value: raw.observation_date.clone(),
    })?;

  if raw.country_region.trim().is_empty() {
    return Err(LoadError::BlankRegion { line });
  }

  Ok(Observation {
    id,
    observation_date,
    province_state: raw.province_state,
    country_region: raw.country_region,
    last_update: raw.last_update.unwrap_or_default(),
    confirmed: parse_count(line, "Confirmed", raw.confirmed.as_deref())?,
    deaths: parse_count(line, "Deaths", raw.deaths.as_deref())?,
    recovered: parse_count(line, "Recovered", raw.recovered.as_deref())?,
  })
}

/// Blank → 0; otherwise a non-negative integral value that fits in `u32`.
fn parse_count(line: u64, column: &'static str, raw: Option<&str>) -> Result<u32> {
  let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
    return Ok(0);
  };
  parse_integral(raw)
    .and_then(|n| u32::try_from(n).ok())
    .ok_or_else(|| LoadError::InvalidCount {
      line,
      column,
      value: raw.to_owned(),
    })
}

/// Accepts `"42"` as well as integral float spellings such as `"42.0"`.
pub(crate) fn parse_integral(raw: &str) -> Option<u64> {
  let raw = raw.trim();
  if let Ok(n) = raw.parse::<u64>() {
    return Some(n);
  }
  let f = raw.parse::<f64>().ok()?;
  (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64)
    .then_some(f as u64)
}

/// `MM/DD/YYYY`, `MM/DD/YY` or `YYYY-MM-DD`.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  let short_year = raw.rsplit_once('/').is_some_and(|(_, y)| y.len() == 2);
  let formats: &[&str] = if short_year {
    &["%m/%d/%y"]
  } else {
    &["%m/%d/%Y", "%Y-%m-%d"]
  };
  formats
    .iter()
    .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
}
