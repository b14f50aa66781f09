//! Handler for `GET /countries/{region}`.
//!
//! The region segment is percent-decoded and matched exactly against
//! `country_region`. Unknown regions are a 404.

use axum::{
  Json,
  extract::{Path, State},
};
use epidash_core::record::CountryReport;

use crate::{ApiState, error::ApiError};

/// `GET /countries/{region}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(region): Path<String>,
) -> Result<Json<CountryReport>, ApiError> {
  Ok(Json(state.dashboard.country_series(&region)?))
}
