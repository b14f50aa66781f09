//! Handlers for the global aggregate endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/regions`  | Sorted distinct region names |
//! | `GET`  | `/snapshot` | Totals at the latest date; 422 on an empty dataset |
//! | `GET`  | `/series`   | Per-date totals, ascending |
//! | `GET`  | `/top`      | Optional `?n=<count>` (default 10); 422 on an empty dataset |

use axum::{
  Json,
  extract::{Query, State},
};
use epidash_core::{
  aggregate::DEFAULT_TOP_N,
  record::{DatedTotals, RegionTotals},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

/// `GET /regions`
pub async fn regions<S>(State(state): State<ApiState<S>>) -> Json<Vec<String>> {
  Json(state.dashboard.list_regions())
}

/// `GET /snapshot`
pub async fn snapshot<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<DatedTotals>, ApiError> {
  Ok(Json(state.dashboard.global_snapshot()?))
}

/// `GET /series`
pub async fn series<S>(State(state): State<ApiState<S>>) -> Json<Vec<DatedTotals>> {
  Json(state.dashboard.global_series())
}

#[derive(Debug, Deserialize, Default)]
pub struct TopParams {
  /// How many regions to return; defaults to [`DEFAULT_TOP_N`].
  pub n: Option<usize>,
}

/// `GET /top[?n=<count>]`
pub async fn top<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<TopParams>,
) -> Result<Json<Vec<RegionTotals>>, ApiError> {
  let n = params.n.unwrap_or(DEFAULT_TOP_N);
  Ok(Json(state.dashboard.top_ranked(n)?))
}
