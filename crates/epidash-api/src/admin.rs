//! Handlers for `/health` and `/reload`.

use axum::{Json, extract::State};
use epidash_core::{Table, TableVersion, source::DatasetSource};
use serde::Serialize;
use tracing::{info, warn};

use crate::{ApiState, error::ApiError};

/// Identity of the table currently in service.
#[derive(Debug, Serialize)]
pub struct TableInfo {
  pub version: TableVersion,
  pub rows:    usize,
}

impl TableInfo {
  fn of(table: &Table) -> Self {
    Self {
      version: table.version(),
      rows:    table.len(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct Health {
  pub status: &'static str,
  #[serde(flatten)]
  pub table:  TableInfo,
}

/// `GET /health`
pub async fn health<S>(State(state): State<ApiState<S>>) -> Json<Health> {
  Json(Health {
    status: "ok",
    table:  TableInfo::of(&state.dashboard.table()),
  })
}

/// `POST /reload`: re-read the source and put the new table in service.
///
/// On failure the previous table keeps serving and the error is a 500.
pub async fn reload<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<TableInfo>, ApiError>
where
  S: DatasetSource + 'static,
{
  let worker = state.clone();
  let table = tokio::task::spawn_blocking(move || {
    worker.dashboard.reload_from(worker.source.as_ref())
  })
  .await
  .map_err(|e| ApiError::Source(Box::new(e)))?
  .map_err(|e| {
    warn!(error = %e, "reload failed; keeping current table");
    ApiError::Source(Box::new(e))
  })?;

  info!(version = %table.version(), rows = table.len(), "reloaded dataset");
  Ok(Json(TableInfo::of(&table)))
}
