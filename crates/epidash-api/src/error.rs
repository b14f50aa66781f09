//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("no data: {0}")]
  NoData(String),

  #[error("source error: {0}")]
  Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<epidash_core::Error> for ApiError {
  fn from(e: epidash_core::Error) -> Self {
    match e {
      epidash_core::Error::RegionNotFound(_) => ApiError::NotFound(e.to_string()),
      epidash_core::Error::EmptyDataset => ApiError::NoData(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::NoData(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Source(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
