//! JSON REST API for epidash.
//!
//! Exposes an axum [`Router`] that serves the dashboard's consumer interface
//! from a shared [`Dashboard`]. Transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", epidash_api::api_router(state))
//! ```

pub mod admin;
pub mod countries;
pub mod error;
pub mod metrics;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use epidash_core::{Dashboard, source::DatasetSource};

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub dashboard: Arc<Dashboard>,
  /// Where `/reload` re-reads the table from.
  pub source:    Arc<S>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      dashboard: self.dashboard.clone(),
      source:    self.source.clone(),
    }
  }
}

impl<S: DatasetSource> ApiState<S> {
  /// Load the initial table from `source` and wrap both in shared state.
  pub fn load(source: S) -> Result<Self, S::Error> {
    let dashboard = Dashboard::from_source(&source)?;
    Ok(Self {
      dashboard: Arc::new(dashboard),
      source:    Arc::new(source),
    })
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: DatasetSource + 'static,
{
  Router::new()
    .route("/regions", get(metrics::regions::<S>))
    .route("/snapshot", get(metrics::snapshot::<S>))
    .route("/series", get(metrics::series::<S>))
    .route("/top", get(metrics::top::<S>))
    .route("/countries/{region}", get(countries::get_one::<S>))
    .route("/health", get(admin::health::<S>))
    .route("/reload", post(admin::reload::<S>))
    .with_state(state)
}
