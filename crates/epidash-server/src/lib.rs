//! HTTP server wiring for epidash.
//!
//! Resolves [`ServerConfig`] from an optional TOML file plus `EPIDASH_*`
//! environment variables, and mounts the JSON API under `/api`.

use std::path::{Path, PathBuf};

use axum::Router;
use epidash_api::{ApiState, api_router};
use epidash_core::source::DatasetSource;
use epidash_store_csv::DEFAULT_DATA_PATH;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:      String,
  #[serde(default = "default_port")]
  pub port:      u16,
  /// Observation CSV served by the API; a leading `~/` is expanded.
  #[serde(default = "default_data_path")]
  pub data_path: PathBuf,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8050
}

fn default_data_path() -> PathBuf {
  PathBuf::from(DEFAULT_DATA_PATH)
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:      default_host(),
      port:      default_port(),
      data_path: default_data_path(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  /// `data_path` with a leading `~/` expanded to `$HOME`.
  pub fn resolved_data_path(&self) -> PathBuf {
    expand_tilde(&self.data_path)
  }
}

/// Read `path` (optional) and overlay `EPIDASH_*` environment variables.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("EPIDASH"))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: API under `/api` with request tracing.
pub fn app<S>(state: ApiState<S>) -> Router
where
  S: DatasetSource + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
