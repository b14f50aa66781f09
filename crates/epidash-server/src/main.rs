//! epidash-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), loads the
//! observation CSV, and serves the JSON API over HTTP.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use epidash_api::ApiState;
use epidash_store_csv::CsvStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "epidash JSON API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = epidash_server::load_config(&cli.config)
    .context("failed to read configuration")?;

  // A dataset that cannot be loaded aborts startup.
  let data_path = server_cfg.resolved_data_path();
  let store = CsvStore::new(&data_path);
  let state = tokio::task::spawn_blocking(move || ApiState::load(store))
    .await
    .context("loader task panicked")?
    .with_context(|| format!("failed to load dataset {}", data_path.display()))?;

  let app = epidash_server::app(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
