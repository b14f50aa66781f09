//! `epidash`: terminal dashboard over a COVID-19 observation CSV.
//!
//! # Usage
//!
//! ```
//! epidash --data covid_19_data.csv --region Italy
//! epidash --config ~/.config/epidash/config.toml --log epidash.log
//! ```

mod app;
mod format;
mod ui;

use std::{
  fs::File,
  io,
  path::PathBuf,
  sync::{Arc, Mutex},
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use epidash_core::{Dashboard, aggregate::DEFAULT_TOP_N, source::DatasetSource};
use epidash_store_csv::{CsvStore, DEFAULT_DATA_PATH};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

const DEFAULT_REGION: &str = "Mainland China";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "epidash", about = "Terminal dashboard for COVID-19 observations")]
struct Args {
  /// Path to a TOML config file (data_path, default_region, top_n).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Observation CSV to load (default: covid_19_data.csv).
  #[arg(long, env = "EPIDASH_DATA")]
  data: Option<PathBuf>,

  /// Region selected at startup (default: Mainland China).
  #[arg(long, env = "EPIDASH_REGION")]
  region: Option<String>,

  /// Number of regions in the ranking table (default: 10).
  #[arg(long)]
  top: Option<usize>,

  /// Write diagnostics to FILE. Nothing is logged otherwise.
  #[arg(long, value_name = "FILE")]
  log: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug, PartialEq, Eq)]
struct ConfigFile {
  #[serde(default)]
  data_path:      Option<PathBuf>,
  #[serde(default)]
  default_region: Option<String>,
  #[serde(default)]
  top_n:          Option<usize>,
}

/// Effective settings after layering flags over the config file.
#[derive(Debug, PartialEq, Eq)]
struct Settings {
  data_path:      PathBuf,
  default_region: String,
  top_n:          usize,
}

impl Settings {
  /// CLI flags override the config file, which overrides defaults.
  fn resolve(args: &Args, file: ConfigFile) -> Self {
    Self {
      data_path:      args
        .data
        .clone()
        .or(file.data_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
      default_region: args
        .region
        .clone()
        .or(file.default_region)
        .unwrap_or_else(|| DEFAULT_REGION.to_string()),
      top_n:          args.top.or(file.top_n).unwrap_or(DEFAULT_TOP_N),
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  let args = Args::parse();

  // The terminal is ours; diagnostics only go to a file.
  if let Some(path) = &args.log {
    let file = File::create(path)
      .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env())
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  }

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };
  let settings = Settings::resolve(&args, file_cfg);

  // Load before touching the terminal so a bad dataset is reported plainly.
  let store = Arc::new(CsvStore::new(&settings.data_path));
  let dashboard = Dashboard::from_source(store.as_ref())
    .with_context(|| format!("loading dataset {}", store.default_path().display()))?;
  tracing::info!(
    path = %store.default_path().display(),
    rows = dashboard.table().len(),
    "dataset loaded"
  );

  let mut app = App::new(
    dashboard,
    store,
    Some(settings.default_region.as_str()),
    settings.top_n,
  );

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

fn run_event_loop<S: DatasetSource>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    if !event::poll(Duration::from_millis(50)).context("polling events")? {
      continue;
    }
    match event::read().context("reading event")? {
      Event::Key(key) => {
        if !app.handle_key(key) {
          break;
        }
      }
      // Resizes are picked up by the next draw.
      _ => {}
    }
  }

  Ok(())
}
