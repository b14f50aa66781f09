//! [`CsvStore`]: the CSV implementation of [`DatasetSource`].

use std::{
  collections::HashMap,
  fs::File,
  path::{Path, PathBuf},
  sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
  },
};

use epidash_core::{Table, TableVersion, source::DatasetSource};
use tracing::{debug, info};

use crate::{LoadError, Result, parse::parse_reader};

/// File read when no path is configured.
pub const DEFAULT_DATA_PATH: &str = "covid_19_data.csv";

// ─── Store ───────────────────────────────────────────────────────────────────

/// Loads observation files and keeps each parsed table cached by path.
///
/// Repeated loads of the same path return the same `Arc<Table>` without
/// touching the file. Every actual read gets a fresh [`TableVersion`].
#[derive(Debug)]
pub struct CsvStore {
  default_path: PathBuf,
  tables:       Mutex<HashMap<PathBuf, Arc<Table>>>,
  next_version: AtomicU64,
}

impl CsvStore {
  /// A store whose [`DatasetSource`] impl reads `default_path`.
  pub fn new(default_path: impl Into<PathBuf>) -> Self {
    Self {
      default_path: default_path.into(),
      tables:       Mutex::new(HashMap::new()),
      next_version: AtomicU64::new(1),
    }
  }

  pub fn default_path(&self) -> &Path {
    &self.default_path
  }

  fn tables(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<Table>>> {
    self.tables.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Return the cached table for `path`, reading the file on first use.
  pub fn load_path(&self, path: &Path) -> Result<Arc<Table>> {
    let mut tables = self.tables();
    if let Some(table) = tables.get(path) {
      debug!(path = %path.display(), version = %table.version(), "table cache hit");
      return Ok(table.clone());
    }
    let table = self.read(path)?;
    tables.insert(path.to_path_buf(), table.clone());
    Ok(table)
  }

  /// Read `path` again and replace its cache entry. On error the previous
  /// entry, if any, is kept.
  pub fn reload_path(&self, path: &Path) -> Result<Arc<Table>> {
    let table = self.read(path)?;
    self.tables().insert(path.to_path_buf(), table.clone());
    Ok(table)
  }

  /// Forget the cached table for `path`. Returns whether one was cached.
  pub fn invalidate_path(&self, path: &Path) -> bool {
    self.tables().remove(path).is_some()
  }

  fn read(&self, path: &Path) -> Result<Arc<Table>> {
    let version = TableVersion(self.next_version.fetch_add(1, Ordering::Relaxed));
    let file = File::open(path).map_err(|source| LoadError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let table = parse_reader(file, version)?;
    info!(path = %path.display(), rows = table.len(), %version, "loaded observations");
    Ok(Arc::new(table))
  }
}

impl Default for CsvStore {
  fn default() -> Self {
    Self::new(DEFAULT_DATA_PATH)
  }
}

impl DatasetSource for CsvStore {
  type Error = LoadError;

  fn load(&self) -> Result<Arc<Table>> {
    self.load_path(&self.default_path)
  }

  fn reload(&self) -> Result<Arc<Table>> {
    self.reload_path(&self.default_path)
  }
}
