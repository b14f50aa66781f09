//! Application state and event dispatcher.
//!
//! Key presses are translated into [`Action`]s. Each action refreshes only
//! the views it affects: selecting a region recomputes the country view,
//! reloading recomputes everything, navigation recomputes nothing.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use epidash_core::{
  Dashboard, Error,
  record::{CountryReport, DatedTotals, RegionTotals},
  source::DatasetSource,
};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use tracing::{info, warn};

// ─── Tabs and selection ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Global,
  Country,
}

impl Tab {
  pub const ALL: [Tab; 2] = [Tab::Global, Tab::Country];

  pub fn title(self) -> &'static str {
    match self {
      Tab::Global => "Global overview",
      Tab::Country => "Country detail",
    }
  }

  fn next(self) -> Self {
    match self {
      Tab::Global => Tab::Country,
      Tab::Country => Tab::Global,
    }
  }
}

/// One sidebar entry: every region, or a single one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
  All,
  Region(String),
}

impl Selection {
  pub fn label(&self) -> &str {
    match self {
      Selection::All => "All",
      Selection::Region(r) => r,
    }
  }
}

// ─── Views ────────────────────────────────────────────────────────────────────

/// Everything the global tab renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalView {
  pub snapshot: Result<DatedTotals, Error>,
  pub series:   Vec<DatedTotals>,
  pub top:      Result<Vec<RegionTotals>, Error>,
}

/// Everything the country tab renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryView {
  /// "All" is selected; nothing to show but a hint.
  NoRegion,
  Report(CountryReport),
  /// The selected region has no rows in the current table.
  Unavailable(Error),
}

// ─── Actions ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  Quit,
  NextTab,
  ShowTab(Tab),
  CursorDown,
  CursorUp,
  /// Select the sidebar entry under the cursor.
  SelectCursor,
  StartFilter,
  FilterPush(char),
  FilterPop,
  FilterCommit,
  FilterCancel,
  ScrollDown,
  ScrollUp,
  Reload,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S> {
  pub tab:            Tab,
  /// All regions of the current table, sorted.
  pub regions:        Vec<String>,
  pub selection:      Selection,
  /// Current fuzzy-filter string (only active when `filter_active`).
  pub filter:         String,
  pub filter_active:  bool,
  /// Cursor position within the *filtered* sidebar.
  pub list_cursor:    usize,
  /// Scroll offset within the country table.
  pub country_scroll: usize,
  pub top_n:          usize,
  pub global:         GlobalView,
  pub country:        CountryView,
  /// One-line status message shown in the status bar.
  pub status_msg:     String,
  dashboard:          Dashboard,
  source:             Arc<S>,
}

impl<S: DatasetSource> App<S> {
  /// Build the app over an already-loaded dashboard. `default_region` is
  /// selected when present in the table.
  pub fn new(
    dashboard: Dashboard,
    source: Arc<S>,
    default_region: Option<&str>,
    top_n: usize,
  ) -> Self {
    let regions = dashboard.list_regions();
    let global = Self::global_view(&dashboard, top_n);
    let mut app = Self {
      tab: Tab::Global,
      regions,
      selection: Selection::All,
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      country_scroll: 0,
      top_n,
      global,
      country: CountryView::NoRegion,
      status_msg: String::new(),
      dashboard,
      source,
    };

    if let Some(region) = default_region
      && app.regions.iter().any(|r| r == region)
    {
      app.select(Selection::Region(region.to_owned()));
      app.cursor_to_selection();
      app.tab = Tab::Global;
    }
    app
  }

  pub fn dashboard(&self) -> &Dashboard {
    &self.dashboard
  }

  // ── View refresh ──────────────────────────────────────────────────────────

  fn global_view(dashboard: &Dashboard, top_n: usize) -> GlobalView {
    GlobalView {
      snapshot: dashboard.global_snapshot(),
      series:   dashboard.global_series(),
      top:      dashboard.top_ranked(top_n),
    }
  }

  fn refresh_country(&mut self) {
    self.country_scroll = 0;
    self.country = match &self.selection {
      Selection::All => CountryView::NoRegion,
      Selection::Region(region) => match self.dashboard.country_series(region) {
        Ok(report) => CountryView::Report(report),
        Err(e) => CountryView::Unavailable(e),
      },
    };
  }

  fn select(&mut self, selection: Selection) {
    if selection != self.selection || self.country == CountryView::NoRegion {
      self.selection = selection;
      self.refresh_country();
    }
    if matches!(self.selection, Selection::Region(_)) {
      self.tab = Tab::Country;
    }
  }

  /// Put the sidebar cursor on the selected entry, or the top if it is
  /// filtered out.
  fn cursor_to_selection(&mut self) {
    self.list_cursor = self
      .filtered_entries()
      .iter()
      .position(|e| *e == self.selection)
      .unwrap_or(0);
  }

  fn reload(&mut self) {
    match self.dashboard.reload_from(self.source.as_ref()) {
      Ok(table) => {
        info!(version = %table.version(), rows = table.len(), "dataset reloaded");
        self.regions = self.dashboard.list_regions();
        self.global = Self::global_view(&self.dashboard, self.top_n);
        self.refresh_country();
        self.cursor_to_selection();
        self.status_msg = format!("Reloaded {} rows", table.len());
      }
      Err(e) => {
        warn!(error = %e, "reload failed");
        self.status_msg = format!("Reload failed: {e}");
      }
    }
  }

  // ── Filtered sidebar ──────────────────────────────────────────────────────

  /// Sidebar entries matching the current filter. "All" is listed first
  /// whenever no filter is set.
  pub fn filtered_entries(&self) -> Vec<Selection> {
    if self.filter.is_empty() {
      return std::iter::once(Selection::All)
        .chain(self.regions.iter().cloned().map(Selection::Region))
        .collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .regions
      .iter()
      .filter(|r| matcher.fuzzy_match(r, &self.filter).is_some())
      .cloned()
      .map(Selection::Region)
      .collect()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Translate a key press into an action, if it maps to one.
  pub fn action_for(&self, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Some(Action::Quit);
    }

    if self.filter_active {
      return match key.code {
        KeyCode::Esc => Some(Action::FilterCancel),
        KeyCode::Enter => Some(Action::FilterCommit),
        KeyCode::Backspace => Some(Action::FilterPop),
        KeyCode::Char(c) => Some(Action::FilterPush(c)),
        _ => None,
      };
    }

    match key.code {
      KeyCode::Char('q') => Some(Action::Quit),
      KeyCode::Tab => Some(Action::NextTab),
      KeyCode::Char('1') => Some(Action::ShowTab(Tab::Global)),
      KeyCode::Char('2') => Some(Action::ShowTab(Tab::Country)),
      KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
      KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
      KeyCode::Enter => Some(Action::SelectCursor),
      KeyCode::Char('/') => Some(Action::StartFilter),
      KeyCode::PageDown => Some(Action::ScrollDown),
      KeyCode::PageUp => Some(Action::ScrollUp),
      KeyCode::Char('r') => Some(Action::Reload),
      _ => None,
    }
  }

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    match self.action_for(key) {
      Some(action) => self.apply(action),
      None => true,
    }
  }

  /// Apply one action. Returns `true` to continue, `false` to quit.
  pub fn apply(&mut self, action: Action) -> bool {
    match action {
      Action::Quit => return false,
      Action::NextTab => self.tab = self.tab.next(),
      Action::ShowTab(tab) => self.tab = tab,

      Action::CursorDown => {
        let len = self.filtered_entries().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      Action::CursorUp => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }
      Action::SelectCursor => {
        if let Some(entry) = self.filtered_entries().get(self.list_cursor).cloned() {
          self.select(entry);
        }
      }

      Action::StartFilter => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }
      Action::FilterPush(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      Action::FilterPop => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      Action::FilterCancel => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      Action::FilterCommit => {
        self.filter_active = false;
        self.list_cursor = 0;
        // Immediately select if there's exactly one match.
        let entries = self.filtered_entries();
        if let [only] = entries.as_slice() {
          let only = only.clone();
          self.select(only);
        }
      }

      Action::ScrollDown => {
        if let CountryView::Report(report) = &self.country
          && self.country_scroll + 1 < report.series.len()
        {
          self.country_scroll += 1;
        }
      }
      Action::ScrollUp => {
        self.country_scroll = self.country_scroll.saturating_sub(1);
      }

      Action::Reload => self.reload(),
    }
    true
  }
}
