//! TUI rendering: header, region sidebar, tabbed body and status bar.

pub mod country;
pub mod global;
pub mod region_list;
pub mod widgets;

use epidash_core::source::DatasetSource;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph, Tabs},
};

use crate::{
  app::{App, Tab},
  format,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: DatasetSource>(f: &mut Frame, app: &App<S>) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S: DatasetSource>(f: &mut Frame, area: Rect, app: &App<S>) {
  let table = app.dashboard().table();
  let through = table
    .latest_date()
    .map_or_else(|| "no data".to_string(), |d| format!("through {}", format::date(d)));

  let left = Span::styled(
    " epidash  COVID-19 dashboard",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{}  {} rows  {through} ", table.version(), table.len()),
    Style::default().fg(Color::Gray),
  );

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<S: DatasetSource>(f: &mut Frame, area: Rect, app: &App<S>) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
    .split(area);

  region_list::draw(f, cols[0], app);

  let right = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(cols[1]);

  let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
    .select(Tab::ALL.iter().position(|t| *t == app.tab))
    .style(Style::default().fg(Color::DarkGray))
    .highlight_style(
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    );
  f.render_widget(tabs, right[0]);

  match app.tab {
    Tab::Global => global::draw(f, right[1], &app.global, app.top_n),
    Tab::Country => country::draw(f, right[1], &app.country, app.country_scroll),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: DatasetSource>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = if app.filter_active {
    ("FILTER", "Type to filter  Esc cancel  Enter apply")
  } else {
    match app.tab {
      Tab::Global => (
        "GLOBAL",
        "↑↓/jk navigate  Enter select  / filter  Tab switch  r reload  q quit",
      ),
      Tab::Country => (
        "COUNTRY",
        "↑↓/jk navigate  Enter select  PgUp/PgDn scroll  Tab switch  r reload  q quit",
      ),
    }
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
