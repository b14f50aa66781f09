//! Country detail tab.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  widgets::{Row, Table},
};

use super::widgets::{self, dim, pane};
use crate::{app::CountryView, format};

pub fn draw(f: &mut Frame, area: Rect, view: &CountryView, scroll: usize) {
  let report = match view {
    CountryView::Report(report) => report,
    CountryView::NoRegion => {
      widgets::placeholder(
        f,
        area,
        "Country",
        "Select a region in the sidebar and press Enter.",
        dim(),
      );
      return;
    }
    CountryView::Unavailable(e) => {
      widgets::placeholder(
        f,
        area,
        "Country",
        &format!("No data: {e}"),
        Style::default().fg(Color::Yellow),
      );
      return;
    }
  };

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(4),
      Constraint::Percentage(50),
      Constraint::Min(0),
    ])
    .split(area);

  widgets::cards(f, rows[0], Some(&report.snapshot));
  widgets::series_chart(f, rows[1], &report.region, &report.series);

  // Newest first.
  let body = report.series.iter().rev().skip(scroll).map(|p| {
    Row::new(vec![
      format::date(p.date),
      format::count(p.totals.confirmed),
      format::count(p.totals.deaths),
      format::count(p.totals.recovered),
    ])
  });
  let title = format!(
    "{} observations ({}/{})",
    report.region,
    scroll + 1,
    report.series.len()
  );
  let table = Table::new(body, [
    Constraint::Length(12),
    Constraint::Length(14),
    Constraint::Length(12),
    Constraint::Length(12),
  ])
  .header(
    Row::new(["Date", "Confirmed", "Deaths", "Recovered"])
      .style(Style::default().add_modifier(Modifier::BOLD)),
  )
  .block(pane(&title));
  f.render_widget(table, rows[2]);
}
