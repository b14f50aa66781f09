//! Global overview tab: worldwide cards, the global series and the ranking.

use epidash_core::Error;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  widgets::{Cell, Row, Table},
};

use super::widgets::{self, dim, pane};
use crate::{app::GlobalView, format};

pub fn draw(f: &mut Frame, area: Rect, view: &GlobalView, top_n: usize) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(4),
      Constraint::Percentage(55),
      Constraint::Min(0),
    ])
    .split(area);

  widgets::cards(f, rows[0], view.snapshot.as_ref().ok());
  widgets::series_chart(f, rows[1], "Global series", &view.series);

  let title = format!("Top {top_n} by confirmed");
  match &view.top {
    Ok(top) => {
      let max = top.first().map_or(0, |r| r.totals.confirmed);
      let body = top.iter().enumerate().map(|(i, r)| {
        let heat = Style::default()
          .fg(Color::Black)
          .bg(widgets::shade(r.totals.confirmed, max));
        Row::new(vec![
          Cell::from(format!("{}", i + 1)),
          Cell::from(r.region.clone()),
          Cell::from(format::count(r.totals.confirmed)).style(heat),
          Cell::from(format::count(r.totals.deaths)),
          Cell::from(format::count(r.totals.recovered)),
        ])
      });

      let table = Table::new(body, [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(12),
      ])
      .header(
        Row::new(["#", "Region", "Confirmed", "Deaths", "Recovered"])
          .style(Style::default().add_modifier(Modifier::BOLD)),
      )
      .block(pane(&title));
      f.render_widget(table, rows[2]);
    }
    Err(e) => widgets::placeholder(f, rows[2], &title, &empty_message(e), dim()),
  }
}

fn empty_message(e: &Error) -> String {
  match e {
    Error::EmptyDataset => "The dataset has no observations.".into(),
    other => other.to_string(),
  }
}
