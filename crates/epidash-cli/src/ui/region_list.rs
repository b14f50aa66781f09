//! Region sidebar.

use epidash_core::source::DatasetSource;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph},
};

use super::widgets::pane;
use crate::app::App;

/// Render the region list into `area`.
pub fn draw<S: DatasetSource>(f: &mut Frame, area: Rect, app: &App<S>) {
  let entries = app.filtered_entries();
  let filtering = app.filter_active || !app.filter.is_empty();

  let title = if filtering {
    format!("Regions ({}/{})", entries.len(), app.regions.len())
  } else {
    format!("Regions ({})", app.regions.len())
  };
  let block = pane(&title);

  let items: Vec<ListItem> = entries
    .iter()
    .map(|entry| {
      let marker = if *entry == app.selection { "● " } else { "  " };
      ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::raw(entry.label().to_owned()),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Filter bar on the last inner line.
  if filtering && inner_area.height > 2 {
    let filter_area = Rect {
      y: inner_area.y + inner_area.height - 1,
      height: 1,
      ..inner_area
    };
    inner_area.height -= 1;

    let cursor = if app.filter_active { "_" } else { "" };
    f.render_widget(
      Paragraph::new(format!("/{}{cursor}", app.filter))
        .style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let mut state = ListState::default();
  state.select((!entries.is_empty()).then_some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
