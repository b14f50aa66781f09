//! Building blocks shared by both tabs: metric cards and the series chart.

use epidash_core::record::{DatedTotals, Totals};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  symbols,
  text::{Line, Span},
  widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
};

use crate::format;

pub const CONFIRMED: Color = Color::Rgb(255, 140, 0);
pub const DEATHS: Color = Color::Red;
pub const RECOVERED: Color = Color::Green;

const METRICS: [(&str, Color, fn(&Totals) -> u64); 3] = [
  ("Confirmed", CONFIRMED, |t| t.confirmed),
  ("Deaths", DEATHS, |t| t.deaths),
  ("Recovered", RECOVERED, |t| t.recovered),
];

pub fn dim() -> Style {
  Style::default().fg(Color::DarkGray)
}

pub fn pane(title: &str) -> Block<'static> {
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(dim())
}

/// A bordered pane containing one line of text.
pub fn placeholder(f: &mut Frame, area: Rect, title: &str, text: &str, style: Style) {
  let block = pane(title);
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(Span::styled(text.to_owned(), style))), inner);
}

// ─── Cards ────────────────────────────────────────────────────────────────────

/// Three side-by-side cards with the snapshot's counts and date.
/// `None` renders the cards without figures.
pub fn cards(f: &mut Frame, area: Rect, snapshot: Option<&DatedTotals>) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 3); 3])
    .split(area);

  for ((label, color, pick), col) in METRICS.iter().zip(cols.iter()) {
    let block = Block::default()
      .title(format!(" {label} "))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(*color));

    let lines = match snapshot {
      Some(s) => vec![
        Line::from(Span::styled(
          format::count(pick(&s.totals)),
          Style::default().fg(*color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("as of {}", format::date(s.date)), dim())),
      ],
      None => vec![Line::from(Span::styled("n/a", dim()))],
    };

    f.render_widget(Paragraph::new(lines).block(block), *col);
  }
}

// ─── Chart ────────────────────────────────────────────────────────────────────

/// Line chart of the three metrics over `series`, one point per date.
pub fn series_chart(f: &mut Frame, area: Rect, title: &str, series: &[DatedTotals]) {
  let (Some(first), Some(last)) = (series.first(), series.last()) else {
    placeholder(f, area, title, "No observations.", dim());
    return;
  };

  let points: Vec<Vec<(f64, f64)>> = METRICS
    .iter()
    .map(|(_, _, pick)| {
      series
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, pick(&p.totals) as f64))
        .collect()
    })
    .collect();

  let peak = series
    .iter()
    .flat_map(|p| METRICS.iter().map(move |(_, _, pick)| pick(&p.totals)))
    .max()
    .unwrap_or(0)
    .max(1);

  let datasets = METRICS
    .iter()
    .zip(points.iter())
    .map(|((label, color, _), data)| {
      Dataset::default()
        .name(*label)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(*color))
        .data(data)
    })
    .collect();

  let x_axis = Axis::default()
    .style(dim())
    .bounds([0.0, series.len().saturating_sub(1).max(1) as f64])
    .labels([format::date(first.date), format::date(last.date)]);
  let y_axis = Axis::default()
    .style(dim())
    .bounds([0.0, peak as f64])
    .labels(["0".to_string(), format::count(peak / 2), format::count(peak)]);

  f.render_widget(
    Chart::new(datasets)
      .block(pane(title))
      .x_axis(x_axis)
      .y_axis(y_axis)
      .legend_position(Some(LegendPosition::TopLeft)),
    area,
  );
}

/// Background for a confirmed cell: pale at zero, full orange at `max`.
pub fn shade(value: u64, max: u64) -> Color {
  let t = if max == 0 {
    0.0
  } else {
    value as f64 / max as f64
  };
  let lerp = |from: u8, to: u8| {
    (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8
  };
  Color::Rgb(255, lerp(235, 140), lerp(205, 0))
}
