use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::menu::price::format_price;
use crate::ui::view::Store;

/// Draw the header bar: business, active filters, cart summary and
/// connectivity
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  business_name: &str,
  store: &Store,
  offline: (&str, Color),
) {
  let sep = || Span::styled("│", Style::default().fg(Color::DarkGray));

  let mut spans = vec![
    Span::styled(
      format!(" {} ", business_name),
      Style::default().fg(Color::Cyan).bold(),
    ),
    sep(),
    Span::styled(
      format!(" {} ", store.filter()),
      Style::default().fg(Color::Yellow).bold(),
    ),
  ];

  if store.favorites_only() {
    spans.push(Span::styled(
      format!("★ favoritos ({}) ", store.favorites().len()),
      Style::default().fg(Color::Yellow),
    ));
  }
  if !store.search_query().is_empty() {
    spans.push(Span::styled(
      format!("/{} ", store.search_query()),
      Style::default().fg(Color::Cyan),
    ));
  }

  spans.push(sep());
  spans.push(Span::styled(
    format!(
      " 🛒 {} ({}) ",
      store.cart_item_count(),
      format_price(store.cart_total())
    ),
    Style::default().fg(Color::Green),
  ));
  spans.push(sep());

  let (label, color) = offline;
  spans.push(Span::styled(format!(" {} ", label), Style::default().fg(color)));

  if let Some(source) = store.catalog_source() {
    if source.is_offline() {
      spans.push(Span::styled(
        "(cardápio do cache) ",
        Style::default().fg(Color::DarkGray),
      ));
    }
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
