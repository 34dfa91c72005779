use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::view::ShortcutInfo;

/// Draw the footer bar: view breadcrumb on the left, then either the status
/// message or the current view's shortcuts
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  breadcrumb: &[String],
  shortcuts: &[ShortcutInfo],
  status: Option<&str>,
) {
  let mut spans = vec![Span::raw(" ")];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == breadcrumb.len() - 1 {
      // Current view
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  spans.push(Span::raw("   "));

  if let Some(status) = status {
    spans.push(Span::styled(status.to_string(), Style::default().fg(Color::Yellow)));
  } else {
    let mut shortcuts = shortcuts.to_vec();
    shortcuts.sort_by_key(|s| s.priority);
    for shortcut in shortcuts {
      spans.push(Span::styled(
        format!("<{}>", shortcut.key),
        Style::default().fg(Color::Cyan),
      ));
      spans.push(Span::styled(
        format!(" {}  ", shortcut.label),
        Style::default().fg(Color::DarkGray),
      ));
    }
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
