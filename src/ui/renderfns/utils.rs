use ratatui::prelude::Color;

use crate::menu::SectionType;

/// Truncate a string to `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Accent color for a section heading
pub fn section_color(section_type: &SectionType) -> Color {
  match section_type {
    SectionType::Food => Color::LightRed,
    SectionType::Drinks => Color::LightBlue,
    SectionType::Other(_) => Color::Magenta,
  }
}
