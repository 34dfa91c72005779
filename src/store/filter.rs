use std::fmt;

use super::favorites::Favorites;
use crate::menu::{MenuSection, SectionType};

/// Active section-type filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SectionFilter {
  #[default]
  All,
  Only(SectionType),
}

impl SectionFilter {
  pub fn matches(&self, section: &MenuSection) -> bool {
    match self {
      SectionFilter::All => true,
      SectionFilter::Only(section_type) => &section.section_type == section_type,
    }
  }

  /// The next filter in the cycle All → each type in catalog order → All.
  pub fn next(&self, sections: &[MenuSection]) -> SectionFilter {
    let mut types: Vec<&SectionType> = Vec::new();
    for section in sections {
      if !types.contains(&&section.section_type) {
        types.push(&section.section_type);
      }
    }

    let next_index = match self {
      SectionFilter::All => 0,
      SectionFilter::Only(current) => types
        .iter()
        .position(|t| *t == current)
        .map(|i| i + 1)
        .unwrap_or(types.len()),
    };

    types
      .get(next_index)
      .map(|t| SectionFilter::Only((*t).clone()))
      .unwrap_or(SectionFilter::All)
  }
}

impl fmt::Display for SectionFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SectionFilter::All => f.write_str("Todos"),
      SectionFilter::Only(section_type) => write!(f, "{}", section_type),
    }
  }
}

/// Derive the visible sections without touching the catalog.
///
/// The type filter applies first. In favorites mode a section survives only if
/// it has a favorited item, and its items are narrowed to those; the search
/// query is ignored in that mode. Otherwise a non-empty query keeps sections
/// with at least one item whose name contains it, ignoring case.
pub fn filter_sections(
  sections: &[MenuSection],
  query: &str,
  filter: &SectionFilter,
  favorites_only: bool,
  favorites: &Favorites,
) -> Vec<MenuSection> {
  let query = query.to_lowercase();

  sections
    .iter()
    .filter(|section| filter.matches(section))
    .filter_map(|section| {
      if favorites_only {
        let items: Vec<_> = section
          .items
          .iter()
          .filter(|item| favorites.contains(&item.name))
          .cloned()
          .collect();
        if items.is_empty() {
          return None;
        }
        return Some(MenuSection {
          items,
          ..section.clone()
        });
      }

      if query.is_empty()
        || section
          .items
          .iter()
          .any(|item| item.name.to_lowercase().contains(&query))
      {
        Some(section.clone())
      } else {
        None
      }
    })
    .collect()
}
