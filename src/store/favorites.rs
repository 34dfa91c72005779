use serde::{Deserialize, Serialize};

/// Favorited item names, unique, in the order they were marked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
  names: Vec<String>,
}

impl Favorites {
  pub fn contains(&self, name: &str) -> bool {
    self.names.iter().any(|n| n == name)
  }

  /// Flip membership; returns the new state.
  pub fn toggle(&mut self, name: &str) -> bool {
    if let Some(index) = self.names.iter().position(|n| n == name) {
      self.names.remove(index);
      false
    } else {
      self.names.push(name.to_string());
      true
    }
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// Drop duplicates a hand-edited or older save might contain.
  pub(crate) fn dedup(mut self) -> Self {
    let mut seen = std::collections::HashSet::new();
    self.names.retain(|n| seen.insert(n.clone()));
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_toggle_twice_restores() {
    let mut favorites = Favorites::default();
    assert!(favorites.toggle("Feijoada"));
    assert!(favorites.contains("Feijoada"));
    assert!(!favorites.toggle("Feijoada"));
    assert!(!favorites.contains("Feijoada"));
  }

  #[test]
  fn test_insertion_order_is_kept() {
    let mut favorites = Favorites::default();
    favorites.toggle("Suco");
    favorites.toggle("Feijoada");
    favorites.toggle("Pudim");
    favorites.toggle("Feijoada");

    assert_eq!(
      serde_json::to_string(&favorites).unwrap(),
      r#"["Suco","Pudim"]"#
    );
  }

  #[test]
  fn test_dedup_saved_list() {
    let favorites: Favorites = serde_json::from_str(r#"["A","B","A"]"#).unwrap();
    let favorites = favorites.dedup();
    assert_eq!(favorites.len(), 2);
  }
}
