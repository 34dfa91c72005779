//! Fixed catalogs for store and view tests.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};

use super::catalog::CatalogSource;
use super::types::{MenuItem, MenuSection, SectionType};
use crate::offline::CacheResult;

/// Serves a fixed set of sections, or fails when given `None`.
pub struct FixedCatalog(pub Option<Vec<MenuSection>>);

#[async_trait]
impl CatalogSource for FixedCatalog {
  async fn load(&self) -> Result<CacheResult<Vec<MenuSection>>> {
    self
      .0
      .clone()
      .map(CacheResult::from_network)
      .ok_or_else(|| eyre!("network unreachable"))
  }
}

pub fn item(name: &str, price: &str) -> MenuItem {
  MenuItem {
    name: name.to_string(),
    price: price.to_string(),
    description: None,
    image: None,
  }
}

/// Two dishes and one drink.
pub fn sample_sections() -> Vec<MenuSection> {
  vec![
    MenuSection {
      id: "pratos".to_string(),
      title: "Pratos".to_string(),
      section_type: SectionType::Food,
      items: vec![item("Feijoada", "R$ 35,00"), item("Galinhada", "R$ 30,00")],
    },
    MenuSection {
      id: "bebidas".to_string(),
      title: "Bebidas".to_string(),
      section_type: SectionType::Drinks,
      items: vec![item("Suco de Caju", "R$ 8,00")],
    },
  ]
}
