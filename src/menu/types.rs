use serde::{Deserialize, Serialize};
use std::fmt;

/// A dish or drink as published in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
  pub name: String,
  /// Currency-formatted, e.g. "R$ 12,50"
  pub price: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
}

/// Item names may carry inline badge markup ("Pudim<span ...>novo</span>").
/// Returns the name without it.
pub fn display_name(name: &str) -> &str {
  name.split("<span").next().unwrap_or(name).trim_end()
}

impl MenuItem {
  pub fn display_name(&self) -> &str {
    display_name(&self.name)
  }
}

/// Coarse section tag used by the type filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionType {
  Food,
  Drinks,
  Other(String),
}

impl From<String> for SectionType {
  fn from(tag: String) -> Self {
    match tag.as_str() {
      "food" => SectionType::Food,
      "drinks" => SectionType::Drinks,
      _ => SectionType::Other(tag),
    }
  }
}

impl From<SectionType> for String {
  fn from(section_type: SectionType) -> Self {
    match section_type {
      SectionType::Food => "food".to_string(),
      SectionType::Drinks => "drinks".to_string(),
      SectionType::Other(tag) => tag,
    }
  }
}

impl SectionType {
  pub fn label(&self) -> &str {
    match self {
      SectionType::Food => "Comidas",
      SectionType::Drinks => "Bebidas",
      SectionType::Other(tag) => tag,
    }
  }
}

impl fmt::Display for SectionType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// A titled group of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSection {
  pub id: String,
  pub title: String,
  #[serde(rename = "type")]
  pub section_type: SectionType,
  #[serde(default)]
  pub items: Vec<MenuItem>,
}

/// One aggregated cart entry per item name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
  pub name: String,
  /// Copied from the item when first added
  pub price: String,
  /// Section title when first added
  pub category: String,
  pub quantity: u32,
}

/// Who is ordering and where to deliver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  #[serde(default)]
  pub name: String,
  /// Table number or delivery address
  #[serde(default)]
  pub address: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
}

impl UserProfile {
  /// Name and address are both filled in.
  pub fn is_identified(&self) -> bool {
    !self.name.trim().is_empty() && !self.address.trim().is_empty()
  }

  /// The phone number, if one was actually entered.
  pub fn phone(&self) -> Option<&str> {
    self
      .phone
      .as_deref()
      .map(str::trim)
      .filter(|p| !p.is_empty())
  }
}
