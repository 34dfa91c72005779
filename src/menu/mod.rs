//! Menu catalog: sections, items, and prices as the business writes them.

pub mod catalog;
pub mod price;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{CatalogLoader, CatalogSource};
pub use types::{CartLine, MenuItem, MenuSection, SectionType, UserProfile};
