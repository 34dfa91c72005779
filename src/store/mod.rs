//! Ordering state: catalog, search and filters, favorites, cart and user.
//!
//! The store owns all mutable state for one session. Derived views
//! (`filtered_sections`, `cart_total`, `cart_item_count`) are recomputed on
//! every call. Every mutation of favorites, cart or user is written straight
//! through to the key-value store.
//!
//! Lifecycle: `new` → `initialize` (loads catalog and saved state) → ready.

mod cart;
mod favorites;
mod filter;

pub use cart::Cart;
pub use favorites::Favorites;
pub use filter::{filter_sections, SectionFilter};

use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::checkout::{Checkout, CheckoutComposer};
use crate::config::Config;
use crate::kv::{self, KeyValueStore, CART_KEY, FAVORITES_KEY, USER_KEY};
use crate::menu::{CartLine, CatalogSource, MenuItem, MenuSection, UserProfile};
use crate::offline::ResponseSource;

/// Question asked before emptying the cart.
pub const CLEAR_CART_QUESTION: &str = "Deseja limpar todo o carrinho?";

pub struct OrderStore<K: KeyValueStore> {
  kv: K,
  composer: CheckoutComposer,
  loading_gate: Duration,

  sections: Vec<MenuSection>,
  catalog_source: Option<ResponseSource>,
  load_error: Option<String>,
  loading: bool,

  favorites: Favorites,
  cart: Cart,
  user: UserProfile,

  search_query: String,
  filter: SectionFilter,
  favorites_only: bool,
}

impl<K: KeyValueStore> OrderStore<K> {
  pub fn new(kv: K, composer: CheckoutComposer, loading_gate: Duration) -> Self {
    Self {
      kv,
      composer,
      loading_gate,
      sections: Vec::new(),
      catalog_source: None,
      load_error: None,
      loading: true,
      favorites: Favorites::default(),
      cart: Cart::default(),
      user: UserProfile::default(),
      search_query: String::new(),
      filter: SectionFilter::All,
      favorites_only: false,
    }
  }

  pub fn from_config(kv: K, config: &Config) -> Self {
    Self::new(
      kv,
      CheckoutComposer::from_config(config),
      config.loading_gate(),
    )
  }

  /// Load the catalog, then saved favorites, cart and user.
  ///
  /// Never fails: a catalog error leaves the menu empty and is kept in
  /// `load_error`; saved values that are missing or corrupt become defaults.
  /// The loading gate is a fixed delay before the store reports ready.
  pub async fn initialize<C: CatalogSource + ?Sized>(&mut self, catalog: &C) {
    self.loading = true;

    self.load_catalog(catalog).await;

    self.favorites = kv::load_or_default::<Favorites, _>(&self.kv, FAVORITES_KEY).dedup();
    self.cart = kv::load_or_default::<Cart, _>(&self.kv, CART_KEY).normalized();
    self.user = kv::load_or_default(&self.kv, USER_KEY);
    debug!(
      favorites = self.favorites.len(),
      cart_lines = self.cart.lines().len(),
      "saved state restored"
    );

    if !self.loading_gate.is_zero() {
      tokio::time::sleep(self.loading_gate).await;
    }

    self.loading = false;
  }

  /// Fetch the catalog again, keeping cart, favorites and filters.
  pub async fn reload_catalog<C: CatalogSource + ?Sized>(&mut self, catalog: &C) {
    self.load_catalog(catalog).await;
  }

  async fn load_catalog<C: CatalogSource + ?Sized>(&mut self, catalog: &C) {
    match catalog.load().await {
      Ok(result) => {
        if result.is_offline() {
          warn!(cached_at = ?result.cached_at, "network unavailable, showing cached menu");
        }
        info!(sections = result.data.len(), "catalog ready");
        self.sections = result.data;
        self.catalog_source = Some(result.source);
        self.load_error = None;
      }
      Err(e) => {
        error!(error = %e, "failed to load menu catalog");
        self.sections.clear();
        self.catalog_source = None;
        self.load_error = Some(e.to_string());
      }
    }
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn load_error(&self) -> Option<&str> {
    self.load_error.as_deref()
  }

  /// Where the current catalog came from; `None` if it failed to load.
  pub fn catalog_source(&self) -> Option<ResponseSource> {
    self.catalog_source
  }

  pub fn sections(&self) -> &[MenuSection] {
    &self.sections
  }

  // Search and filters

  pub fn search_query(&self) -> &str {
    &self.search_query
  }

  pub fn set_search_query(&mut self, query: &str) {
    self.search_query = query.to_string();
  }

  pub fn filter(&self) -> &SectionFilter {
    &self.filter
  }

  pub fn set_filter(&mut self, filter: SectionFilter) {
    self.filter = filter;
  }

  /// Advance All → each section type → All.
  pub fn cycle_filter(&mut self) {
    self.set_filter(self.filter.next(&self.sections));
  }

  pub fn favorites_only(&self) -> bool {
    self.favorites_only
  }

  pub fn toggle_favorites_only(&mut self) {
    self.favorites_only = !self.favorites_only;
  }

  /// Sections visible under the current query, filter and favorites mode.
  pub fn filtered_sections(&self) -> Vec<MenuSection> {
    self.compute_filtered_sections(&self.search_query, &self.filter, self.favorites_only)
  }

  pub fn compute_filtered_sections(
    &self,
    query: &str,
    filter: &SectionFilter,
    favorites_only: bool,
  ) -> Vec<MenuSection> {
    filter_sections(
      &self.sections,
      query,
      filter,
      favorites_only,
      &self.favorites,
    )
  }

  // Favorites

  pub fn favorites(&self) -> &Favorites {
    &self.favorites
  }

  pub fn is_favorite(&self, name: &str) -> bool {
    self.favorites.contains(name)
  }

  /// Returns the new favorite status.
  pub fn toggle_favorite(&mut self, name: &str) -> bool {
    let favorite = self.favorites.toggle(name);
    kv::save(&self.kv, FAVORITES_KEY, &self.favorites);
    favorite
  }

  // Cart

  pub fn cart_lines(&self) -> &[CartLine] {
    self.cart.lines()
  }

  pub fn add_to_cart(&mut self, item: &MenuItem, category: &str) {
    self.cart.add(item, category);
    self.save_cart();
  }

  pub fn remove_from_cart(&mut self, name: &str) {
    if self.cart.remove(name) {
      self.save_cart();
    }
  }

  pub fn update_quantity(&mut self, name: &str, delta: i32) {
    if self.cart.update_quantity(name, delta) {
      self.save_cart();
    }
  }

  pub fn item_quantity(&self, name: &str) -> u32 {
    self.cart.quantity_of(name)
  }

  pub fn cart_total(&self) -> Decimal {
    self.cart.total()
  }

  pub fn cart_item_count(&self) -> u32 {
    self.cart.item_count()
  }

  /// Empty the cart if `confirm` answers yes to `CLEAR_CART_QUESTION`.
  /// Returns whether the cart was cleared.
  pub fn clear_cart(&mut self, confirm: impl FnOnce(&str) -> bool) -> bool {
    if !confirm(CLEAR_CART_QUESTION) {
      return false;
    }
    self.cart.clear();
    self.save_cart();
    true
  }

  fn save_cart(&self) {
    kv::save(&self.kv, CART_KEY, &self.cart);
  }

  // User and checkout

  pub fn user(&self) -> &UserProfile {
    &self.user
  }

  /// Save the profile and compose the order.
  ///
  /// Does nothing and returns `None` unless name and address are filled in.
  /// On success the cart is emptied, since the order now lives in the
  /// messaging app.
  pub fn submit_user_profile(&mut self, profile: UserProfile) -> Option<Checkout> {
    if !profile.is_identified() {
      debug!("user profile incomplete, not submitting");
      return None;
    }

    self.user = profile;
    kv::save(&self.kv, USER_KEY, &self.user);

    let checkout = self
      .composer
      .compose(self.cart.lines(), &self.user, self.cart.total());
    info!(
      items = self.cart.item_count(),
      total = %self.cart.total(),
      "order composed"
    );

    self.cart.clear();
    self.save_cart();

    Some(checkout)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::kv::MemoryKvStore;
  use crate::menu::testing::{item, sample_sections as sections, FixedCatalog};
  use crate::menu::SectionType;

  fn store_with(kv: MemoryKvStore) -> OrderStore<MemoryKvStore> {
    OrderStore::new(
      kv,
      CheckoutComposer::new("Bistrô", "https://wa.me", "5583000000000"),
      Duration::ZERO,
    )
  }

  async fn ready_store() -> OrderStore<MemoryKvStore> {
    let mut store = store_with(MemoryKvStore::new());
    store.initialize(&FixedCatalog(Some(sections()))).await;
    store
  }

  #[tokio::test]
  async fn test_initialize_loads_catalog_and_saved_state() {
    let kv = MemoryKvStore::new();
    kv.set(FAVORITES_KEY, r#"["Feijoada"]"#).unwrap();
    kv.set(
      CART_KEY,
      r#"[{"name":"Suco de Caju","price":"R$ 8,00","category":"Bebidas","quantity":3}]"#,
    )
    .unwrap();
    kv.set(USER_KEY, r#"{"name":"Ana","address":"Mesa 2","phone":""}"#)
      .unwrap();

    let mut store = store_with(kv);
    assert!(store.is_loading());
    store.initialize(&FixedCatalog(Some(sections()))).await;

    assert!(!store.is_loading());
    assert_eq!(store.sections().len(), 2);
    assert_eq!(store.catalog_source(), Some(ResponseSource::Network));
    assert!(store.is_favorite("Feijoada"));
    assert_eq!(store.cart_item_count(), 3);
    assert!(store.user().is_identified());
  }

  #[tokio::test]
  async fn test_corrupt_cart_starts_empty() {
    let kv = MemoryKvStore::new();
    kv.set(CART_KEY, "[{\"name\": ").unwrap();
    kv.set(FAVORITES_KEY, r#"["Feijoada"]"#).unwrap();

    let mut store = store_with(kv);
    store.initialize(&FixedCatalog(Some(sections()))).await;

    assert!(store.cart_lines().is_empty());
    assert!(store.is_favorite("Feijoada"));
  }

  #[tokio::test]
  async fn test_saved_cart_duplicates_are_merged() {
    let kv = MemoryKvStore::new();
    kv.set(
      CART_KEY,
      r#"[{"name":"Feijoada","price":"R$ 35,00","category":"Pratos","quantity":2},
          {"name":"Feijoada","price":"R$ 35,00","category":"Pratos","quantity":3},
          {"name":"Suco de Caju","price":"R$ 8,00","category":"Bebidas","quantity":0}]"#,
    )
    .unwrap();

    let mut store = store_with(kv);
    store.initialize(&FixedCatalog(Some(sections()))).await;

    assert_eq!(store.cart_lines().len(), 1);
    assert_eq!(store.item_quantity("Feijoada"), 5);

    store.update_quantity("Feijoada", -2);
    assert_eq!(store.item_quantity("Feijoada"), 3);
    assert_eq!(store.cart_item_count(), 3);
  }

  #[tokio::test]
  async fn test_catalog_failure_leaves_empty_ready_store() {
    let kv = MemoryKvStore::new();
    kv.set(FAVORITES_KEY, r#"["Feijoada"]"#).unwrap();

    let mut store = store_with(kv);
    store.initialize(&FixedCatalog(None)).await;

    assert!(!store.is_loading());
    assert!(store.sections().is_empty());
    assert!(store.load_error().is_some());
    assert!(store.catalog_source().is_none());
    assert!(store.is_favorite("Feijoada"));
  }

  #[tokio::test]
  async fn test_reload_clears_previous_error() {
    let mut store = store_with(MemoryKvStore::new());
    store.initialize(&FixedCatalog(None)).await;
    store.reload_catalog(&FixedCatalog(Some(sections()))).await;

    assert!(store.load_error().is_none());
    assert_eq!(store.sections().len(), 2);
  }

  #[tokio::test]
  async fn test_cart_mutations_are_persisted() {
    let mut store = ready_store().await;
    let feijoada = item("Feijoada", "R$ 35,00");

    store.add_to_cart(&feijoada, "Pratos");
    store.add_to_cart(&feijoada, "Pratos");
    store.add_to_cart(&item("Suco de Caju", "R$ 8,00"), "Bebidas");

    assert_eq!(store.cart_lines().len(), 2);
    assert_eq!(store.item_quantity("Feijoada"), 2);
    assert_eq!(store.cart_total(), Decimal::new(7800, 2));

    let saved: Cart = kv::load_or_default(&store.kv, CART_KEY);
    assert_eq!(saved.item_count(), 3);

    store.update_quantity("Feijoada", -2);
    assert_eq!(store.item_quantity("Feijoada"), 0);
    assert_eq!(store.cart_item_count(), 1);

    store.remove_from_cart("Suco de Caju");
    let saved: Cart = kv::load_or_default(&store.kv, CART_KEY);
    assert!(saved.is_empty());
  }

  #[tokio::test]
  async fn test_toggle_favorite_persists() {
    let mut store = ready_store().await;

    assert!(store.toggle_favorite("Galinhada"));
    let saved: Vec<String> = kv::load_or_default(&store.kv, FAVORITES_KEY);
    assert_eq!(saved, vec!["Galinhada".to_string()]);

    assert!(!store.toggle_favorite("Galinhada"));
    assert!(!store.is_favorite("Galinhada"));
  }

  #[tokio::test]
  async fn test_filtered_sections_follow_state() {
    let mut store = ready_store().await;
    assert_eq!(store.filtered_sections(), sections());

    store.toggle_favorite("Galinhada");
    store.toggle_favorites_only();
    let result = store.filtered_sections();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].items.len(), 1);
    assert_eq!(result[0].items[0].name, "Galinhada");

    store.toggle_favorites_only();
    store.set_search_query("caju");
    assert_eq!(store.filtered_sections()[0].title, "Bebidas");

    store.set_search_query("");
    store.cycle_filter();
    assert_eq!(store.filter(), &SectionFilter::Only(SectionType::Food));
    assert_eq!(store.filtered_sections().len(), 1);

    store.set_filter(SectionFilter::Only(SectionType::Drinks));
    assert_eq!(store.filtered_sections()[0].title, "Bebidas");
    store.set_filter(SectionFilter::All);
    assert_eq!(store.filtered_sections().len(), 2);
  }

  #[tokio::test]
  async fn test_clear_cart_requires_confirmation() {
    let mut store = ready_store().await;
    store.add_to_cart(&item("Feijoada", "R$ 35,00"), "Pratos");

    assert!(!store.clear_cart(|_| false));
    assert_eq!(store.cart_item_count(), 1);

    let mut asked = String::new();
    assert!(store.clear_cart(|question| {
      asked = question.to_string();
      true
    }));
    assert_eq!(asked, CLEAR_CART_QUESTION);
    assert_eq!(store.cart_item_count(), 0);
    let saved: Cart = kv::load_or_default(&store.kv, CART_KEY);
    assert!(saved.is_empty());
  }

  #[tokio::test]
  async fn test_incomplete_profile_is_not_submitted() {
    let mut store = ready_store().await;
    store.add_to_cart(&item("Feijoada", "R$ 35,00"), "Pratos");

    let profile = UserProfile {
      name: "Ana".to_string(),
      address: String::new(),
      phone: None,
    };
    assert!(store.submit_user_profile(profile).is_none());
    assert_eq!(store.cart_item_count(), 1);
    assert_eq!(store.kv.get(USER_KEY).unwrap(), None);
  }

  #[tokio::test]
  async fn test_submit_profile_composes_and_empties_cart() {
    let mut store = ready_store().await;
    store.add_to_cart(&item("Feijoada", "R$ 35,00"), "Pratos");

    let profile = UserProfile {
      name: "Ana".to_string(),
      address: "Mesa 4".to_string(),
      phone: None,
    };
    let checkout = store.submit_user_profile(profile.clone()).unwrap();

    assert!(checkout.url.starts_with("https://wa.me/5583000000000?text="));
    assert!(checkout.message.contains("1x Feijoada"));
    assert!(checkout.message.contains("*TOTAL: R$ 35,00*"));
    assert_eq!(store.cart_item_count(), 0);
    assert_eq!(store.user(), &profile);

    let saved: UserProfile = kv::load_or_default(&store.kv, USER_KEY);
    assert_eq!(saved, profile);
  }
}
