use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::menu::price::parse_price;
use crate::menu::{CartLine, MenuItem};

/// Cart lines in insertion order, at most one per item name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
  lines: Vec<CartLine>,
}

impl Cart {
  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Add one unit of `item`, merging with an existing line of the same name.
  pub fn add(&mut self, item: &MenuItem, category: &str) {
    if let Some(line) = self.lines.iter_mut().find(|l| l.name == item.name) {
      line.quantity = line.quantity.saturating_add(1);
      return;
    }

    self.lines.push(CartLine {
      name: item.name.clone(),
      price: item.price.clone(),
      category: category.to_string(),
      quantity: 1,
    });
  }

  /// Returns whether a line was removed.
  pub fn remove(&mut self, name: &str) -> bool {
    let before = self.lines.len();
    self.lines.retain(|l| l.name != name);
    self.lines.len() != before
  }

  /// Adjust a line's quantity; the line goes away when it reaches zero.
  /// Returns whether the cart changed.
  pub fn update_quantity(&mut self, name: &str, delta: i32) -> bool {
    let Some(line) = self.lines.iter_mut().find(|l| l.name == name) else {
      return false;
    };

    let quantity = i64::from(line.quantity) + i64::from(delta);
    if quantity <= 0 {
      self.remove(name)
    } else {
      line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
      true
    }
  }

  pub fn quantity_of(&self, name: &str) -> u32 {
    self
      .lines
      .iter()
      .find(|l| l.name == name)
      .map(|l| l.quantity)
      .unwrap_or(0)
  }

  pub fn item_count(&self) -> u32 {
    self
      .lines
      .iter()
      .map(|l| l.quantity)
      .fold(0u32, u32::saturating_add)
  }

  /// Σ price × quantity. Lines whose price does not parse count as zero;
  /// a total too large to represent saturates at `Decimal::MAX`.
  pub fn total(&self) -> Decimal {
    self.lines.iter().fold(Decimal::ZERO, |total, line| {
      let subtotal = line_subtotal(line).unwrap_or_else(|| {
        warn!(item = %line.name, quantity = line.quantity, "line subtotal overflowed");
        Decimal::MAX
      });
      total.checked_add(subtotal).unwrap_or_else(|| {
        warn!("cart total overflowed");
        Decimal::MAX
      })
    })
  }

  /// Restore the one-line-per-name invariant on a saved cart: duplicate
  /// names are merged into the first line and empty lines are dropped.
  pub(crate) fn normalized(self) -> Self {
    let mut lines: Vec<CartLine> = Vec::with_capacity(self.lines.len());
    for line in self.lines {
      match lines.iter_mut().find(|l| l.name == line.name) {
        Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
        None => lines.push(line),
      }
    }
    lines.retain(|l| l.quantity > 0);
    Self { lines }
  }

  pub fn clear(&mut self) {
    self.lines.clear();
  }
}

/// Price × quantity for one line, `None` when the product overflows.
/// An unparseable price counts as zero.
fn line_subtotal(line: &CartLine) -> Option<Decimal> {
  line_price(line).checked_mul(Decimal::from(line.quantity))
}

fn line_price(line: &CartLine) -> Decimal {
  parse_price(&line.price).unwrap_or_else(|| {
    warn!(item = %line.name, price = %line.price, "unparseable price, counting as zero");
    Decimal::ZERO
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(name: &str, price: &str) -> MenuItem {
    MenuItem {
      name: name.to_string(),
      price: price.to_string(),
      description: None,
      image: None,
    }
  }

  #[test]
  fn test_add_distinct_items() {
    let mut cart = Cart::default();
    cart.add(&item("Feijoada", "R$ 35,00"), "Pratos");
    cart.add(&item("Suco", "R$ 8,00"), "Bebidas");
    cart.add(&item("Suco", "R$ 8,00"), "Bebidas");

    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.quantity_of("Suco"), 2);
    assert_eq!(cart.lines()[1].category, "Bebidas");
  }

  #[test]
  fn test_update_quantity_to_zero_removes_line() {
    let mut cart = Cart::default();
    cart.add(&item("Feijoada", "R$ 35,00"), "Pratos");
    cart.add(&item("Feijoada", "R$ 35,00"), "Pratos");

    assert!(cart.update_quantity("Feijoada", -1));
    assert_eq!(cart.quantity_of("Feijoada"), 1);

    assert!(cart.update_quantity("Feijoada", -5));
    assert!(cart.is_empty());
    assert_eq!(cart.item_count(), 0);
  }

  #[test]
  fn test_update_unknown_is_noop() {
    let mut cart = Cart::default();
    assert!(!cart.update_quantity("Pastel", 1));
    assert!(cart.is_empty());
  }

  #[test]
  fn test_total_is_order_independent() {
    let mut a = Cart::default();
    a.add(&item("Feijoada", "R$ 35,90"), "Pratos");
    a.add(&item("Suco", "R$ 8,10"), "Bebidas");
    a.update_quantity("Suco", 2);

    let mut b = Cart::default();
    b.add(&item("Suco", "R$ 8,10"), "Bebidas");
    b.update_quantity("Suco", 2);
    b.add(&item("Feijoada", "R$ 35,90"), "Pratos");

    assert_eq!(a.total(), Decimal::new(6020, 2));
    assert_eq!(a.total(), b.total());
  }

  #[test]
  fn test_malformed_price_counts_as_zero() {
    let mut cart = Cart::default();
    cart.add(&item("Feijoada", "R$ 35,00"), "Pratos");
    cart.add(&item("Especial do dia", "Consulte"), "Pratos");

    assert_eq!(cart.total(), Decimal::new(3500, 2));
    assert_eq!(cart.item_count(), 2);
  }

  fn line(name: &str, price: &str, quantity: u32) -> CartLine {
    CartLine {
      name: name.to_string(),
      price: price.to_string(),
      category: "Pratos".to_string(),
      quantity,
    }
  }

  #[test]
  fn test_normalized_merges_duplicates_and_drops_empty_lines() {
    let saved = Cart {
      lines: vec![
        line("Feijoada", "R$ 35,00", 2),
        line("Suco", "R$ 8,00", 0),
        line("Feijoada", "R$ 35,00", 3),
      ],
    };

    let mut cart = saved.normalized();
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.quantity_of("Feijoada"), 5);

    assert!(cart.update_quantity("Feijoada", -2));
    assert_eq!(cart.quantity_of("Feijoada"), 3);
  }

  #[test]
  fn test_huge_price_saturates_total() {
    let mut cart = Cart::default();
    let caviar = item("Caviar", "R$ 79228162514264337593543950335");
    cart.add(&caviar, "Pratos");
    cart.add(&caviar, "Pratos");
    assert_eq!(cart.total(), Decimal::MAX);
    assert_eq!(line_subtotal(&cart.lines()[0]), None);

    cart.update_quantity("Caviar", -1);
    cart.add(&item("Pudim", "R$ 9,00"), "Sobremesas");
    assert_eq!(cart.total(), Decimal::MAX);
  }

  #[test]
  fn test_quantities_saturate() {
    let mut cart = Cart {
      lines: vec![line("A", "R$ 1,00", u32::MAX), line("B", "R$ 1,00", 1)],
    };
    assert_eq!(cart.item_count(), u32::MAX);

    cart.add(&item("A", "R$ 1,00"), "Pratos");
    assert_eq!(cart.quantity_of("A"), u32::MAX);
  }
}
