//! Parsing and formatting of Brazilian-real price strings ("R$ 12,50").

use rust_decimal::Decimal;
use std::str::FromStr;

const CURRENCY_SYMBOL: &str = "R$";

/// Parse a currency-formatted price.
///
/// Strips the currency symbol, drops '.' thousands separators when a decimal
/// comma is present, and converts the comma to a decimal point. Returns `None`
/// for anything that still is not a number.
pub fn parse_price(price: &str) -> Option<Decimal> {
  let cleaned = price.replace(CURRENCY_SYMBOL, "");
  let cleaned = cleaned.trim();

  let normalized = if cleaned.contains(',') {
    cleaned.replace('.', "").replacen(',', ".", 1)
  } else {
    cleaned.to_string()
  };

  Decimal::from_str(&normalized).ok()
}

/// Format as the order message does: "12,50" (two places, decimal comma).
pub fn format_amount(amount: Decimal) -> String {
  format!("{:.2}", amount.round_dp(2)).replace('.', ",")
}

/// Format with the currency symbol: "R$ 12,50".
pub fn format_price(amount: Decimal) -> String {
  format!("{} {}", CURRENCY_SYMBOL, format_amount(amount))
}
