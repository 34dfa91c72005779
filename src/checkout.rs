//! Order summary and the messaging deep link that hands the order off.

use color_eyre::{eyre::eyre, Result};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::process::{Command, Stdio};
use tracing::info;

use crate::config::Config;
use crate::menu::price::format_amount;
use crate::menu::types::display_name;
use crate::menu::{CartLine, UserProfile};

/// A composed order ready to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
  pub message: String,
  pub url: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutComposer {
  business_name: String,
  endpoint: String,
  recipient: String,
}

impl CheckoutComposer {
  pub fn new(business_name: &str, endpoint: &str, recipient: &str) -> Self {
    Self {
      business_name: business_name.to_string(),
      endpoint: endpoint.trim_end_matches('/').to_string(),
      recipient: recipient.to_string(),
    }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new(
      &config.business_name,
      &config.checkout.endpoint,
      &config.checkout.recipient,
    )
  }

  pub fn compose(&self, lines: &[CartLine], user: &UserProfile, total: Decimal) -> Checkout {
    let message = self.message(lines, user, total);
    let url = self.handoff_url(&message);
    Checkout { message, url }
  }

  /// The order summary, in the messaging app's bold markup.
  pub fn message(&self, lines: &[CartLine], user: &UserProfile, total: Decimal) -> String {
    let mut msg = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(msg, "*PEDIDO - {}*\n", self.business_name);
    let _ = writeln!(msg, "*Cliente:* {}", user.name.trim());
    let _ = writeln!(msg, "*Local:* {}", user.address.trim());
    if let Some(phone) = user.phone() {
      let _ = writeln!(msg, "*Telefone:* {}", phone);
    }
    msg.push_str("\n*ITENS:*\n");

    for line in lines {
      let _ = writeln!(msg, "\n{}x {}", line.quantity, display_name(&line.name));
      let _ = writeln!(msg, "   {} cada", line.price);
      let _ = writeln!(msg, "   Categoria: {}", line.category);
    }

    let _ = write!(msg, "\n*TOTAL: R$ {}*", format_amount(total));
    msg
  }

  pub fn handoff_url(&self, message: &str) -> String {
    format!(
      "{}/{}?text={}",
      self.endpoint,
      self.recipient,
      urlencoding::encode(message)
    )
  }
}

/// Open the handoff link with the configured or platform opener.
pub fn open_handoff(url: &str, opener: Option<&[String]>) -> Result<()> {
  let default_opener = if cfg!(target_os = "macos") {
    vec!["open".to_string()]
  } else {
    vec!["xdg-open".to_string()]
  };
  let opener = opener.unwrap_or(default_opener.as_slice());

  let (program, args) = opener
    .split_first()
    .ok_or_else(|| eyre!("checkout.opener must name a program"))?;

  Command::new(program)
    .args(args)
    .arg(url)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()
    .map_err(|e| eyre!("Failed to run {}: {}", program, e))?;

  info!(opener = %program, "order handed off");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn composer() -> CheckoutComposer {
    CheckoutComposer::new("Bistrô Recantinho da Serra", "https://wa.me/", "5583999999999")
  }

  fn lines() -> Vec<CartLine> {
    vec![
      CartLine {
        name: "Feijoada".to_string(),
        price: "R$ 35,00".to_string(),
        category: "Pratos".to_string(),
        quantity: 2,
      },
      CartLine {
        name: "Pudim<span class=\"badge\">novo</span>".to_string(),
        price: "R$ 9,50".to_string(),
        category: "Sobremesas".to_string(),
        quantity: 1,
      },
    ]
  }

  #[test]
  fn test_message_format() {
    let user = UserProfile {
      name: "Ana".to_string(),
      address: "Mesa 4".to_string(),
      phone: Some("83 99999-0000".to_string()),
    };

    let message = composer().message(&lines(), &user, Decimal::new(7950, 2));
    let expected = "*PEDIDO - Bistrô Recantinho da Serra*\n\n\
*Cliente:* Ana\n\
*Local:* Mesa 4\n\
*Telefone:* 83 99999-0000\n\
\n*ITENS:*\n\
\n2x Feijoada\n   R$ 35,00 cada\n   Categoria: Pratos\n\
\n1x Pudim\n   R$ 9,50 cada\n   Categoria: Sobremesas\n\
\n*TOTAL: R$ 79,50*";
    assert_eq!(message, expected);
  }

  #[test]
  fn test_message_without_phone() {
    let user = UserProfile {
      name: "Ana".to_string(),
      address: "Rua das Flores, 10".to_string(),
      phone: Some(String::new()),
    };
    let message = composer().message(&[], &user, Decimal::ZERO);
    assert!(!message.contains("Telefone"));
    assert!(message.ends_with("*TOTAL: R$ 0,00*"));
  }

  #[test]
  fn test_handoff_url_is_encoded() {
    let url = composer().handoff_url("*PEDIDO*\n1x Café & pão");
    assert_eq!(
      url,
      "https://wa.me/5583999999999?text=%2APEDIDO%2A%0A1x%20Caf%C3%A9%20%26%20p%C3%A3o"
    );
  }

  #[test]
  fn test_empty_opener_is_rejected() {
    let empty: Vec<String> = Vec::new();
    assert!(open_handoff("https://wa.me/1", Some(empty.as_slice())).is_err());
  }
}
