use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use rust_decimal::Decimal;

use crate::menu::price::{format_price, parse_price};
use crate::menu::types::display_name;
use crate::menu::CartLine;
use crate::store::CLEAR_CART_QUESTION;
use crate::ui::components::{ConfirmPrompt, KeyResult};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{ShortcutInfo, Store, View, ViewAction};
use crate::ui::views::UserFormView;

/// Cart contents with quantity controls
pub struct CartView {
  list_state: ListState,
  confirm: ConfirmPrompt,
}

impl CartView {
  pub fn new() -> Self {
    Self {
      list_state: ListState::default(),
      confirm: ConfirmPrompt::new(),
    }
  }

  fn selected_name(&self, store: &Store) -> Option<String> {
    let index = self.list_state.selected()?;
    store.cart_lines().get(index).map(|line| line.name.clone())
  }

  fn render_lines(&mut self, frame: &mut Frame, area: Rect, store: &Store) {
    let lines = store.cart_lines();
    ensure_valid_selection(&mut self.list_state, lines.len());

    let block = Block::default()
      .title(format!(" Carrinho ({}) ", store.cart_item_count()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if lines.is_empty() {
      let paragraph = Paragraph::new("Seu carrinho está vazio.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = lines.iter().map(|line| ListItem::new(cart_row(line))).collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl Default for CartView {
  fn default() -> Self {
    Self::new()
  }
}

fn cart_row(line: &CartLine) -> Line<'static> {
  let subtotal = parse_price(&line.price)
    .and_then(|price| price.checked_mul(Decimal::from(line.quantity)))
    .map(format_price)
    .unwrap_or_else(|| "?".to_string());

  Line::from(vec![
    Span::styled(format!("{:>3}x ", line.quantity), Style::default().fg(Color::Cyan)),
    Span::raw(format!("{:<32}", truncate(display_name(&line.name), 32))),
    Span::styled(
      format!("{:>10} cada", line.price),
      Style::default().fg(Color::DarkGray),
    ),
    Span::styled(format!("{:>14}", subtotal), Style::default().fg(Color::Green)),
    Span::styled(
      format!("  {}", line.category),
      Style::default().fg(Color::DarkGray),
    ),
  ])
}

impl View for CartView {
  fn handle_key(&mut self, key: KeyEvent, store: &mut Store) -> ViewAction {
    let answered = self
      .confirm
      .handle_key(key)
      .map(|answer| store.clear_cart(|_| answer));
    match answered {
      KeyResult::Event(true) => return ViewAction::Notify("Carrinho limpo".to_string()),
      KeyResult::Event(false) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    let len = store.cart_lines().len();
    ensure_valid_selection(&mut self.list_state, len);

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('+') | KeyCode::Char('a') => {
        if let Some(name) = self.selected_name(store) {
          store.update_quantity(&name, 1);
        }
      }
      KeyCode::Char('-') => {
        if let Some(name) = self.selected_name(store) {
          store.update_quantity(&name, -1);
        }
      }
      KeyCode::Char('d') | KeyCode::Delete => {
        if let Some(name) = self.selected_name(store) {
          store.remove_from_cart(&name);
        }
      }
      KeyCode::Char('x') => {
        if len > 0 {
          self.confirm.ask(CLEAR_CART_QUESTION);
        }
      }
      KeyCode::Enter => {
        if len == 0 {
          return ViewAction::Notify("Seu carrinho está vazio".to_string());
        }
        return ViewAction::Push(Box::new(UserFormView::new(store.user())));
      }
      KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, store: &Store) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Min(3), Constraint::Length(1)])
      .split(area);

    self.render_lines(frame, chunks[0], store);

    let total = Line::from(vec![
      Span::styled(" Total: ", Style::default().fg(Color::DarkGray)),
      Span::styled(
        format_price(store.cart_total()),
        Style::default().fg(Color::Green).bold(),
      ),
    ]);
    frame.render_widget(Paragraph::new(total), chunks[1]);

    self.confirm.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Carrinho".to_string()
  }

  fn is_capturing_input(&self) -> bool {
    self.confirm.is_active()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("+/-", "quantidade").with_priority(10),
      ShortcutInfo::new("d", "remover").with_priority(20),
      ShortcutInfo::new("x", "limpar").with_priority(30),
      ShortcutInfo::new("Enter", "finalizar").with_priority(40),
      ShortcutInfo::new("q", "voltar").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::menu::testing::item;
  use crate::ui::views::testing::{key, test_store};

  async fn store_with_cart() -> Store {
    let mut store = test_store().await;
    store.add_to_cart(&item("Feijoada", "R$ 35,00"), "Pratos");
    store.add_to_cart(&item("Suco de Caju", "R$ 8,00"), "Bebidas");
    store
  }

  #[tokio::test]
  async fn test_quantity_controls_act_on_selection() {
    let mut store = store_with_cart().await;
    let mut view = CartView::new();

    view.handle_key(key(KeyCode::Char('+')), &mut store);
    assert_eq!(store.item_quantity("Feijoada"), 2);

    view.handle_key(key(KeyCode::Char('j')), &mut store);
    view.handle_key(key(KeyCode::Char('d')), &mut store);
    assert_eq!(store.item_quantity("Suco de Caju"), 0);
    assert_eq!(store.cart_lines().len(), 1);
  }

  #[tokio::test]
  async fn test_clear_cart_asks_first() {
    let mut store = store_with_cart().await;
    let mut view = CartView::new();

    view.handle_key(key(KeyCode::Char('x')), &mut store);
    assert!(view.is_capturing_input());

    view.handle_key(key(KeyCode::Char('n')), &mut store);
    assert_eq!(store.cart_lines().len(), 2);

    view.handle_key(key(KeyCode::Char('x')), &mut store);
    let action = view.handle_key(key(KeyCode::Char('s')), &mut store);
    assert!(matches!(action, ViewAction::Notify(_)));
    assert!(store.cart_lines().is_empty());
  }

  #[tokio::test]
  async fn test_checkout_needs_items() {
    let mut store = test_store().await;
    let mut view = CartView::new();
    assert!(matches!(
      view.handle_key(key(KeyCode::Enter), &mut store),
      ViewAction::Notify(_)
    ));

    store.add_to_cart(&item("Feijoada", "R$ 35,00"), "Pratos");
    assert!(matches!(
      view.handle_key(key(KeyCode::Enter), &mut store),
      ViewAction::Push(_)
    ));
  }

  #[test]
  fn test_row_subtotal_overflow_shows_placeholder() {
    let line = CartLine {
      name: "Caviar".to_string(),
      price: "R$ 79228162514264337593543950335".to_string(),
      category: "Pratos".to_string(),
      quantity: 2,
    };
    let text: String = cart_row(&line)
      .spans
      .iter()
      .map(|span| span.content.as_ref())
      .collect();
    assert!(text.contains("   ?"));
  }
}
