use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::menu::price::format_price;
use crate::menu::UserProfile;
use crate::ui::components::{InputResult, TextInput};
use crate::ui::view::{ShortcutInfo, Store, View, ViewAction};

const LABELS: [&str; 3] = ["Nome", "Endereço ou mesa", "Telefone (opcional)"];

/// Who is ordering. Submitting saves the profile and hands the order off.
pub struct UserFormView {
  fields: [TextInput; 3],
  focus: usize,
  error: Option<String>,
}

impl UserFormView {
  /// Start from the saved profile
  pub fn new(user: &UserProfile) -> Self {
    Self {
      fields: [
        TextInput::with_value(&user.name),
        TextInput::with_value(&user.address),
        TextInput::with_value(user.phone().unwrap_or_default()),
      ],
      focus: 0,
      error: None,
    }
  }

  fn profile(&self) -> UserProfile {
    let phone = self.fields[2].value().trim();
    UserProfile {
      name: self.fields[0].value().trim().to_string(),
      address: self.fields[1].value().trim().to_string(),
      phone: (!phone.is_empty()).then(|| phone.to_string()),
    }
  }

  fn submit(&mut self, store: &mut Store) -> ViewAction {
    match store.submit_user_profile(self.profile()) {
      Some(checkout) => ViewAction::Handoff(checkout),
      None => {
        self.error = Some("Preencha nome e endereço para enviar o pedido.".to_string());
        self.focus = if self.fields[0].value().trim().is_empty() { 0 } else { 1 };
        ViewAction::None
      }
    }
  }

  fn render_field(&self, frame: &mut Frame, area: Rect, index: usize) {
    let focused = index == self.focus;
    let border = if focused { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border))
      .title(format!(" {} ", LABELS[index]));

    let inner = block.inner(area);
    let input = &self.fields[index];
    frame.render_widget(Paragraph::new(input.value()).block(block), area);

    if focused && inner.width > 0 {
      let offset = (input.cursor_position() as u16).min(inner.width - 1);
      frame.set_cursor_position((inner.x + offset, inner.y));
    }
  }
}

impl View for UserFormView {
  fn handle_key(&mut self, key: KeyEvent, store: &mut Store) -> ViewAction {
    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        self.focus = (self.focus + 1) % self.fields.len();
        return ViewAction::None;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        return ViewAction::None;
      }
      _ => {}
    }

    match self.fields[self.focus].handle_key(key) {
      InputResult::Submitted(_) => self.submit(store),
      InputResult::Cancelled => ViewAction::Pop,
      InputResult::Consumed => {
        self.error = None;
        ViewAction::None
      }
      InputResult::NotHandled => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, store: &Store) {
    let outer = Block::default()
      .title(" Seus dados ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1), // Summary
        Constraint::Length(1), // Error
        Constraint::Min(0),
      ])
      .split(inner);

    for index in 0..self.fields.len() {
      self.render_field(frame, chunks[index], index);
    }

    let summary = Line::from(vec![
      Span::styled(
        format!(" {} itens · ", store.cart_item_count()),
        Style::default().fg(Color::DarkGray),
      ),
      Span::styled(
        format_price(store.cart_total()),
        Style::default().fg(Color::Green).bold(),
      ),
      Span::styled(
        "   Enter envia o pedido pelo WhatsApp",
        Style::default().fg(Color::DarkGray),
      ),
    ]);
    frame.render_widget(Paragraph::new(summary), chunks[3]);

    if let Some(error) = &self.error {
      frame.render_widget(
        Paragraph::new(format!(" {}", error)).style(Style::default().fg(Color::Red)),
        chunks[4],
      );
    }
  }

  fn breadcrumb_label(&self) -> String {
    "Finalizar".to_string()
  }

  fn is_capturing_input(&self) -> bool {
    true
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("Tab", "próximo campo").with_priority(10),
      ShortcutInfo::new("Enter", "enviar").with_priority(20),
      ShortcutInfo::new("Esc", "voltar").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::menu::testing::item;
  use crate::ui::views::testing::{key, test_store};

  fn type_str(view: &mut UserFormView, store: &mut Store, s: &str) {
    for c in s.chars() {
      view.handle_key(key(KeyCode::Char(c)), store);
    }
  }

  #[tokio::test]
  async fn test_missing_address_is_rejected() {
    let mut store = test_store().await;
    store.add_to_cart(&item("Feijoada", "R$ 35,00"), "Pratos");
    let mut view = UserFormView::new(store.user());

    type_str(&mut view, &mut store, "Ana");
    let action = view.handle_key(key(KeyCode::Enter), &mut store);

    assert!(matches!(action, ViewAction::None));
    assert!(view.error.is_some());
    assert_eq!(view.focus, 1);
    assert_eq!(store.cart_item_count(), 1);
  }

  #[tokio::test]
  async fn test_submit_hands_off_order() {
    let mut store = test_store().await;
    store.add_to_cart(&item("Feijoada", "R$ 35,00"), "Pratos");
    let mut view = UserFormView::new(store.user());

    type_str(&mut view, &mut store, "Ana");
    view.handle_key(key(KeyCode::Tab), &mut store);
    type_str(&mut view, &mut store, "Mesa 4");

    match view.handle_key(key(KeyCode::Enter), &mut store) {
      ViewAction::Handoff(checkout) => {
        assert!(checkout.message.contains("*Cliente:* Ana"));
        assert!(!checkout.message.contains("Telefone"));
      }
      _ => panic!("expected handoff"),
    }
    assert_eq!(store.cart_item_count(), 0);
    assert_eq!(store.user().address, "Mesa 4");
  }

  #[tokio::test]
  async fn test_form_starts_from_saved_profile() {
    let mut store = test_store().await;
    store.submit_user_profile(UserProfile {
      name: "Ana".to_string(),
      address: "Mesa 4".to_string(),
      phone: Some("83 99999-0000".to_string()),
    });

    let view = UserFormView::new(store.user());
    assert_eq!(view.profile(), store.user().clone());
  }
}
