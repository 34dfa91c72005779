use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::menu::MenuItem;
use crate::ui::view::{ShortcutInfo, Store, View, ViewAction};
use crate::ui::views::CartView;

/// Full description of one item
pub struct ItemDetailView {
  item: MenuItem,
  category: String,
}

impl ItemDetailView {
  pub fn new(item: MenuItem, category: String) -> Self {
    Self { item, category }
  }
}

impl View for ItemDetailView {
  fn handle_key(&mut self, key: KeyEvent, store: &mut Store) -> ViewAction {
    match key.code {
      KeyCode::Char('a') | KeyCode::Char('+') => {
        store.add_to_cart(&self.item, &self.category);
        return ViewAction::Notify(format!(
          "{} adicionado ao carrinho",
          self.item.display_name()
        ));
      }
      KeyCode::Char('-') => store.update_quantity(&self.item.name, -1),
      KeyCode::Char('s') => {
        store.toggle_favorite(&self.item.name);
      }
      KeyCode::Char('c') => return ViewAction::Push(Box::new(CartView::new())),
      KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, store: &Store) {
    let block = Block::default()
      .title(format!(" {} ", self.item.display_name()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));

    let mut lines = vec![
      Line::from(vec![
        label("Preço: "),
        Span::styled(self.item.price.clone(), Style::default().fg(Color::Green).bold()),
      ]),
      Line::from(vec![label("Seção: "), Span::raw(self.category.clone())]),
    ];

    if store.is_favorite(&self.item.name) {
      lines.push(Line::from(Span::styled(
        "★ Favorito",
        Style::default().fg(Color::Yellow),
      )));
    }

    let quantity = store.item_quantity(&self.item.name);
    if quantity > 0 {
      lines.push(Line::from(vec![
        label("No carrinho: "),
        Span::styled(quantity.to_string(), Style::default().fg(Color::Cyan)),
      ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(
      self
        .item
        .description
        .clone()
        .unwrap_or_else(|| "Sem descrição.".to_string()),
    ));

    if let Some(image) = &self.item.image {
      lines.push(Line::default());
      lines.push(Line::from(vec![label("Foto: "), Span::raw(image.clone())]));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.item.display_name().to_string()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("a", "adicionar").with_priority(10),
      ShortcutInfo::new("-", "tirar um").with_priority(20),
      ShortcutInfo::new("s", "favorito").with_priority(30),
      ShortcutInfo::new("c", "carrinho").with_priority(40),
      ShortcutInfo::new("q", "voltar").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::menu::testing::item;
  use crate::ui::views::testing::{key, test_store};

  #[tokio::test]
  async fn test_detail_actions() {
    let mut store = test_store().await;
    let mut view = ItemDetailView::new(item("Feijoada", "R$ 35,00"), "Pratos".to_string());

    view.handle_key(key(KeyCode::Char('a')), &mut store);
    view.handle_key(key(KeyCode::Char('+')), &mut store);
    view.handle_key(key(KeyCode::Char('-')), &mut store);
    assert_eq!(store.item_quantity("Feijoada"), 1);

    view.handle_key(key(KeyCode::Char('s')), &mut store);
    assert!(store.is_favorite("Feijoada"));

    assert!(matches!(
      view.handle_key(key(KeyCode::Esc), &mut store),
      ViewAction::Pop
    ));
  }
}
