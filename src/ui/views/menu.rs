use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::menu::{MenuItem, MenuSection};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::renderfns::{section_color, truncate};
use crate::ui::view::{ShortcutInfo, Store, View, ViewAction};
use crate::ui::views::{CartView, ItemDetailView};

/// A selectable item with the title of the section it is listed under
struct Entry {
  category: String,
  item: MenuItem,
}

fn entries(sections: &[MenuSection]) -> Vec<Entry> {
  sections
    .iter()
    .flat_map(|section| {
      section.items.iter().map(|item| Entry {
        category: section.title.clone(),
        item: item.clone(),
      })
    })
    .collect()
}

/// The menu: sections and their items, with search and filters
pub struct MenuView {
  /// Index into the visible entries, headings excluded
  selected: usize,
  list_state: ListState,
  search: SearchInput,
}

impl MenuView {
  pub fn new() -> Self {
    Self {
      selected: 0,
      list_state: ListState::default(),
      search: SearchInput::new(),
    }
  }

  fn move_selection(&mut self, delta: isize, len: usize) {
    if len == 0 {
      self.selected = 0;
      return;
    }
    self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect, store: &Store) {
    let sections = store.filtered_sections();
    let item_count: usize = sections.iter().map(|s| s.items.len()).sum();

    let block = Block::default()
      .title(format!(" Cardápio ({}) ", item_count))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if store.is_loading() {
      let paragraph = Paragraph::new("Carregando cardápio...")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    if sections.is_empty() {
      let (content, color) = match store.load_error() {
        Some(e) if store.sections().is_empty() => (
          format!(
            "Não foi possível carregar o cardápio.\n{}\n\nPressione r para tentar novamente.",
            e
          ),
          Color::Red,
        ),
        _ if store.favorites_only() => (
          "Nenhum favorito por aqui. Marque itens com s.".to_string(),
          Color::DarkGray,
        ),
        _ => ("Nenhum item encontrado.".to_string(), Color::DarkGray),
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      return;
    }

    self.move_selection(0, item_count);

    let mut rows = Vec::new();
    let mut selected_row = None;
    let mut entry_index = 0;

    for section in &sections {
      rows.push(ListItem::new(Line::from(Span::styled(
        format!("{} · {}", section.title, section.section_type),
        Style::default()
          .fg(section_color(&section.section_type))
          .bold(),
      ))));

      for item in &section.items {
        if entry_index == self.selected {
          selected_row = Some(rows.len());
        }
        rows.push(ListItem::new(item_line(item, store)));
        entry_index += 1;
      }
    }

    self.list_state.select(selected_row);

    let list = List::new(rows)
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

impl Default for MenuView {
  fn default() -> Self {
    Self::new()
  }
}

fn item_line(item: &MenuItem, store: &Store) -> Line<'static> {
  let star = if store.is_favorite(&item.name) {
    Span::styled("★ ", Style::default().fg(Color::Yellow))
  } else {
    Span::raw("  ")
  };

  let mut spans = vec![
    Span::raw("  "),
    star,
    Span::raw(format!("{:<40}", truncate(item.display_name(), 40))),
    Span::styled(format!("{:>10}", item.price), Style::default().fg(Color::Green)),
  ];

  let quantity = store.item_quantity(&item.name);
  if quantity > 0 {
    spans.push(Span::styled(
      format!("  [{} no carrinho]", quantity),
      Style::default().fg(Color::Cyan),
    ));
  }

  Line::from(spans)
}

impl View for MenuView {
  fn handle_key(&mut self, key: KeyEvent, store: &mut Store) -> ViewAction {
    // Let search component try to handle first
    match self.search.handle_key(key, store.search_query()) {
      KeyResult::Event(SearchEvent::Changed(query)) => {
        store.set_search_query(&query);
        self.selected = 0;
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    let visible = entries(&store.filtered_sections());
    let current = visible.get(self.selected);

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.move_selection(1, visible.len()),
      KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1, visible.len()),
      KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
      KeyCode::End | KeyCode::Char('G') => self.move_selection(isize::MAX, visible.len()),
      KeyCode::Enter => {
        if let Some(entry) = current {
          return ViewAction::Push(Box::new(ItemDetailView::new(
            entry.item.clone(),
            entry.category.clone(),
          )));
        }
      }
      KeyCode::Char('a') | KeyCode::Char('+') => {
        if let Some(entry) = current {
          store.add_to_cart(&entry.item, &entry.category);
          return ViewAction::Notify(format!(
            "{} adicionado ao carrinho",
            entry.item.display_name()
          ));
        }
      }
      KeyCode::Char('-') => {
        if let Some(entry) = current {
          store.update_quantity(&entry.item.name, -1);
        }
      }
      KeyCode::Char('s') => {
        if let Some(entry) = current {
          let message = if store.toggle_favorite(&entry.item.name) {
            "adicionado aos favoritos"
          } else {
            "removido dos favoritos"
          };
          return ViewAction::Notify(format!("{} {}", entry.item.display_name(), message));
        }
      }
      KeyCode::Char('f') => {
        store.cycle_filter();
        self.selected = 0;
      }
      KeyCode::Char('*') => {
        store.toggle_favorites_only();
        self.selected = 0;
      }
      KeyCode::Char('c') => return ViewAction::Push(Box::new(CartView::new())),
      KeyCode::Char('r') => return ViewAction::ReloadCatalog,
      KeyCode::Esc if !store.search_query().is_empty() => {
        store.set_search_query("");
        self.selected = 0;
      }
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, store: &Store) {
    self.render_list(frame, area, store);
    self.search.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Cardápio".to_string()
  }

  fn is_capturing_input(&self) -> bool {
    self.search.is_active()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("/", "buscar").with_priority(10),
      ShortcutInfo::new("a", "adicionar").with_priority(20),
      ShortcutInfo::new("s", "favorito").with_priority(30),
      ShortcutInfo::new("f", "tipo").with_priority(40),
      ShortcutInfo::new("*", "só favoritos").with_priority(50),
      ShortcutInfo::new("c", "carrinho").with_priority(60),
      ShortcutInfo::new("r", "recarregar").with_priority(70),
      ShortcutInfo::new("q", "sair").with_priority(90),
    ]
  }
}
