use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::checkout::Checkout;
use crate::kv::SqliteKvStore;
use crate::store::OrderStore;

/// The ordering state every view reads and mutates
pub type Store = OrderStore<SqliteKvStore>;

/// A keyboard shortcut hint for display in the footer
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
  /// Fetch the catalog again
  ReloadCatalog,
  /// Open the composed order in the messaging app
  Handoff(Checkout),
  /// Show a short message in the status line
  Notify(String),
}

/// Trait for view behavior
///
/// Views own their input modes (search, forms, prompts) and return actions
/// for the App to execute. State shared between views lives in the store,
/// which the App lends out on every call:
/// App → View → Components
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent, store: &mut Store) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect, store: &Store);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Whether the view is taking text input, so global keys must not fire
  fn is_capturing_input(&self) -> bool {
    false
  }

  /// Get keyboard shortcuts to display in the footer
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![ShortcutInfo::new("q", "voltar").with_priority(90)]
  }
}
