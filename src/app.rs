use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::checkout::{self, Checkout};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::menu::CatalogSource;
use crate::offline::GatewayState;
use crate::task::{Task, TaskState};
use crate::ui::renderfns::{draw_footer, draw_header};
use crate::ui::views::MenuView;
use crate::ui::{Store, View, ViewAction};

/// How long a status message stays in the footer
const STATUS_TTL: Duration = Duration::from_secs(4);

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Main application state
pub struct App<C: CatalogSource> {
  config: Config,

  /// Ordering state shared by all views
  store: Store,

  /// Where the menu comes from
  catalog: C,

  /// Offline cache install/activation running in the background
  gateway: Option<Task<GatewayState>>,

  /// Navigation stack - the menu is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Transient message for the footer
  status: Option<(String, Instant)>,

  should_quit: bool,
}

impl<C: CatalogSource> App<C> {
  pub fn new(config: Config, store: Store, catalog: C, gateway: Option<Task<GatewayState>>) -> Self {
    Self {
      config,
      store,
      catalog,
      gateway,
      view_stack: vec![Box::new(MenuView::new())],
      status: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.main_loop(&mut terminal).await;

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop(&mut self, terminal: &mut Tui) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));

    terminal.draw(|frame| self.draw(frame))?;
    self.store.initialize(&self.catalog).await;
    info!(
      sections = self.store.sections().len(),
      "menu ready"
    );

    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key, terminal).await?,
        Some(Event::Tick) => self.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    Ok(())
  }

  fn tick(&mut self) {
    if let Some(task) = &mut self.gateway {
      if task.poll() {
        match task.state() {
          TaskState::Done(state) => info!(?state, "offline cache ready"),
          TaskState::Failed(e) => error!(error = %e, "offline cache unavailable"),
          TaskState::Running => {}
        }
      }
    }

    if let Some((_, shown_at)) = &self.status {
      if shown_at.elapsed() > STATUS_TTL {
        self.status = None;
      }
    }
  }

  async fn handle_key(&mut self, key: KeyEvent, terminal: &mut Tui) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return Ok(());
    }

    if self.handle_global_key(key) {
      return Ok(());
    }

    let Some(view) = self.view_stack.last_mut() else {
      self.should_quit = true;
      return Ok(());
    };

    match view.handle_key(key, &mut self.store) {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        }
      }
      ViewAction::ReloadCatalog => {
        self.set_status("Recarregando cardápio...");
        terminal.draw(|frame| self.draw(frame))?;
        self.store.reload_catalog(&self.catalog).await;
        match self.store.load_error() {
          Some(_) => self.set_status("Não foi possível recarregar o cardápio"),
          None => self.set_status("Cardápio atualizado"),
        }
      }
      ViewAction::Handoff(checkout) => self.hand_off(&checkout),
      ViewAction::Notify(message) => self.set_status(&message),
    }

    Ok(())
  }

  /// Keys that work on every view unless it is taking text input.
  /// Returns whether the key was used.
  fn handle_global_key(&mut self, key: KeyEvent) -> bool {
    let capturing = self
      .view_stack
      .last()
      .is_some_and(|view| view.is_capturing_input());
    if capturing || key.code != KeyCode::Char('q') {
      return false;
    }

    if self.view_stack.len() > 1 {
      self.view_stack.pop();
    } else {
      self.should_quit = true;
    }
    true
  }

  fn hand_off(&mut self, order: &Checkout) {
    match checkout::open_handoff(&order.url, self.config.checkout.opener.as_deref()) {
      Ok(()) => {
        self.view_stack.truncate(1);
        self.set_status("Pedido enviado! Confirme o envio no WhatsApp.");
      }
      Err(e) => {
        error!(error = %e, url = %order.url, "could not open order link");
        self.view_stack.truncate(1);
        self.set_status(&format!("Abra este link para enviar o pedido: {}", order.url));
      }
    }
  }

  fn set_status(&mut self, message: &str) {
    self.status = Some((message.to_string(), Instant::now()));
  }

  fn offline_status(&self) -> (&'static str, Color) {
    match self.gateway.as_ref().map(Task::state) {
      None => ("sem cache offline", Color::DarkGray),
      Some(TaskState::Running) => ("preparando offline...", Color::Yellow),
      Some(TaskState::Done(GatewayState::Activated)) => ("disponível offline", Color::Green),
      Some(TaskState::Done(_)) => ("offline parcial", Color::Yellow),
      Some(TaskState::Failed(_)) => ("offline indisponível", Color::Red),
    }
  }

  fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Main content
        Constraint::Length(1), // Footer
      ])
      .split(frame.area());

    draw_header(
      frame,
      chunks[0],
      &self.config.business_name,
      &self.store,
      self.offline_status(),
    );

    if self.store.is_loading() {
      let loading = Paragraph::new(format!("\n{}\n\nCarregando...", self.config.business_name))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));
      frame.render_widget(loading, chunks[1]);
    } else if let Some(view) = self.view_stack.last_mut() {
      view.render(frame, chunks[1], &self.store);
    }

    let breadcrumb: Vec<String> = self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect();
    let shortcuts = self
      .view_stack
      .last()
      .map(|v| v.shortcuts())
      .unwrap_or_default();
    let status = self.status.as_ref().map(|(message, _)| message.as_str());

    draw_footer(frame, chunks[2], &breadcrumb, &shortcuts, status);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::menu::testing::{sample_sections, FixedCatalog};
  use crate::ui::views::testing::{key, test_store};
  use crate::ui::views::{CartView, UserFormView};

  async fn test_app() -> App<FixedCatalog> {
    App::new(
      Config::default(),
      test_store().await,
      FixedCatalog(Some(sample_sections())),
      None,
    )
  }

  #[tokio::test]
  async fn test_q_goes_back_then_quits() {
    let mut app = test_app().await;
    app.view_stack.push(Box::new(CartView::new()));

    assert!(app.handle_global_key(key(KeyCode::Char('q'))));
    assert_eq!(app.view_stack.len(), 1);
    assert!(!app.should_quit);

    assert!(app.handle_global_key(key(KeyCode::Char('q'))));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_q_is_typed_while_capturing_input() {
    let mut app = test_app().await;
    let form = UserFormView::new(app.store.user());
    app.view_stack.push(Box::new(form));

    assert!(!app.handle_global_key(key(KeyCode::Char('q'))));
    assert_eq!(app.view_stack.len(), 2);
    assert!(!app.should_quit);
  }

  #[tokio::test]
  async fn test_other_keys_reach_the_view() {
    let mut app = test_app().await;
    assert!(!app.handle_global_key(key(KeyCode::Char('j'))));
    assert!(!app.should_quit);
  }
}
