use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Yes/no question shown over the current view
#[derive(Debug, Clone, Default)]
pub struct ConfirmPrompt {
  question: Option<String>,
}

impl ConfirmPrompt {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.question.is_some()
  }

  pub fn ask(&mut self, question: &str) {
    self.question = Some(question.to_string());
  }

  /// While active, every key is consumed. `s`/`y`/Enter answer yes,
  /// `n`/Esc answer no.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<bool> {
    if !self.is_active() {
      return KeyResult::NotHandled;
    }

    let answer = match key.code {
      KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('y') | KeyCode::Enter => true,
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
      _ => return KeyResult::Handled,
    };

    self.question = None;
    KeyResult::Event(answer)
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let Some(question) = &self.question else {
      return;
    };

    let width = 44.min(area.width);
    let height = 5.min(area.height);
    let overlay_area = Rect::new(
      area.x + (area.width - width) / 2,
      area.y + (area.height - height) / 2,
      width,
      height,
    );

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red))
      .title(" Confirmar ");

    let text = vec![
      Line::from(question.as_str()),
      Line::from(vec![
        Span::styled("<s>", Style::default().fg(Color::Cyan)),
        Span::styled(" sim   ", Style::default().fg(Color::DarkGray)),
        Span::styled("<n>", Style::default().fg(Color::Cyan)),
        Span::styled(" não", Style::default().fg(Color::DarkGray)),
      ]),
    ];

    let paragraph = Paragraph::new(text)
      .block(block)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, overlay_area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_inactive_prompt_ignores_keys() {
    let mut prompt = ConfirmPrompt::new();
    assert_eq!(prompt.handle_key(key(KeyCode::Char('s'))), KeyResult::NotHandled);
  }

  #[test]
  fn test_answers() {
    let mut prompt = ConfirmPrompt::new();
    prompt.ask("Limpar?");
    assert_eq!(prompt.handle_key(key(KeyCode::Char('x'))), KeyResult::Handled);
    assert!(prompt.is_active());
    assert_eq!(prompt.handle_key(key(KeyCode::Char('s'))), KeyResult::Event(true));
    assert!(!prompt.is_active());

    prompt.ask("Limpar?");
    assert_eq!(prompt.handle_key(key(KeyCode::Esc)), KeyResult::Event(false));
  }
}
