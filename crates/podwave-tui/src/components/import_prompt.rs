//! ImportPrompt: one-line modal asking for the snapshot file path.

use std::path::PathBuf;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Borders, Clear},
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    widgets::filter_input::FilterInput,
};

use super::help_overlay::centered_rect;

pub struct ImportPrompt {
    pub visible: bool,
    path: FilterInput,
}

/// `~/x` → `$HOME/x`; everything else as typed.
pub fn expand_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|h| h.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None if raw == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}

impl ImportPrompt {
    pub fn new() -> Self {
        Self {
            visible: false,
            path: FilterInput::new("Path:", "~/podwave_export.json"),
        }
    }
}

impl Component for ImportPrompt {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Esc => vec![Action::CloseOverlay],
            KeyCode::Enter if self.path.text().trim().is_empty() => vec![],
            KeyCode::Enter => vec![
                Action::CloseOverlay,
                Action::Import(expand_path(self.path.text())),
            ],
            _ => {
                self.path.handle_key(key);
                vec![]
            }
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenImport => {
                self.visible = true;
                self.path.clear();
                self.path.activate();
            }
            Action::CloseOverlay => {
                self.visible = false;
                self.path.deactivate();
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }
        let p = state.palette();
        let popup = centered_rect(60, 3, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(p.style_border(true))
            .title(Span::styled(" import JSON ", p.style_default()))
            .style(Style::default().bg(p.bg));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        self.path.draw(frame, inner, &p);
    }
}
