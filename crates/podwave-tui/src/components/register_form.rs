//! RegisterForm: modal with name and ID fields.
//!
//! Tab / ↑↓ switch field, Enter on the last field submits, Esc cancels.
//! Validation happens in the App, so an empty submit still reaches it.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    widgets::filter_input::FilterInput,
};

use super::help_overlay::centered_rect;

pub struct RegisterForm {
    pub visible: bool,
    name: FilterInput,
    dni: FilterInput,
    /// 0 = name, 1 = dni.
    field: usize,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self {
            visible: false,
            name: FilterInput::new("Name:", "your name"),
            dni: FilterInput::new("ID:  ", "national ID"),
            field: 0,
        }
    }

    fn open(&mut self) {
        self.visible = true;
        self.name.clear();
        self.dni.clear();
        self.focus(0);
    }

    fn focus(&mut self, field: usize) {
        self.field = field;
        if field == 0 {
            self.name.activate();
            self.dni.deactivate();
        } else {
            self.dni.activate();
            self.name.deactivate();
        }
    }

    fn submit(&self) -> Action {
        Action::SubmitRegistration {
            name: self.name.text().to_string(),
            dni: self.dni.text().to_string(),
        }
    }
}

impl Component for RegisterForm {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Esc => vec![Action::CloseOverlay],
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus(1 - self.field);
                vec![]
            }
            KeyCode::Enter if self.field == 0 => {
                self.focus(1);
                vec![]
            }
            KeyCode::Enter => vec![self.submit()],
            _ => {
                let input = if self.field == 0 { &mut self.name } else { &mut self.dni };
                input.handle_key(key);
                vec![]
            }
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenRegister => self.open(),
            Action::CloseOverlay => self.visible = false,
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }
        let p = state.palette();
        let popup = centered_rect(50, 7, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(p.style_border(true))
            .title(Span::styled(" register ", p.style_default()))
            .style(Style::default().bg(p.bg));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        if inner.height < 4 {
            return;
        }

        let row = |dy: u16| Rect {
            x: inner.x + 1,
            y: inner.y + dy,
            width: inner.width.saturating_sub(2),
            height: 1,
        };
        self.name.draw(frame, row(0), &p);
        self.dni.draw(frame, row(2), &p);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Enter submit · Tab switch · Esc cancel",
                p.style_muted(),
            ))),
            row(4.min(inner.height - 1)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use ratatui::crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_moves_then_submits() {
        let (tx, _rx) = mpsc::channel(1);
        let s = AppState::new(Vec::new(), Theme::Dark, tx);
        let mut f = RegisterForm::new();
        f.on_action(&Action::OpenRegister, &s);
        for c in "Ana".chars() {
            f.handle_key(key(KeyCode::Char(c)), &s);
        }
        assert!(f.handle_key(key(KeyCode::Enter), &s).is_empty());
        for c in "12X".chars() {
            f.handle_key(key(KeyCode::Char(c)), &s);
        }
        assert_eq!(
            f.handle_key(key(KeyCode::Enter), &s),
            vec![Action::SubmitRegistration {
                name: "Ana".into(),
                dni: "12X".into()
            }]
        );
        assert_eq!(f.handle_key(key(KeyCode::Esc), &s), vec![Action::CloseOverlay]);
    }
}
