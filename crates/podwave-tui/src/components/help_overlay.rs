//! HelpOverlay component: centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::Palette,
};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

impl Component for HelpOverlay {
    /// Any key closes the overlay.
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        vec![Action::ToggleHelp]
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::ToggleHelp => self.toggle(),
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
        let popup = centered_rect(64, 30, area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                title,
                p.style_muted().add_modifier(Modifier::BOLD),
            ))
        };
        let help_lines: Vec<Line> = vec![
            Line::from(Span::styled(
                " keyboard shortcuts",
                Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            section(" screens"),
            help_row("1 / 2 / 3", "home / explore / library", &p),
            help_row("← / →  or  h / l", "previous / next screen", &p),
            help_row("tab", "next screen", &p),
            help_row("mouse drag ←/→", "swipe to next / previous screen", &p),
            Line::from(""),
            section(" episodes"),
            help_row("↑ / ↓  or  j / k", "move selection", &p),
            help_row("enter  or  p", "play selected episode", &p),
            help_row("f", "toggle favorite", &p),
            help_row("o", "see more (home cards)", &p),
            help_row("m / M", "next / previous mood chip", &p),
            help_row("/", "search (Esc clears + closes)", &p),
            help_row("space", "pause / resume", &p),
            help_row("esc", "close player", &p),
            Line::from(""),
            section(" session & data"),
            help_row("r", "register and start a session", &p),
            help_row("x", "end session", &p),
            help_row("s / e / i", "seed demo users / export / import", &p),
            help_row("t", "toggle dark / light theme", &p),
            help_row("K", "toggle keys bar", &p),
            help_row("?", "toggle this help overlay", &p),
            help_row("q / Ctrl+C", "quit", &p),
            Line::from(""),
            Line::from(Span::styled(" press any key to close", p.style_muted())),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(p.style_border(true))
                        .style(Style::default().bg(p.bg)),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn help_row<'a>(key: &'a str, desc: &'a str, p: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<18}", key),
            Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, p.style_secondary()),
    ])
}

pub fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(r.height)),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
