//! Header component: 2-row top bar.
//!
//! Row 1: brand, session status dot, session label, theme icon.
//! Row 2: screen tabs with count badges. Tabs are clickable.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::{Action, Screen},
    app_state::AppState,
    component::Component,
    navigation::hit,
};

pub struct Header {
    /// Tab rects from the last draw, in `Screen::ORDER`.
    tab_areas: [Rect; 3],
}

impl Header {
    pub fn new() -> Self {
        Self {
            tab_areas: [Rect::default(); 3],
        }
    }

    pub fn tab_at(&self, col: u16, row: u16) -> Option<Screen> {
        self.tab_areas
            .iter()
            .position(|r| hit(*r, col, row))
            .and_then(Screen::from_index)
    }
}

/// Tab text, e.g. `" 2 Explore (12) "`. Badges are hidden at zero.
pub fn tab_label(screen: Screen, state: &AppState) -> String {
    let badge = match screen {
        Screen::Home => None,
        Screen::Explore => state.explore_badge(),
        Screen::Library => state.library_badge(),
    };
    match badge {
        Some(n) => format!(" {} {} ({}) ", screen.index() + 1, screen.label(), n),
        None => format!(" {} {} ", screen.index() + 1, screen.label()),
    }
}

/// Lay the tabs out left to right from `origin`, one column apart.
fn tab_rects(origin: Rect, labels: &[String; 3]) -> [Rect; 3] {
    let mut out = [Rect::default(); 3];
    let mut x = origin.x + 1;
    let right = origin.x + origin.width;
    for (slot, label) in out.iter_mut().zip(labels) {
        let w = (label.width() as u16).min(right.saturating_sub(x));
        *slot = Rect::new(x, origin.y, w, 1);
        x = x.saturating_add(w + 1);
    }
    out
}

impl Component for Header {
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        match self.tab_at(event.column, event.row) {
            Some(screen) => vec![Action::SwitchScreen(screen)],
            None => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let p = state.palette();
        if area.height == 0 {
            return;
        }

        // ── Row 1: brand · status · label · theme ────────────────────────────
        let (dot, dot_style) = if state.session.is_some() {
            ("●", p.style_playing())
        } else {
            ("○", p.style_muted())
        };
        let label = state.session_label();
        let label_style = if state.playback.is_active() {
            p.style_playing()
        } else {
            p.style_secondary()
        };
        let left = vec![
            Span::styled(
                " 🎧 PodWave ",
                Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(dot, dot_style),
            Span::raw(" "),
            Span::styled(label, label_style),
        ];
        let row1 = Rect { height: 1, ..area };
        frame.render_widget(Paragraph::new(Line::from(left)), row1);
        frame.render_widget(
            Paragraph::new(Line::from(Span::raw(format!("{} ", state.theme.icon()))).right_aligned()),
            row1,
        );

        if area.height < 2 {
            self.tab_areas = [Rect::default(); 3];
            return;
        }

        // ── Row 2: tabs ──────────────────────────────────────────────────────
        let row2 = Rect {
            y: area.y + 1,
            height: 1,
            ..area
        };
        let labels = Screen::ORDER.map(|s| tab_label(s, state));
        self.tab_areas = tab_rects(row2, &labels);

        let mut spans = vec![Span::raw(" ")];
        for (screen, label) in Screen::ORDER.iter().zip(labels) {
            let style = if *screen == state.active_screen {
                Style::default()
                    .fg(p.bg)
                    .bg(p.border_focused)
                    .add_modifier(Modifier::BOLD)
            } else {
                p.style_secondary()
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), row2);
    }
}
