//! Status bar: bottom line with input mode and keybindings.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Screen;
use crate::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Typing into the explore search bar.
    Search,
    /// A modal form (registration or import path) owns the keyboard.
    Form,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
            Self::Form => "FORM",
        }
    }

    pub fn color(self, palette: &Palette) -> Color {
        match self {
            Self::Normal => palette.playing,
            Self::Search => palette.filter_fg,
            Self::Form => palette.tag,
        }
    }
}

fn key_hints(mode: InputMode, screen: Screen) -> &'static str {
    match mode {
        InputMode::Normal => match screen {
            Screen::Home => {
                " ↑↓/jk select  Enter/p play  f fav  o see more  Space pause  1-3/←→ screens  r register  t theme  ? help  q quit"
            }
            Screen::Explore => {
                " ↑↓/jk select  Enter/p play  f fav  m/M mood  / search  Space pause  1-3/←→ screens  ? help  q quit"
            }
            Screen::Library => {
                " ↑↓/jk select  Enter/p play  f fav  s seed  e export  i import  x end session  ? help  q quit"
            }
        },
        InputMode::Search => " type to search  Enter keep  Esc clear+close  Tab next screen",
        InputMode::Form => " type  Tab next field  Enter submit  Esc cancel",
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, screen: Screen, palette: &Palette) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default()
                .fg(mode.color(palette))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(key_hints(mode, screen), palette.style_muted()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect, palette: &Palette) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(palette.separator),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
