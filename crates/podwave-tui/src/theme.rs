//! Color palettes for the dark and light themes.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "🌙",
            Self::Light => "☀️",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette::DARK,
            Self::Light => Palette::LIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub primary: Color,
    pub secondary: Color,
    pub muted: Color,
    pub accent: Color,
    pub playing: Color,
    pub separator: Color,
    pub border: Color,
    pub border_focused: Color,
    pub selection_bg: Color,
    pub filter_bg: Color,
    pub filter_fg: Color,
    pub tag: Color,
    pub gold: Color,
    pub silver: Color,
    pub bronze: Color,
    pub toast_info: Color,
    pub toast_success: Color,
    pub toast_warning: Color,
    pub toast_error: Color,
}

impl Palette {
    pub const DARK: Palette = Palette {
        bg: Color::Rgb(18, 18, 18),
        primary: Color::Rgb(210, 210, 225),
        secondary: Color::Rgb(115, 115, 138),
        muted: Color::Rgb(72, 72, 88),
        accent: Color::Rgb(255, 95, 95),
        playing: Color::Rgb(80, 200, 120),
        separator: Color::Rgb(40, 40, 52),
        border: Color::Rgb(40, 40, 52),
        border_focused: Color::Rgb(120, 100, 200),
        selection_bg: Color::Rgb(28, 28, 40),
        filter_bg: Color::Rgb(20, 20, 32),
        filter_fg: Color::Rgb(255, 200, 80),
        tag: Color::Rgb(80, 140, 200),
        gold: Color::Rgb(255, 210, 50),
        silver: Color::Rgb(190, 190, 205),
        bronze: Color::Rgb(205, 127, 50),
        toast_info: Color::Rgb(80, 160, 220),
        toast_success: Color::Rgb(80, 200, 120),
        toast_warning: Color::Rgb(255, 184, 80),
        toast_error: Color::Rgb(255, 95, 95),
    };

    pub const LIGHT: Palette = Palette {
        bg: Color::Rgb(246, 246, 250),
        primary: Color::Rgb(28, 28, 40),
        secondary: Color::Rgb(84, 84, 110),
        muted: Color::Rgb(150, 150, 168),
        accent: Color::Rgb(200, 48, 64),
        playing: Color::Rgb(24, 140, 72),
        separator: Color::Rgb(214, 214, 226),
        border: Color::Rgb(200, 200, 214),
        border_focused: Color::Rgb(96, 72, 190),
        selection_bg: Color::Rgb(226, 224, 244),
        filter_bg: Color::Rgb(236, 236, 244),
        filter_fg: Color::Rgb(150, 96, 0),
        tag: Color::Rgb(30, 100, 170),
        gold: Color::Rgb(184, 134, 11),
        silver: Color::Rgb(112, 112, 128),
        bronze: Color::Rgb(160, 82, 45),
        toast_info: Color::Rgb(30, 110, 190),
        toast_success: Color::Rgb(24, 140, 72),
        toast_warning: Color::Rgb(190, 110, 0),
        toast_error: Color::Rgb(200, 48, 64),
    };

    // ── Predefined styles ─────────────────────────────────────────────────────

    pub fn style_default(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn style_secondary(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn style_muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn style_playing(&self) -> Style {
        Style::default().fg(self.playing)
    }

    pub fn style_selected(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn style_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }
}
