//! MiniPlayer: bottom strip shown while an episode is loaded.
//!
//! Row 1: state icon, cover, title · channel, pause and close buttons.
//! Row 2: progress bar with elapsed / total time.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    navigation::hit,
    playback::PlaybackState,
    widgets::progress_bar::draw_progress,
};

pub const MINI_PLAYER_HEIGHT: u16 = 2;

const BTN_TOGGLE_W: u16 = 5;
const BTN_CLOSE_W: u16 = 5;

pub struct MiniPlayer {
    toggle_area: Rect,
    close_area: Rect,
}

impl MiniPlayer {
    pub fn new() -> Self {
        Self {
            toggle_area: Rect::default(),
            close_area: Rect::default(),
        }
    }
}

fn state_icon(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "▶",
        PlaybackState::Paused => "⏸",
        PlaybackState::Completed => "✓",
        PlaybackState::Idle => " ",
    }
}

impl Component for MiniPlayer {
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        if hit(self.toggle_area, event.column, event.row) {
            vec![Action::TogglePause]
        } else if hit(self.close_area, event.column, event.row) {
            vec![Action::ClosePlayer]
        } else {
            vec![]
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        self.toggle_area = Rect::default();
        self.close_area = Rect::default();
        let Some(np) = state.playback.now_playing() else {
            return;
        };
        if area.height == 0 || area.width < BTN_TOGGLE_W + BTN_CLOSE_W + 4 {
            return;
        }
        let p = state.palette();
        let playback = state.playback.state();

        let row1 = Rect { height: 1, ..area };
        let title = vec![
            Span::styled(format!(" {} ", state_icon(playback)), p.style_playing()),
            Span::raw(format!("{} ", np.emoji)),
            Span::styled(
                np.title.clone(),
                Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" · {}", np.channel), p.style_secondary()),
        ];
        frame.render_widget(Paragraph::new(Line::from(title)), row1);

        let right = area.x + area.width;
        self.close_area = Rect::new(right - BTN_CLOSE_W, area.y, BTN_CLOSE_W, 1);
        self.toggle_area = Rect::new(right - BTN_CLOSE_W - BTN_TOGGLE_W, area.y, BTN_TOGGLE_W, 1);
        let toggle_label = if playback == PlaybackState::Playing { "[⏸]" } else { "[▶]" };
        frame.render_widget(
            Paragraph::new(Span::styled(toggle_label, Style::default().fg(p.tag))),
            self.toggle_area,
        );
        frame.render_widget(
            Paragraph::new(Span::styled("[✕]", Style::default().fg(p.accent))),
            self.close_area,
        );

        if area.height >= 2 {
            let row2 = Rect {
                x: area.x + 1,
                y: area.y + 1,
                width: area.width.saturating_sub(2),
                height: 1,
            };
            draw_progress(
                frame,
                row2,
                state.playback.progress() / 100.0,
                Some(np.elapsed_secs()),
                Some(f64::from(np.total_seconds)),
                &p,
            );
        }
    }
}
