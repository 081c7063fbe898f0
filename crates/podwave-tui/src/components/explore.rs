//! Explore screen: mood chips, search bar and the episode table.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::{Action, Screen},
    app_state::AppState,
    component::Component,
    navigation::hit,
    render::{self, favorite_icon, EpisodeRow, Listing},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

use super::{draw_empty, handle_list_nav};

/// Columns of the favorite marker, clickable to toggle.
const FAV_COL_W: u16 = 3;

pub struct ExploreScreen {
    rows: ScrollableList<EpisodeRow>,
    pub search: FilterInput,
    chip_areas: Vec<(Rect, Option<String>)>,
    /// Table body, below the header row.
    body_area: Rect,
}

/// `All` followed by the configured moods.
pub fn chips(state: &AppState) -> Vec<Option<String>> {
    std::iter::once(None)
        .chain(state.moods.iter().cloned().map(Some))
        .collect()
}

/// The chip after (or before) the active one, wrapping around.
pub fn cycle_mood(state: &AppState, forward: bool) -> Option<String> {
    let all = chips(state);
    let cur = all
        .iter()
        .position(|c| *c == state.filters.mood)
        .unwrap_or(0);
    let n = all.len();
    let next = if forward { (cur + 1) % n } else { (cur + n - 1) % n };
    all[next].clone()
}

impl ExploreScreen {
    pub fn new() -> Self {
        Self {
            rows: ScrollableList::new(),
            search: FilterInput::new("/", "search title, channel or mood…"),
            chip_areas: Vec::new(),
            body_area: Rect::default(),
        }
    }

    pub fn search_active(&self) -> bool {
        self.search.is_active()
    }

    fn sync(&mut self, state: &AppState) -> Listing<EpisodeRow> {
        let listing = render::episode_rows(&state.episodes, &state.favorites);
        self.rows.set_items(listing.items().to_vec());
        listing
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Tab {
            self.search.deactivate();
            return vec![Action::NextScreen];
        }
        match self.search.handle_key(key) {
            FilterAction::Changed(text) => vec![Action::SearchInput(text)],
            FilterAction::Confirmed | FilterAction::Cancelled | FilterAction::None => vec![],
        }
    }

    fn draw_chips(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let p = state.palette();
        self.chip_areas.clear();
        let mut spans = vec![Span::raw(" ")];
        let mut x = area.x + 1;
        for chip in chips(state) {
            let label = format!(" {} ", chip.as_deref().unwrap_or("All"));
            let w = label.width() as u16;
            let active = chip == state.filters.mood;
            let style = if active {
                Style::default()
                    .fg(p.bg)
                    .bg(p.tag)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(p.tag)
            };
            self.chip_areas.push((Rect::new(x, area.y, w, 1), chip));
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
            x += w + 1;
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for ExploreScreen {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if self.search.is_active() {
            return self.handle_search_key(key);
        }
        self.sync(state);
        if handle_list_nav(key, &mut self.rows) {
            return vec![];
        }
        match key.code {
            KeyCode::Char('/') => {
                self.search.activate();
                vec![]
            }
            KeyCode::Char('m') => vec![Action::SelectMood(cycle_mood(state, true))],
            KeyCode::Char('M') => vec![Action::SelectMood(cycle_mood(state, false))],
            KeyCode::Enter | KeyCode::Char('p') => self
                .rows
                .selected_item()
                .map(|r| vec![Action::Play(r.episode_id)])
                .unwrap_or_default(),
            KeyCode::Char('f') => self
                .rows
                .selected_item()
                .map(|r| vec![Action::ToggleFavorite(r.episode_id)])
                .unwrap_or_default(),
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        let (col, row) = (event.column, event.row);
        if let Some((_, chip)) = self.chip_areas.iter().find(|(r, _)| hit(*r, col, row)) {
            return vec![Action::SelectMood(chip.clone())];
        }
        if !hit(self.body_area, col, row) {
            return vec![];
        }
        self.sync(state);
        let before = self.rows.selected;
        if !self.rows.handle_click((row - self.body_area.y) as usize) {
            return vec![];
        }
        let Some(r) = self.rows.selected_item() else {
            return vec![];
        };
        if col < self.body_area.x + FAV_COL_W {
            vec![Action::ToggleFavorite(r.episode_id)]
        } else if self.rows.selected == before {
            vec![Action::Play(r.episode_id)]
        } else {
            vec![]
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::SelectMood(_) => self.rows.select_first(),
            Action::SwitchScreen(s) if *s != Screen::Explore => self.search.deactivate(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let p = state.palette();
        let listing = self.sync(state);
        let badge = Some(Badge {
            text: self.rows.len().to_string(),
            color: p.secondary,
        })
        .filter(|_| !self.rows.is_empty());
        let block = pane_chrome("explore", Some('2'), focused, badge, &p);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);
        self.draw_chips(frame, split[0], state);
        self.search.draw(frame, split[1], &p);

        let table_area = split[2];
        self.body_area = Rect {
            y: table_area.y + 1,
            height: table_area.height.saturating_sub(1),
            ..table_area
        };
        if let Listing::Empty(empty) = listing {
            draw_empty(frame, table_area, empty, &p);
            return;
        }

        let body_h = self.body_area.height as usize;
        self.rows.ensure_visible(body_h);
        let selected = self.rows.selected;
        let rows: Vec<Row> = self
            .rows
            .visible_items(body_h)
            .map(|(i, r)| {
                let style = if i == selected && focused {
                    p.style_selected()
                } else {
                    p.style_default()
                };
                Row::new(vec![
                    format!(" {}", favorite_icon(r.is_favorite)),
                    r.title.clone(),
                    r.channel.clone(),
                    r.duration.clone(),
                    r.mood.clone(),
                ])
                .style(style)
            })
            .collect();

        let header = Row::new(vec!["", "Title", "Channel", "Length", "Mood"])
            .style(p.style_muted().add_modifier(Modifier::BOLD));
        let widths = [
            Constraint::Length(FAV_COL_W),
            Constraint::Percentage(45),
            Constraint::Percentage(30),
            Constraint::Length(6),
            Constraint::Min(6),
        ];
        frame.render_widget(Table::new(rows, widths).header(header), table_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use tokio::sync::mpsc;

    #[test]
    fn test_mood_chips_cycle_both_ways() {
        let (tx, _rx) = mpsc::channel(1);
        let mut s = AppState::new(vec!["Focus".into(), "Calm".into()], Theme::Dark, tx);
        assert_eq!(cycle_mood(&s, true), Some("Focus".into()));
        assert_eq!(cycle_mood(&s, false), Some("Calm".into()));
        s.filters.mood = Some("Calm".into());
        assert_eq!(cycle_mood(&s, true), None);
        // A mood outside the chip list restarts from "All".
        s.filters.mood = Some("Other".into());
        assert_eq!(cycle_mood(&s, true), Some("Focus".into()));
    }
}
