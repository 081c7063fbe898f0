//! Home screen: channel strip and the featured episode cards.

use ratatui::crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    navigation::hit,
    render::{self, CardAction, EpisodeCard, Listing},
    widgets::{pane_chrome::pane_chrome, scrollable_list::ScrollableList},
};

use super::{card_action, card_keys, draw_cards, draw_empty, handle_list_nav, CARD_HEIGHT};

pub struct HomeScreen {
    cards: ScrollableList<EpisodeCard>,
    hits: Vec<(Rect, CardAction)>,
    cards_area: Rect,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self {
            cards: ScrollableList::new(),
            hits: Vec::new(),
            cards_area: Rect::default(),
        }
    }

    fn sync(&mut self, state: &AppState) -> Listing<EpisodeCard> {
        let listing = render::home_cards(&state.episodes, &state.favorites);
        self.cards.set_items(listing.items().to_vec());
        listing
    }
}

impl Component for HomeScreen {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.sync(state);
        if handle_list_nav(key, &mut self.cards) {
            return vec![];
        }
        card_keys(key, self.cards.selected_item())
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        let (col, row) = (event.column, event.row);
        if let Some((_, a)) = self.hits.iter().find(|(r, _)| hit(*r, col, row)) {
            return vec![card_action(*a)];
        }
        if hit(self.cards_area, col, row) {
            self.sync(state);
            let slot = ((row - self.cards_area.y) / CARD_HEIGHT) as usize;
            self.cards.handle_click(slot);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let p = state.palette();
        let channels = render::channel_cards(&state.channels);
        let strip_h = (channels.len().max(1) as u16 + 2).min(area.height / 3).max(3);
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(strip_h), Constraint::Min(0)])
            .split(area);

        // ── Channels ─────────────────────────────────────────────────────────
        let block = pane_chrome("channels", None, false, None, &p);
        let inner = block.inner(split[0]);
        frame.render_widget(block, split[0]);
        match &channels {
            Listing::Empty(empty) => draw_empty(frame, inner, *empty, &p),
            Listing::Items(cards) => {
                let lines: Vec<Line> = cards
                    .iter()
                    .map(|c| {
                        Line::from(vec![
                            Span::raw(" "),
                            Span::styled(c.heading.clone(), p.style_default()),
                            Span::styled("  ", p.style_muted()),
                            Span::styled(c.meta.clone(), p.style_muted()),
                        ])
                    })
                    .collect();
                frame.render_widget(Paragraph::new(lines), inner);
            }
        }

        // ── Featured episodes ────────────────────────────────────────────────
        let block = pane_chrome("featured", Some('1'), focused, None, &p);
        let inner = block.inner(split[1]);
        frame.render_widget(block, split[1]);
        self.cards_area = inner;
        match self.sync(state) {
            Listing::Empty(empty) => {
                self.hits.clear();
                draw_empty(frame, inner, empty, &p);
            }
            Listing::Items(_) => {
                self.hits = draw_cards(frame, inner, &mut self.cards, focused, &p);
            }
        }
    }
}
