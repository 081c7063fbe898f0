//! Library screen: the user's favorites, the leaderboard and the stats
//! dashboard.

use ratatui::crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Row, Table},
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    navigation::hit,
    render::{self, CardAction, EpisodeCard, LeaderRow, Listing, RankTier, StatTile},
    theme::Palette,
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

use super::{card_action, card_keys, draw_cards, draw_empty, handle_list_nav, CARD_HEIGHT};

const TILES_PER_ROW: usize = 3;
const TILE_HEIGHT: u16 = 3;

pub struct LibraryScreen {
    favs: ScrollableList<EpisodeCard>,
    hits: Vec<(Rect, CardAction)>,
    cards_area: Rect,
}

impl LibraryScreen {
    pub fn new() -> Self {
        Self {
            favs: ScrollableList::new(),
            hits: Vec::new(),
            cards_area: Rect::default(),
        }
    }

    fn sync(&mut self, state: &AppState) -> Listing<EpisodeCard> {
        let listing = render::favorite_cards(state.favorite_episodes.as_deref(), &state.favorites);
        self.favs.set_items(listing.items().to_vec());
        listing
    }
}

fn tier_style(tier: RankTier, p: &Palette) -> Style {
    let color = match tier {
        RankTier::Gold => p.gold,
        RankTier::Silver => p.silver,
        RankTier::Bronze => p.bronze,
        RankTier::Other => p.muted,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn draw_leaderboard(frame: &mut Frame, area: Rect, rows: &[LeaderRow], p: &Palette) {
    let body: Vec<Row> = rows
        .iter()
        .map(|r| {
            Row::new(vec![
                Span::styled(format!(" {:>2}", r.rank), tier_style(r.tier, p)),
                Span::styled(r.name.clone(), p.style_default()),
                Span::styled(r.sessions.to_string(), p.style_secondary()),
                Span::styled(r.plays.to_string(), p.style_secondary()),
                Span::styled(r.favorites.to_string(), p.style_secondary()),
            ])
        })
        .collect();
    let header = Row::new(vec!["  #", "User", "Sessions", "Plays", "Fav"])
        .style(p.style_muted().add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Length(4),
        Constraint::Min(10),
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Length(4),
    ];
    frame.render_widget(Table::new(body, widths).header(header), area);
}

fn draw_tiles(frame: &mut Frame, area: Rect, tiles: &[StatTile], p: &Palette) {
    let tile_rows: Vec<&[StatTile]> = tiles.chunks(TILES_PER_ROW).collect();
    let bands = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(TILE_HEIGHT); tile_rows.len()])
        .split(area);
    for (band, chunk) in bands.iter().zip(tile_rows) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, TILES_PER_ROW as u32); TILES_PER_ROW])
            .split(*band);
        for (slot, t) in cols.iter().zip(chunk) {
            let lines = vec![
                Line::from(Span::styled(
                    format!(" {}", t.value),
                    Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(format!(" {}", t.label), p.style_muted())),
            ];
            frame.render_widget(Paragraph::new(lines), *slot);
        }
    }
}

impl Component for LibraryScreen {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.sync(state);
        if handle_list_nav(key, &mut self.favs) {
            return vec![];
        }
        card_keys(key, self.favs.selected_item())
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
            self.favs
                .handle_click(((row - self.cards_area.y) / CARD_HEIGHT) as usize);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let p = state.palette();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        // ── Favorites ────────────────────────────────────────────────────────
        let badge = state.library_badge().map(|n| Badge {
            text: n.to_string(),
            color: p.playing,
        });
        let block = pane_chrome("favorites", Some('3'), focused, badge, &p);
        let inner = block.inner(cols[0]);
        frame.render_widget(block, cols[0]);
        self.cards_area = inner;
        match self.sync(state) {
            Listing::Empty(empty) => {
                self.hits.clear();
                draw_empty(frame, inner, empty, &p);
            }
            Listing::Items(_) => {
                self.hits = draw_cards(frame, inner, &mut self.favs, focused, &p);
            }
        }

        // ── Leaderboard + stats ──────────────────────────────────────────────
        let tiles_h = (state.stat_tiles.len().div_ceil(TILES_PER_ROW).max(1) as u16) * TILE_HEIGHT + 2;
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(tiles_h)])
            .split(cols[1]);

        let block = pane_chrome("leaderboard", None, false, None, &p);
        let inner = block.inner(right[0]);
        frame.render_widget(block, right[0]);
        match render::leaderboard_rows(&state.leaders) {
            Listing::Empty(empty) => draw_empty(frame, inner, empty, &p),
            Listing::Items(rows) => draw_leaderboard(frame, inner, &rows, &p),
        }

        let block = pane_chrome("stats", None, false, None, &p);
        let inner = block.inner(right[1]);
        frame.render_widget(block, right[1]);
        match render::stat_listing(&state.stat_tiles) {
            Listing::Empty(empty) => draw_empty(frame, inner, empty, &p),
            Listing::Items(tiles) => draw_tiles(frame, inner, &tiles, &p),
        }
    }
}
