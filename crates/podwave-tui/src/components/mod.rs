//! UI components and the drawing helpers they share.

pub mod explore;
pub mod header;
pub mod help_overlay;
pub mod home;
pub mod import_prompt;
pub mod library;
pub mod mini_player;
pub mod register_form;

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::{Action, Screen};
use crate::render::{favorite_icon, CardAction, EmptyState, EpisodeCard};
use crate::theme::Palette;
use crate::widgets::scrollable_list::ScrollableList;

/// Lines one episode card takes: heading, meta, actions.
pub const CARD_HEIGHT: u16 = 3;

pub fn card_action(a: CardAction) -> Action {
    match a {
        CardAction::Play(id) => Action::Play(id),
        CardAction::Favorite(id) => Action::ToggleFavorite(id),
        CardAction::SeeMore => Action::SwitchScreen(Screen::Explore),
    }
}

/// Cursor movement shared by every list. Returns true when the key was used.
pub fn handle_list_nav<T>(key: KeyEvent, list: &mut ScrollableList<T>) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => list.select_up(1),
        KeyCode::Down | KeyCode::Char('j') => list.select_down(1),
        KeyCode::PageUp => list.select_up(10),
        KeyCode::PageDown => list.select_down(10),
        KeyCode::Home | KeyCode::Char('g') => list.select_first(),
        KeyCode::End | KeyCode::Char('G') => list.select_last(),
        _ => return false,
    }
    true
}

/// Play / favorite keys on the selected card.
pub fn card_keys(key: KeyEvent, card: Option<&EpisodeCard>) -> Vec<Action> {
    let Some(card) = card else {
        return vec![];
    };
    match key.code {
        KeyCode::Enter | KeyCode::Char('p') => vec![Action::Play(card.episode_id)],
        KeyCode::Char('f') => vec![Action::ToggleFavorite(card.episode_id)],
        KeyCode::Char('o') if card.actions.contains(&CardAction::SeeMore) => {
            vec![Action::SwitchScreen(Screen::Explore)]
        }
        _ => vec![],
    }
}

pub fn draw_empty(frame: &mut Frame, area: Rect, empty: EmptyState, palette: &Palette) {
    let line = Line::from(vec![
        Span::raw("  "),
        Span::raw(empty.icon),
        Span::raw(" "),
        Span::styled(empty.text, palette.style_muted()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn action_label(a: CardAction, card: &EpisodeCard) -> String {
    match a {
        CardAction::Play(_) => "▶ Play".to_string(),
        CardAction::Favorite(_) => format!("{} Favorite", favorite_icon(card.is_favorite)),
        CardAction::SeeMore => "See more".to_string(),
    }
}

/// Draw episode cards stacked vertically. Returns the clickable regions of
/// each card's action buttons, so a click resolves against this render.
pub fn draw_cards(
    frame: &mut Frame,
    area: Rect,
    cards: &mut ScrollableList<EpisodeCard>,
    focused: bool,
    palette: &Palette,
) -> Vec<(Rect, CardAction)> {
    let mut hits = Vec::new();
    let per_page = (area.height / CARD_HEIGHT).max(1) as usize;
    cards.ensure_visible(per_page);
    let selected = cards.selected;

    let visible: Vec<(usize, &EpisodeCard)> = cards.visible_items(per_page).collect();
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible.len()])
        .split(area);

    for ((idx, card), slot) in visible.into_iter().zip(slots.iter()) {
        let is_sel = focused && idx == selected;
        let marker = if is_sel { "▌" } else { " " };
        let heading_style = if is_sel {
            palette.style_selected()
        } else {
            palette.style_default().add_modifier(Modifier::BOLD)
        };
        let mut lines = vec![
            Line::from(vec![
                Span::styled(marker, Style::default().fg(palette.border_focused)),
                Span::styled(card.heading.clone(), heading_style),
            ]),
            Line::from(vec![
                Span::raw(" "),
                Span::styled(card.meta.clone(), palette.style_secondary()),
            ]),
        ];

        let mut spans = vec![Span::raw(" ")];
        let mut x = slot.x + 1;
        for a in &card.actions {
            let label = format!("[{}]", action_label(*a, card));
            let w = unicode_width::UnicodeWidthStr::width(label.as_str()) as u16;
            if slot.height >= 3 {
                hits.push((Rect::new(x, slot.y + 2, w, 1), *a));
            }
            spans.push(Span::styled(label, Style::default().fg(palette.tag)));
            spans.push(Span::raw(" "));
            x += w + 1;
        }
        lines.push(Line::from(spans));
        frame.render_widget(Paragraph::new(lines), *slot);
    }
    hits
}
