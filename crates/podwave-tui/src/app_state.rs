//! AppState: the view state. Components read it; only the App writes it.

use std::collections::{BTreeSet, HashSet};

use podwave_proto::protocol::{
    Channel, Episode, EpisodeId, Leader, SessionId, SessionReport, Stats, UserId,
};
use tokio::sync::mpsc;

use crate::action::Screen;
use crate::playback::{PlaybackSimulator, PlaybackTick};
use crate::render::{self, StatTile};
use crate::theme::{Palette, Theme};
use crate::widgets::status_bar::InputMode;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    pub id: SessionId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    /// `None` is the "All" chip.
    pub mood: Option<String>,
    /// Trimmed search text; empty means no search.
    pub search: String,
}

/// Case-insensitive substring match on title, channel name or mood.
pub fn episode_matches(ep: &Episode, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    ep.title.to_lowercase().contains(&q)
        || ep.channel_name.to_lowercase().contains(&q)
        || ep.mood.to_lowercase().contains(&q)
}

pub struct AppState {
    // ── Identity ────────────────────────────────────────────────────────────
    pub user: Option<User>,
    pub session: Option<Session>,

    // ── Navigation ──────────────────────────────────────────────────────────
    pub active_screen: Screen,
    pub screens_visited: BTreeSet<Screen>,
    pub input_mode: InputMode,

    // ── Counters reported at session end ────────────────────────────────────
    pub plays_count: u32,
    pub favorites_count: usize,

    // ── Remote data ─────────────────────────────────────────────────────────
    pub channels: Vec<Channel>,
    /// Last list fetched from `/api/episodes` for the current mood.
    pub catalog: Vec<Episode>,
    /// `catalog` after the search filter; what the screens show.
    pub episodes: Vec<Episode>,
    /// `None` until favorites have been fetched for a registered user.
    pub favorite_episodes: Option<Vec<Episode>>,
    pub favorites: HashSet<EpisodeId>,
    pub leaders: Vec<Leader>,
    pub stat_tiles: Vec<StatTile>,

    // ── Filters ─────────────────────────────────────────────────────────────
    pub filters: Filters,
    /// Mood chips after "All", from config.
    pub moods: Vec<String>,

    // ── Player / look ───────────────────────────────────────────────────────
    pub playback: PlaybackSimulator,
    pub theme: Theme,
}

impl AppState {
    pub fn new(moods: Vec<String>, theme: Theme, tick_tx: mpsc::Sender<PlaybackTick>) -> Self {
        Self {
            user: None,
            session: None,
            active_screen: Screen::Home,
            screens_visited: BTreeSet::from([Screen::Home]),
            input_mode: InputMode::Normal,
            plays_count: 0,
            favorites_count: 0,
            channels: Vec::new(),
            catalog: Vec::new(),
            episodes: Vec::new(),
            favorite_episodes: None,
            favorites: HashSet::new(),
            leaders: Vec::new(),
            stat_tiles: Vec::new(),
            filters: Filters::default(),
            moods,
            playback: PlaybackSimulator::new(tick_tx),
            theme,
        }
    }

    pub fn palette(&self) -> Palette {
        self.theme.palette()
    }

    /// Make `screen` active. Returns `false` when it already was.
    pub fn visit(&mut self, screen: Screen) -> bool {
        if self.active_screen == screen {
            return false;
        }
        self.active_screen = screen;
        self.screens_visited.insert(screen);
        true
    }

    // ── Catalogue ─────────────────────────────────────────────────────────────

    pub fn set_catalog(&mut self, episodes: Vec<Episode>) {
        self.catalog = episodes;
        self.apply_search();
    }

    pub fn set_search(&mut self, text: &str) {
        self.filters.search = text.trim().to_string();
        self.apply_search();
    }

    fn apply_search(&mut self) {
        let q = &self.filters.search;
        self.episodes = self
            .catalog
            .iter()
            .filter(|e| episode_matches(e, q))
            .cloned()
            .collect();
    }

    /// Look an episode up in everything the client has cached.
    pub fn find_episode(&self, id: EpisodeId) -> Option<&Episode> {
        self.episodes
            .iter()
            .chain(self.favorite_episodes.iter().flatten())
            .chain(self.catalog.iter())
            .find(|e| e.id == id)
    }

    // ── Favorites ─────────────────────────────────────────────────────────────

    /// Replace the favorite cache with a fresh server list.
    pub fn set_favorites(&mut self, list: Vec<Episode>) {
        self.favorites = list.iter().map(|e| e.id).collect();
        self.favorites_count = self.favorites.len();
        self.favorite_episodes = Some(list);
    }

    /// Reconcile one toggle with the server-reported membership.
    pub fn apply_toggle(&mut self, id: EpisodeId, active: bool) {
        if active {
            self.favorites.insert(id);
        } else {
            self.favorites.remove(&id);
            if let Some(list) = self.favorite_episodes.as_mut() {
                list.retain(|e| e.id != id);
            }
        }
        self.favorites_count = self.favorites.len();
    }

    pub fn set_stats(&mut self, stats: &Stats) {
        self.stat_tiles = render::stat_tiles(stats);
    }

    // ── Header ────────────────────────────────────────────────────────────────

    pub fn explore_badge(&self) -> Option<usize> {
        Some(self.episodes.len()).filter(|&n| n > 0)
    }

    pub fn library_badge(&self) -> Option<usize> {
        Some(self.favorites_count).filter(|&n| n > 0)
    }

    pub fn session_label(&self) -> String {
        if let Some(np) = self.playback.now_playing().filter(|_| self.playback.is_active()) {
            return format!("▶ {}", np.title);
        }
        match &self.user {
            Some(u) if self.session.is_some() => format!("Session: {}", u.name),
            _ => "No session".to_string(),
        }
    }

    pub fn session_report(&self) -> Option<SessionReport> {
        self.session.map(|s| SessionReport {
            session_id: s.id,
            screens_visited: self.screens_visited.len(),
            plays_count: self.plays_count,
            favorites_count: self.favorites_count,
        })
    }
}
