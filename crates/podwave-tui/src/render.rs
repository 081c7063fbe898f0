//! Renderers: pure mappings from fetched data to the view models that
//! components draw.
//!
//! Nothing here touches the terminal. Every list renderer degrades to an
//! explicit `EmptyState` for empty input, and each call builds a fresh set
//! of rows with the actions bound to them.

use std::collections::HashSet;

use podwave_proto::protocol::{Channel, Episode, EpisodeId, Leader, Stats};

/// How many episodes the home screen features.
pub const HOME_TOP_N: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub text: &'static str,
}

pub const EMPTY_HOME: EmptyState = EmptyState {
    icon: "🎧",
    text: "No episodes",
};
pub const EMPTY_EXPLORE: EmptyState = EmptyState {
    icon: "🔎",
    text: "No results",
};
pub const EMPTY_LIBRARY_NO_USER: EmptyState = EmptyState {
    icon: "📚",
    text: "Register to see your library.",
};
pub const EMPTY_FAVORITES: EmptyState = EmptyState {
    icon: "❤️",
    text: "No favorites yet.",
};
pub const EMPTY_LEADERS: EmptyState = EmptyState {
    icon: "🏆",
    text: "No ranking yet.",
};
pub const EMPTY_STATS: EmptyState = EmptyState {
    icon: "📊",
    text: "No stats yet.",
};
pub const EMPTY_CHANNELS: EmptyState = EmptyState {
    icon: "📻",
    text: "No channels",
};

/// Either rendered rows or the empty-state message that replaces them.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Items(Vec<T>),
    Empty(EmptyState),
}

impl<T> Listing<T> {
    fn from_vec(items: Vec<T>, empty: EmptyState) -> Self {
        if items.is_empty() {
            Self::Empty(empty)
        } else {
            Self::Items(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Items(v) => v,
            Self::Empty(_) => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

pub fn favorite_icon(active: bool) -> &'static str {
    if active {
        "💚"
    } else {
        "🤍"
    }
}

// ── Episodes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Play(EpisodeId),
    Favorite(EpisodeId),
    /// "See more": opens the explore screen.
    SeeMore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeCard {
    pub episode_id: EpisodeId,
    pub heading: String,
    pub meta: String,
    pub is_favorite: bool,
    pub actions: Vec<CardAction>,
}

pub fn episode_card(ep: &Episode, favorites: &HashSet<EpisodeId>, compact: bool) -> EpisodeCard {
    let mut actions = vec![CardAction::Play(ep.id), CardAction::Favorite(ep.id)];
    if !compact {
        actions.push(CardAction::SeeMore);
    }
    EpisodeCard {
        episode_id: ep.id,
        heading: format!("{} {}", ep.cover(), ep.title),
        meta: format!("{} · {} min · {}", ep.channel_name, ep.duration_min, ep.mood),
        is_favorite: favorites.contains(&ep.id),
        actions,
    }
}

/// The home screen's featured cards: top of the filtered list.
pub fn home_cards(episodes: &[Episode], favorites: &HashSet<EpisodeId>) -> Listing<EpisodeCard> {
    let cards = episodes
        .iter()
        .take(HOME_TOP_N)
        .map(|e| episode_card(e, favorites, false))
        .collect();
    Listing::from_vec(cards, EMPTY_HOME)
}

/// Library cards. `None` favorites means no user is registered.
pub fn favorite_cards(
    favorites_list: Option<&[Episode]>,
    favorites: &HashSet<EpisodeId>,
) -> Listing<EpisodeCard> {
    match favorites_list {
        None => Listing::Empty(EMPTY_LIBRARY_NO_USER),
        Some(list) => Listing::from_vec(
            list.iter().map(|e| episode_card(e, favorites, true)).collect(),
            EMPTY_FAVORITES,
        ),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRow {
    pub episode_id: EpisodeId,
    pub title: String,
    pub channel: String,
    pub duration: String,
    pub mood: String,
    pub is_favorite: bool,
}

/// The explore table.
pub fn episode_rows(episodes: &[Episode], favorites: &HashSet<EpisodeId>) -> Listing<EpisodeRow> {
    let rows = episodes
        .iter()
        .map(|ep| EpisodeRow {
            episode_id: ep.id,
            title: format!("{} {}", ep.cover(), ep.title),
            channel: ep.channel_name.clone(),
            duration: format!("{}m", ep.duration_min),
            mood: ep.mood.clone(),
            is_favorite: favorites.contains(&ep.id),
        })
        .collect();
    Listing::from_vec(rows, EMPTY_EXPLORE)
}

// ── Channels ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelCard {
    pub heading: String,
    pub meta: String,
}

pub fn channel_cards(channels: &[Channel]) -> Listing<ChannelCard> {
    let cards = channels
        .iter()
        .map(|ch| ChannelCard {
            heading: format!("{} {}", ch.cover(), ch.name),
            meta: if ch.description.is_empty() {
                ch.category.clone()
            } else {
                format!("{} · {}", ch.category, ch.description)
            },
        })
        .collect();
    Listing::from_vec(cards, EMPTY_CHANNELS)
}

// ── Leaderboard ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    Other,
}

impl RankTier {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Self::Gold,
            2 => Self::Silver,
            3 => Self::Bronze,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderRow {
    /// 1-based.
    pub rank: usize,
    pub tier: RankTier,
    pub name: String,
    pub sessions: u64,
    pub plays: u64,
    pub favorites: u64,
}

/// Rows in server order; the server already ranks them.
pub fn leaderboard_rows(leaders: &[Leader]) -> Listing<LeaderRow> {
    let rows = leaders
        .iter()
        .enumerate()
        .map(|(i, l)| LeaderRow {
            rank: i + 1,
            tier: RankTier::for_rank(i + 1),
            name: l.name.clone(),
            sessions: l.sessions,
            plays: l.plays,
            favorites: l.favorites,
        })
        .collect();
    Listing::from_vec(rows, EMPTY_LEADERS)
}

// ── Stats ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StatTile {
    pub label: String,
    pub value: String,
}

fn tile(label: &str, value: impl ToString) -> StatTile {
    StatTile {
        label: label.to_string(),
        value: value.to_string(),
    }
}

/// The six dashboard counters, always in this order.
pub fn stat_tiles(stats: &Stats) -> Vec<StatTile> {
    vec![
        tile("Users", stats.users),
        tile("Channels", stats.channels),
        tile("Episodes", stats.episodes),
        tile("Sessions", stats.sessions),
        tile("Events", stats.events),
        tile("Favorites", stats.favorites),
    ]
}

/// Tiles for an imported stats object, one per key, sorted by key.
pub fn stat_tiles_from_map(map: &serde_json::Map<String, serde_json::Value>) -> Vec<StatTile> {
    map.iter()
        .map(|(k, v)| {
            let value = match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            tile(k, value)
        })
        .collect()
}

pub fn stat_listing(tiles: &[StatTile]) -> Listing<StatTile> {
    Listing::from_vec(tiles.to_vec(), EMPTY_STATS)
}
