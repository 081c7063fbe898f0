use std::fmt;

use serde::{Deserialize, Serialize};

/// Cover shown when the backend sends an episode or channel without one.
pub const DEFAULT_COVER: &str = "🎧";

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(SessionId);
id_newtype!(EpisodeId);

// ── Catalogue ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_emoji: Option<String>,
}

impl Channel {
    pub fn cover(&self) -> &str {
        cover_or_default(self.cover_emoji.as_deref())
    }
}

/// One episode as served by `/api/episodes` and `/api/users/{id}/favorites`.
/// The client never mutates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub title: String,
    pub channel_name: String,
    #[serde(default)]
    pub duration_min: u32,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub cover_emoji: Option<String>,
}

impl Episode {
    pub fn cover(&self) -> &str {
        cover_or_default(self.cover_emoji.as_deref())
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_min.saturating_mul(60)
    }
}

fn cover_or_default(cover: Option<&str>) -> &str {
    match cover {
        Some(c) if !c.trim().is_empty() => c,
        _ => DEFAULT_COVER,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub name: String,
    #[serde(default)]
    pub sessions: u64,
    #[serde(default)]
    pub plays: u64,
    #[serde(default)]
    pub favorites: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub users: u64,
    pub channels: u64,
    pub episodes: u64,
    pub sessions: u64,
    pub events: u64,
    pub favorites: u64,
}

// ── Response envelopes ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChannelsResponse {
    pub channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodesResponse {
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Deserialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<Episode>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardResponse {
    pub leaders: Vec<Leader>,
}

#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    pub stats: Stats,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub user_id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStarted {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleResult {
    pub active: bool,
}

/// Bodies that carry nothing but the `ok` flag.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {}

// ── Request bodies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub dni: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub user_id: UserId,
}

/// Aggregate counters reported when a session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: SessionId,
    pub screens_visited: usize,
    pub plays_count: u32,
    pub favorites_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteRequest {
    pub user_id: UserId,
    pub episode_id: EpisodeId,
}

/// Analytics event types the client emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ScreenView,
    PlayEpisode,
    FavoriteToggle,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub session_id: SessionId,
    pub event_type: EventType,
    pub episode_id: Option<EpisodeId>,
    pub screen_name: String,
    pub payload: serde_json::Value,
}

// ── Snapshot (export / import) ────────────────────────────────────────────────

/// The document written by export: `{ leaders, stats, episodes }`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub leaders: Vec<Leader>,
    pub stats: Stats,
    pub episodes: Vec<Episode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_wire_names() {
        let ep: Episode = serde_json::from_str(
            r#"{"id":7,"title":"UI motion","channel_name":"Pixel Talks","duration_min":19,"mood":"Build","cover_emoji":"📱"}"#,
        )
        .unwrap();
        assert_eq!(ep.id, EpisodeId(7));
        assert_eq!(ep.channel_name, "Pixel Talks");
        assert_eq!(ep.duration_secs(), 19 * 60);
        assert_eq!(ep.cover(), "📱");
    }

    #[test]
    fn test_missing_cover_falls_back() {
        let ep: Episode =
            serde_json::from_str(r#"{"id":1,"title":"t","channel_name":"c","cover_emoji":""}"#)
                .unwrap();
        assert_eq!(ep.cover(), DEFAULT_COVER);
        assert_eq!(ep.duration_min, 0);
    }

    #[test]
    fn test_requests_use_camel_case() {
        let report = SessionReport {
            session_id: SessionId(3),
            screens_visited: 2,
            plays_count: 4,
            favorites_count: 1,
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["sessionId"], 3);
        assert_eq!(v["screensVisited"], 2);
        assert_eq!(v["playsCount"], 4);
        assert_eq!(v["favoritesCount"], 1);

        let ev = EventRecord {
            session_id: SessionId(3),
            event_type: EventType::ScreenView,
            episode_id: None,
            screen_name: "explore".into(),
            payload: serde_json::json!({ "screen": "explore" }),
        };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["eventType"], "screen_view");
        assert_eq!(v["screenName"], "explore");
        assert!(v["episodeId"].is_null());
    }
}
