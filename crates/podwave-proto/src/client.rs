//! HTTP client for the PodWave backend.
//!
//! Every endpoint answers with a JSON object carrying an `ok` flag. A call
//! fails when the status is not 2xx or when `ok` is `false`; the failure
//! carries the server's `error` string when present. There are no timeouts
//! and no retries here: a failed call surfaces once to whoever made it.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{server_message, ApiError, GENERIC_API_ERROR};
use crate::protocol::{
    Ack, Channel, ChannelsResponse, Episode, EpisodeId, EpisodesResponse, EventRecord,
    FavoritesResponse, Leader, LeaderboardResponse, RegisterRequest, RegisteredUser,
    SessionReport, SessionStarted, StartSessionRequest, Stats, StatsResponse,
    ToggleFavoriteRequest, ToggleResult, UserId,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one call and decode the body into `T`.
    pub async fn call<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call_with_query(method, path, &[], body).await
    }

    async fn call_with_query<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("api {} {}", method, path);

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            let raw = serde_json::to_vec(b).map_err(|e| ApiError::Decode(e.to_string()))?;
            req = req.body(raw);
        }

        let response = req.send().await.map_err(|e| {
            warn!("api {} {} failed: {}", method, path, e);
            ApiError::from(e)
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let value: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) if status.is_success() => {
                warn!("api {} {}: body is not JSON: {}", method, path, e);
                return Err(ApiError::Decode(e.to_string()));
            }
            Err(_) => {
                warn!("api {} {}: HTTP {} with non-JSON body", method, path, status);
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    message: GENERIC_API_ERROR.to_string(),
                });
            }
        };

        if !status.is_success() {
            let message = server_message(&value);
            warn!("api {} {}: HTTP {}: {}", method, path, status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        if value.get("ok").and_then(|ok| ok.as_bool()) == Some(false) {
            let message = server_message(&value);
            warn!("api {} {}: rejected: {}", method, path, message);
            return Err(ApiError::Rejected(message));
        }

        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.call(Method::POST, path, Some(body)).await
    }

    // ── Endpoints ─────────────────────────────────────────────────────────────

    pub async fn channels(&self) -> Result<Vec<Channel>, ApiError> {
        let r: ChannelsResponse = self.get("/api/channels").await?;
        Ok(r.channels)
    }

    /// Episodes, optionally restricted to one mood (server-side filter).
    pub async fn episodes(&self, mood: Option<&str>) -> Result<Vec<Episode>, ApiError> {
        let r: EpisodesResponse = match mood.filter(|m| !m.is_empty()) {
            Some(m) => {
                self.call_with_query::<_, ()>(Method::GET, "/api/episodes", &[("mood", m)], None)
                    .await?
            }
            None => self.get("/api/episodes").await?,
        };
        Ok(r.episodes)
    }

    pub async fn register(&self, name: &str, dni: &str) -> Result<RegisteredUser, ApiError> {
        let body = RegisterRequest {
            name: name.to_string(),
            dni: dni.to_string(),
        };
        self.post("/api/users/register", &body).await
    }

    pub async fn start_session(&self, user_id: UserId) -> Result<SessionStarted, ApiError> {
        self.post("/api/sessions/start", &StartSessionRequest { user_id })
            .await
    }

    pub async fn end_session(&self, report: &SessionReport) -> Result<(), ApiError> {
        let _: Ack = self.post("/api/sessions/end", report).await?;
        Ok(())
    }

    /// Flip the favorite and return the server's new membership.
    pub async fn toggle_favorite(&self, user_id: UserId, episode_id: EpisodeId) -> Result<bool, ApiError> {
        let r: ToggleResult = self
            .post(
                "/api/favorites/toggle",
                &ToggleFavoriteRequest {
                    user_id,
                    episode_id,
                },
            )
            .await?;
        Ok(r.active)
    }

    pub async fn favorites(&self, user_id: UserId) -> Result<Vec<Episode>, ApiError> {
        let r: FavoritesResponse = self
            .get(&format!("/api/users/{}/favorites", user_id))
            .await?;
        Ok(r.favorites)
    }

    pub async fn leaderboard(&self) -> Result<Vec<Leader>, ApiError> {
        let r: LeaderboardResponse = self.get("/api/leaderboard").await?;
        Ok(r.leaders)
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        let r: StatsResponse = self.get("/api/stats").await?;
        Ok(r.stats)
    }

    pub async fn log_event(&self, event: &EventRecord) -> Result<(), ApiError> {
        let _: Ack = self.post("/api/events", event).await?;
        Ok(())
    }
}
