//! App flows against an in-process axum backend.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use podwave_proto::client::ApiClient;
use podwave_proto::protocol::{EpisodeId, Leader, SessionId, SessionReport, UserId};
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;

use crate::action::{Action, Screen};
use crate::app::{App, AppSettings};
use crate::render::{self, StatTile};
use crate::session;
use crate::widgets::status_bar::InputMode;
use crate::widgets::toast::Severity;

#[derive(Clone, Default)]
struct Backend {
    hits: Arc<AtomicUsize>,
    fail_toggle: Arc<AtomicBool>,
    fail_register: Arc<AtomicBool>,
    favorites: Arc<Mutex<BTreeSet<i64>>>,
    events: Arc<Mutex<Vec<Value>>>,
    ended: Arc<Mutex<Vec<Value>>>,
}

impl Backend {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn events(&self) -> Vec<Value> {
        self.events.lock().unwrap().clone()
    }
}

fn catalogue() -> Vec<Value> {
    vec![
        json!({ "id": 1, "title": "Study blocks", "channel_name": "Flow Daily", "duration_min": 18, "mood": "Focus", "cover_emoji": "⚡" }),
        json!({ "id": 5, "title": "Breathing before exams", "channel_name": "Mind Garden", "duration_min": 12, "mood": "Calm", "cover_emoji": "🌿" }),
        json!({ "id": 7, "title": "UI motion", "channel_name": "Pixel Talks", "duration_min": 19, "mood": "Build", "cover_emoji": "📱" }),
        json!({ "id": 8, "title": "Garden of notes", "channel_name": "Flow Daily", "duration_min": 25, "mood": "Focus" }),
        json!({ "id": 9, "title": "Evening garden walk", "channel_name": "Slow Radio", "duration_min": 30, "mood": "Calm" }),
    ]
}

async fn spawn_backend() -> (ApiClient, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/channels", get(channels))
        .route("/api/episodes", get(episodes))
        .route("/api/users/register", post(register_user))
        .route("/api/users/:id/favorites", get(favorites))
        .route("/api/sessions/start", post(start_session))
        .route("/api/sessions/end", post(end_session))
        .route("/api/favorites/toggle", post(toggle))
        .route("/api/leaderboard", get(leaderboard))
        .route("/api/stats", get(stats))
        .route("/api/events", post(log_event))
        .with_state(backend.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (ApiClient::new(format!("http://{}", addr)), backend)
}

async fn channels(State(b): State<Backend>) -> Json<Value> {
    b.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "ok": true, "channels": [
        { "name": "Mind Garden", "category": "Wellbeing", "description": "Short resets", "cover_emoji": "🌿" }
    ] }))
}

async fn episodes(
    State(b): State<Backend>,
    Query(q): Query<std::collections::HashMap<String, String>>,
) -> Json<Value> {
    b.hits.fetch_add(1, Ordering::SeqCst);
    let episodes: Vec<Value> = match q.get("mood") {
        Some(m) => catalogue().into_iter().filter(|e| e["mood"] == m.as_str()).collect(),
        None => catalogue(),
    };
    Json(json!({ "ok": true, "episodes": episodes }))
}

async fn register_user(State(b): State<Backend>, Json(body): Json<Value>) -> impl IntoResponse {
    b.hits.fetch_add(1, Ordering::SeqCst);
    if b.fail_register.load(Ordering::SeqCst) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "ok": false, "error": "registrations closed" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "ok": true, "userId": 12, "name": body["name"], "dni": body["dni"] })),
    )
}

async fn start_session(State(b): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    b.hits.fetch_add(1, Ordering::SeqCst);
    assert_eq!(body["userId"], 12);
    Json(json!({ "ok": true, "sessionId": 4 }))
}

async fn end_session(State(b): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    b.hits.fetch_add(1, Ordering::SeqCst);
    b.ended.lock().unwrap().push(body);
    Json(json!({ "ok": true }))
}

async fn favorites(State(b): State<Backend>, Path(id): Path<i64>) -> Json<Value> {
    b.hits.fetch_add(1, Ordering::SeqCst);
    assert_eq!(id, 12);
    let ids = b.favorites.lock().unwrap().clone();
    let list: Vec<Value> = catalogue()
        .into_iter()
        .filter(|e| e["id"].as_i64().is_some_and(|i| ids.contains(&i)))
        .collect();
    Json(json!({ "ok": true, "favorites": list }))
}

async fn toggle(State(b): State<Backend>, Json(body): Json<Value>) -> impl IntoResponse {
    b.hits.fetch_add(1, Ordering::SeqCst);
    if b.fail_toggle.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "ok": false, "error": "database locked" })),
        );
    }
    let id = body["episodeId"].as_i64().unwrap();
    let mut favs = b.favorites.lock().unwrap();
    let active = if favs.remove(&id) {
        false
    } else {
        favs.insert(id);
        true
    };
    (StatusCode::OK, Json(json!({ "ok": true, "active": active })))
}

async fn leaderboard(State(b): State<Backend>) -> Json<Value> {
    b.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "ok": true, "leaders": [
        { "name": "Ana", "sessions": 3, "plays": 9, "favorites": 2 }
    ] }))
}

async fn stats(State(b): State<Backend>) -> Json<Value> {
    b.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "ok": true, "stats": {
        "users": 1, "channels": 1, "episodes": 5, "sessions": 1, "events": 0, "favorites": 0
    } }))
}

async fn log_event(State(b): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    b.hits.fetch_add(1, Ordering::SeqCst);
    b.events.lock().unwrap().push(body);
    Json(json!({ "ok": true }))
}

// ── Harness ───────────────────────────────────────────────────────────────────

async fn app_with_backend() -> (App, Backend, TempDir) {
    let (client, backend) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = AppSettings {
        moods: vec!["Focus".into(), "Build".into(), "Calm".into()],
        search_debounce: Duration::from_millis(20),
        swipe_threshold_cols: 8,
        unload_grace: Duration::from_millis(200),
        export_dir: dir.path().join("exports"),
        prefs_path: dir.path().join("prefs.json"),
    };
    (App::new(client, settings), backend, dir)
}

/// Register Ana and drain the library refreshes that follow.
async fn register_ana(app: &mut App) {
    app.apply(Action::SubmitRegistration {
        name: "Ana".into(),
        dni: "123".into(),
    });
    let first = app.pump().await;
    assert!(first.starts_with("Registered"), "{}", first);
    for _ in 0..3 {
        app.pump().await;
    }
}

async fn wait_for_events(backend: &Backend, n: usize) -> Vec<Value> {
    let deadline = Instant::now() + Duration::from_secs(2);
    while backend.events().len() < n && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    backend.events()
}

fn press(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn left(kind: fn(MouseButton) -> MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: kind(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

// ── Registration ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_blank_registration_sends_nothing() {
    let (mut app, backend, _dir) = app_with_backend().await;
    app.apply(Action::SubmitRegistration {
        name: "   ".into(),
        dni: "123".into(),
    });
    assert_eq!(
        app.latest_toast(),
        Some(("Name and ID are required", Severity::Warning))
    );
    assert!(app.idle_for(Duration::from_millis(50)).await);
    assert_eq!(backend.hits(), 0);
    assert!(app.state.user.is_none());
}

#[tokio::test]
async fn test_register_opens_session_and_loads_library() {
    let (mut app, backend, _dir) = app_with_backend().await;
    app.apply(Action::SubmitRegistration {
        name: " Ana ".into(),
        dni: "123".into(),
    });
    app.pump().await;
    assert_eq!(app.latest_toast(), Some(("Welcome, Ana!", Severity::Success)));
    assert_eq!(app.state.user.as_ref().map(|u| u.id), Some(UserId(12)));
    assert_eq!(app.state.session.map(|s| s.id), Some(SessionId(4)));

    for _ in 0..3 {
        app.pump().await;
    }
    assert_eq!(app.state.leaders.len(), 1);
    assert_eq!(app.state.favorite_episodes.as_deref().map(|f| f.len()), Some(0));
    // register + start + favorites + leaderboard + stats
    assert_eq!(backend.hits(), 5);
}

#[tokio::test]
async fn test_double_submit_registers_once() {
    let (mut app, backend, _dir) = app_with_backend().await;
    app.apply(Action::SubmitRegistration {
        name: "Ana".into(),
        dni: "123".into(),
    });
    app.apply(Action::SubmitRegistration {
        name: "Bea".into(),
        dni: "456".into(),
    });
    assert_eq!(
        app.latest_toast(),
        Some(("Registration in progress", Severity::Info))
    );

    let first = app.pump().await;
    assert!(first.starts_with("Registered"), "{}", first);
    for _ in 0..3 {
        let msg = app.pump().await;
        assert!(!msg.starts_with("Registered"), "{}", msg);
    }
    assert!(app.idle_for(Duration::from_millis(100)).await);
    assert_eq!(app.state.user.as_ref().map(|u| u.name.as_str()), Some("Ana"));
    assert_eq!(app.state.session.map(|s| s.id), Some(SessionId(4)));
    // one register + start, then the three library refreshes
    assert_eq!(backend.hits(), 5);
}

#[tokio::test]
async fn test_failed_registration_allows_retry() {
    let (mut app, backend, _dir) = app_with_backend().await;
    backend.fail_register.store(true, Ordering::SeqCst);
    app.apply(Action::SubmitRegistration {
        name: "Ana".into(),
        dni: "123".into(),
    });
    let msg = app.pump().await;
    assert!(msg.starts_with("Failed"), "{}", msg);
    assert!(app.state.user.is_none());

    backend.fail_register.store(false, Ordering::SeqCst);
    app.apply(Action::SubmitRegistration {
        name: "Ana".into(),
        dni: "123".into(),
    });
    let msg = app.pump().await;
    assert!(msg.starts_with("Registered"), "{}", msg);
    assert_eq!(app.state.user.as_ref().map(|u| u.id), Some(UserId(12)));
}

#[tokio::test]
async fn test_second_registration_is_refused() {
    let (mut app, backend, _dir) = app_with_backend().await;
    register_ana(&mut app).await;
    let before = backend.hits();

    app.apply(Action::OpenRegister);
    assert_eq!(app.state.input_mode, InputMode::Normal);
    assert_eq!(
        app.latest_toast(),
        Some(("Already registered as Ana", Severity::Warning))
    );
    app.apply(Action::SubmitRegistration {
        name: "Bea".into(),
        dni: "9".into(),
    });
    assert!(app.idle_for(Duration::from_millis(50)).await);
    assert_eq!(backend.hits(), before);
}

// ── Favorites ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_toggle_favorite_updates_set_and_badge() {
    let (mut app, backend, _dir) = app_with_backend().await;
    register_ana(&mut app).await;
    assert_eq!(app.state.library_badge(), None);

    app.apply(Action::ToggleFavorite(EpisodeId(7)));
    app.pump().await;
    assert!(app.state.favorites.contains(&EpisodeId(7)));
    assert_eq!(app.state.favorites_count, 1);
    assert_eq!(app.state.library_badge(), Some(1));
    assert_eq!(app.latest_toast(), Some(("Added to favorites", Severity::Success)));

    // catalogue + favorites refresh
    for _ in 0..2 {
        app.pump().await;
    }
    let favs = app.state.favorite_episodes.clone().unwrap();
    assert_eq!(favs.len(), 1);
    assert_eq!(favs[0].id, EpisodeId(7));

    let events = wait_for_events(&backend, 1).await;
    let toggle = events
        .iter()
        .find(|e| e["eventType"] == "favorite_toggle")
        .expect("favorite_toggle event");
    assert_eq!(toggle["episodeId"], 7);
    assert_eq!(toggle["payload"], json!({ "episodeId": 7, "active": true }));
}

#[tokio::test]
async fn test_failed_toggle_leaves_favorites_alone() {
    let (mut app, backend, _dir) = app_with_backend().await;
    register_ana(&mut app).await;
    backend.fail_toggle.store(true, Ordering::SeqCst);

    app.apply(Action::ToggleFavorite(EpisodeId(7)));
    let msg = app.pump().await;
    assert!(msg.starts_with("Failed"), "{}", msg);
    assert!(app.state.favorites.is_empty());
    assert_eq!(app.state.favorites_count, 0);
    let (text, severity) = app.latest_toast().unwrap();
    assert_eq!(severity, Severity::Error);
    assert!(text.contains("database locked"), "{}", text);
    assert!(app.idle_for(Duration::from_millis(50)).await);
}

#[tokio::test]
async fn test_toggle_without_user_warns() {
    let (mut app, backend, _dir) = app_with_backend().await;
    app.apply(Action::ToggleFavorite(EpisodeId(7)));
    assert_eq!(app.latest_toast().map(|t| t.1), Some(Severity::Warning));
    assert!(app.idle_for(Duration::from_millis(50)).await);
    assert_eq!(backend.hits(), 0);
}

// ── Catalogue filters ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_mood_refetch_keeps_search_text() {
    let (mut app, _backend, _dir) = app_with_backend().await;
    app.apply(Action::SelectMood(None));
    app.pump().await;
    assert_eq!(app.state.episodes.len(), 5);

    app.apply(Action::SearchInput("garden".into()));
    app.pump().await;
    let ids: Vec<i64> = app.state.episodes.iter().map(|e| e.id.0).collect();
    assert_eq!(ids, vec![5, 8, 9]);

    app.apply(Action::SelectMood(Some("Calm".into())));
    app.pump().await;
    assert_eq!(app.state.filters.search, "garden");
    let ids: Vec<i64> = app.state.episodes.iter().map(|e| e.id.0).collect();
    assert_eq!(ids, vec![5, 9]);

    // Explore shows every match; home shows the top of the same filtered set.
    let rows = render::episode_rows(&app.state.episodes, &app.state.favorites);
    assert_eq!(rows.len(), 2);
    let home = render::home_cards(&app.state.episodes, &app.state.favorites);
    assert!(home.len() <= 2);
    let home_ids: Vec<i64> = home.items().iter().map(|c| c.episode_id.0).collect();
    assert_eq!(home_ids, vec![5, 9]);
}

#[tokio::test]
async fn test_search_debounce_keeps_last_keystroke() {
    let (mut app, _backend, _dir) = app_with_backend().await;
    for text in ["g", "ga", "garden"] {
        app.apply(Action::SearchInput(text.into()));
    }
    let msg = app.pump().await;
    assert!(msg.contains("\"garden\""), "{}", msg);
    assert!(app.idle_for(Duration::from_millis(80)).await);
    assert_eq!(app.state.filters.search, "garden");
}

// ── Navigation ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_switch_screen_is_idempotent() {
    let (mut app, backend, _dir) = app_with_backend().await;
    register_ana(&mut app).await;

    app.apply(Action::SwitchScreen(Screen::Explore));
    app.apply(Action::SwitchScreen(Screen::Explore));
    let events = wait_for_events(&backend, 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.events().len(), 1);
    assert_eq!(events[0]["eventType"], "screen_view");
    assert_eq!(events[0]["screenName"], "explore");
    assert_eq!(events[0]["payload"], json!({ "screen": "explore" }));
    assert_eq!(app.state.screens_visited.len(), 2);
}

#[tokio::test]
async fn test_swipe_moves_between_screens_without_wrapping() {
    let (mut app, _backend, _dir) = app_with_backend().await;
    app.set_areas(Rect::new(0, 0, 80, 2), Rect::new(0, 2, 80, 20));

    // Rightward drag on the first screen has nowhere to go.
    app.mouse(left(MouseEventKind::Down, 20, 10));
    app.mouse(left(MouseEventKind::Up, 60, 10));
    assert_eq!(app.state.active_screen, Screen::Home);

    // Too short to count.
    app.mouse(left(MouseEventKind::Down, 40, 10));
    app.mouse(left(MouseEventKind::Up, 35, 10));
    assert_eq!(app.state.active_screen, Screen::Home);

    app.mouse(left(MouseEventKind::Down, 60, 10));
    app.mouse(left(MouseEventKind::Up, 20, 10));
    assert_eq!(app.state.active_screen, Screen::Explore);
}

#[tokio::test]
async fn test_search_mode_captures_global_keys() {
    let (mut app, _backend, _dir) = app_with_backend().await;
    app.key(press('2'));
    assert_eq!(app.state.active_screen, Screen::Explore);

    app.key(press('/'));
    assert_eq!(app.state.input_mode, InputMode::Search);
    app.key(press('q'));
    assert!(!app.quitting());

    app.key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    app.key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    assert_eq!(app.state.input_mode, InputMode::Normal);
    app.key(press('q'));
    assert!(app.quitting());
}

// ── Playback ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_play_counts_and_ends_session_with_report() {
    let (mut app, backend, _dir) = app_with_backend().await;
    register_ana(&mut app).await;
    app.apply(Action::SelectMood(None));
    app.pump().await;

    app.apply(Action::Play(EpisodeId(5)));
    assert_eq!(app.state.plays_count, 1);
    assert_eq!(
        app.state.playback.now_playing().map(|n| n.episode_id),
        Some(EpisodeId(5))
    );
    assert_eq!(
        app.latest_toast(),
        Some(("Playing: Breathing before exams", Severity::Success))
    );

    let tick = app.next_tick().await;
    assert!(app.tick(tick));
    app.apply(Action::ClosePlayer);

    app.apply(Action::EndSession);
    let msg = app.pump().await;
    assert!(msg.starts_with("SessionEnded"), "{}", msg);
    assert!(app.state.session.is_none());
    let ended = backend.ended.lock().unwrap().clone();
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0]["sessionId"], 4);
    assert_eq!(ended[0]["playsCount"], 1);
    assert_eq!(ended[0]["screensVisited"], 1);
}

#[tokio::test]
async fn test_play_unknown_episode_is_ignored() {
    let (mut app, _backend, _dir) = app_with_backend().await;
    app.apply(Action::Play(EpisodeId(99)));
    assert_eq!(app.state.plays_count, 0);
    assert!(app.state.playback.now_playing().is_none());
}

// ── Export / import ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_export_writes_document() {
    let (mut app, _backend, dir) = app_with_backend().await;
    app.apply(Action::Export);
    let msg = app.pump().await;
    assert!(msg.starts_with("Exported"), "{}", msg);

    let path = dir.path().join("exports").join("podwave_export.json");
    let doc: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(doc["leaders"][0]["name"], "Ana");
    assert_eq!(doc["stats"]["episodes"], 5);
    assert_eq!(doc["episodes"].as_array().map(|a| a.len()), Some(5));
}

#[tokio::test]
async fn test_malformed_import_keeps_panels() {
    let (mut app, backend, dir) = app_with_backend().await;
    let kept = vec![Leader {
        name: "Kept".into(),
        sessions: 1,
        plays: 1,
        favorites: 0,
    }];
    app.state.leaders = kept.clone();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();

    app.apply(Action::Import(path));
    app.pump().await;
    assert_eq!(app.state.leaders, kept);
    assert!(app.state.stat_tiles.is_empty());
    assert_eq!(app.latest_toast().map(|t| t.1), Some(Severity::Error));
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_valid_import_replaces_panels() {
    let (mut app, _backend, dir) = app_with_backend().await;
    let path = dir.path().join("snap.json");
    std::fs::write(
        &path,
        r#"{"leaders":[{"name":"Luis","sessions":2,"plays":4,"favorites":1}],"stats":{"users":3,"plays":8}}"#,
    )
    .unwrap();

    app.apply(Action::Import(path));
    app.pump().await;
    assert_eq!(app.state.leaders.len(), 1);
    assert_eq!(app.state.leaders[0].name, "Luis");
    assert_eq!(
        app.state.stat_tiles,
        vec![
            StatTile {
                label: "plays".into(),
                value: "8".into(),
            },
            StatTile {
                label: "users".into(),
                value: "3".into(),
            },
        ]
    );
    assert_eq!(app.latest_toast(), Some(("Data imported", Severity::Success)));
}

// ── Quit ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_exit_report_is_bounded_by_grace() {
    // Accepts connections and never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    let client = ApiClient::new(format!("http://{}", addr));
    let report = SessionReport {
        session_id: SessionId(4),
        screens_visited: 2,
        plays_count: 1,
        favorites_count: 0,
    };

    let started = Instant::now();
    session::flush_on_exit(&client, Some(report), Duration::from_millis(100)).await;
    assert!(started.elapsed() < Duration::from_secs(2));
}
