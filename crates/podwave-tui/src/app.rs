//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - Network calls run in spawned tasks. Each one reports back as an
//!   `AppMessage` on the app channel, so the loop keeps drawing and reading
//!   input while a call is in flight. A failed call sends `Failed` and
//!   leaves state untouched.
//! - Playback ticks arrive on their own channel and carry a generation.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Terminal,
};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use podwave_proto::client::ApiClient;
use podwave_proto::config::Config;
use podwave_proto::protocol::{Channel, Episode, EpisodeId, EventType, Leader, SessionId, Stats};

use crate::{
    action::{Action, Screen},
    app_state::{AppState, Session, User},
    component::Component,
    components::{
        explore::ExploreScreen,
        header::Header,
        help_overlay::HelpOverlay,
        home::HomeScreen,
        import_prompt::ImportPrompt,
        library::LibraryScreen,
        mini_player::{MiniPlayer, MINI_PLAYER_HEIGHT},
        register_form::RegisterForm,
    },
    error::PodwaveError,
    navigation::{hit, SwipeTracker},
    playback::{PlaybackTick, TickOutcome},
    prefs, session,
    snapshot::{self, ImportedSnapshot},
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

// ── Messages ──────────────────────────────────────────────────────────────────

/// Everything that can wake the event loop.
#[derive(Debug)]
pub enum AppMessage {
    Event(Event),
    Channels(Vec<Channel>),
    /// Catalogue for `mood`. The last one to arrive is what gets shown.
    Episodes {
        mood: Option<String>,
        episodes: Vec<Episode>,
    },
    /// The search debounce expired with this text.
    SearchSettled(String),
    Favorites(Vec<Episode>),
    Leaderboard(Vec<Leader>),
    Stats(Stats),
    Registered {
        user: User,
        session: Session,
    },
    FavoriteToggled {
        episode_id: EpisodeId,
        active: bool,
    },
    SessionEnded(SessionId),
    Seeded(usize),
    Exported(PathBuf),
    Imported(ImportedSnapshot),
    Failed {
        context: &'static str,
        error: PodwaveError,
    },
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub moods: Vec<String>,
    pub search_debounce: Duration,
    pub swipe_threshold_cols: u16,
    pub unload_grace: Duration,
    pub export_dir: PathBuf,
    pub prefs_path: PathBuf,
}

impl AppSettings {
    pub fn from_config(config: &Config, prefs_path: PathBuf) -> Self {
        Self {
            moods: config.ui.moods.clone(),
            search_debounce: Duration::from_millis(config.ui.search_debounce_ms),
            swipe_threshold_cols: config.ui.swipe_threshold_cols,
            unload_grace: Duration::from_millis(config.session.unload_grace_ms),
            export_dir: config.paths.export_dir.clone(),
            prefs_path,
        }
    }
}

const REGISTER_CONTEXT: &str = "Register";

/// Last-drawn layout rects, used for mouse hit-testing.
#[derive(Debug, Clone, Default)]
struct PaneAreas {
    header: Rect,
    body: Rect,
    player: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub state: AppState,
    client: ApiClient,
    settings: AppSettings,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    home: HomeScreen,
    explore: ExploreScreen,
    library: LibraryScreen,
    mini_player: MiniPlayer,
    register_form: RegisterForm,
    import_prompt: ImportPrompt,
    help_overlay: HelpOverlay,

    toast: ToastManager,
    show_keys_bar: bool,
    swipe: SwipeTracker,
    pane_areas: PaneAreas,

    /// Pending search debounce; aborted and replaced on every keystroke.
    search_debounce: Option<JoinHandle<()>>,
    /// A register + start-session call is in flight.
    registering: bool,

    msg_tx: mpsc::Sender<AppMessage>,
    msg_rx: mpsc::Receiver<AppMessage>,
    tick_rx: mpsc::Receiver<PlaybackTick>,

    should_quit: bool,
}

impl App {
    pub fn new(client: ApiClient, settings: AppSettings) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<AppMessage>(256);
        let (tick_tx, tick_rx) = mpsc::channel::<PlaybackTick>(16);
        let theme = prefs::load_theme(&settings.prefs_path);
        let state = AppState::new(settings.moods.clone(), theme, tick_tx);

        Self {
            state,
            client,
            swipe: SwipeTracker::new(settings.swipe_threshold_cols),
            settings,
            header: Header::new(),
            home: HomeScreen::new(),
            explore: ExploreScreen::new(),
            library: LibraryScreen::new(),
            mini_player: MiniPlayer::new(),
            register_form: RegisterForm::new(),
            import_prompt: ImportPrompt::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            show_keys_bar: true,
            pane_areas: PaneAreas::default(),
            search_debounce: None,
            registering: false,
            msg_tx,
            msg_rx,
            tick_rx,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard/mouse events ────────────────────────────
        // Polls so the thread notices a closed channel after quit.
        let event_tx = self.msg_tx.clone();
        tokio::task::spawn_blocking(move || {
            while !event_tx.is_closed() {
                match event::poll(Duration::from_millis(250)) {
                    Ok(true) => match event::read() {
                        Ok(ev) => {
                            if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    },
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
        });

        self.load_initial();

        // Toast expiry + component maintenance.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = self.msg_rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }
                Some(tick) = self.tick_rx.recv() => {
                    needs_redraw = self.handle_tick(tick);
                }
                _ = ui_tick.tick() => {
                    self.toast.tick();
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.home.tick(s));
                        all.extend(self.explore.tick(s));
                        all.extend(self.library.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action);
                    }
                    needs_redraw = true;
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        if let Some(h) = self.search_debounce.take() {
            h.abort();
        }
        self.state.playback.close();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        session::flush_on_exit(
            &self.client,
            self.state.session_report(),
            self.settings.unload_grace,
        )
        .await;
        info!("podwave exiting");
        Ok(())
    }

    // ── Message handling ──────────────────────────────────────────────────────

    /// Apply one message. Returns whether a redraw is needed.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                self.sync_input_mode();
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                let actions = self.handle_mouse(mouse);
                if actions.is_empty() && matches!(mouse.kind, MouseEventKind::Moved) {
                    return false;
                }
                for action in actions {
                    self.dispatch(action);
                }
                self.sync_input_mode();
            }
            AppMessage::Event(_) => {}

            AppMessage::Channels(channels) => {
                debug!("channels: {}", channels.len());
                self.state.channels = channels;
            }
            AppMessage::Episodes { mood, episodes } => {
                debug!("episodes for {:?}: {}", mood, episodes.len());
                self.state.set_catalog(episodes);
            }
            AppMessage::SearchSettled(text) => {
                self.search_debounce = None;
                self.state.set_search(&text);
            }
            AppMessage::Favorites(list) => {
                if self.state.user.is_some() {
                    self.state.set_favorites(list);
                }
            }
            AppMessage::Leaderboard(leaders) => self.state.leaders = leaders,
            AppMessage::Stats(stats) => self.state.set_stats(&stats),

            AppMessage::Registered { user, session } => {
                self.registering = false;
                if self.state.user.is_some() {
                    warn!("dropping late registration of user {} (session {})", user.id, session.id);
                    return true;
                }
                info!("registered user {} ({})", user.id, user.name);
                self.toast.success(format!("Welcome, {}!", user.name));
                self.state.user = Some(user);
                self.state.session = Some(session);
                self.register_form.visible = false;
                self.sync_input_mode();
                self.refresh_library();
            }
            AppMessage::FavoriteToggled { episode_id, active } => {
                self.state.apply_toggle(episode_id, active);
                self.spawn_event(
                    EventType::FavoriteToggle,
                    Some(episode_id),
                    json!({ "episodeId": episode_id, "active": active }),
                );
                if active {
                    self.toast.success("Added to favorites");
                } else {
                    self.toast.info("Removed from favorites");
                }
                self.refresh_episodes();
                self.refresh_favorites();
            }
            AppMessage::SessionEnded(id) => {
                if self.state.session.map(|s| s.id) == Some(id) {
                    self.state.session = None;
                }
                self.toast.info("Session ended");
            }
            AppMessage::Seeded(n) => {
                info!("seeded {} demo users", n);
                self.toast.success("Demo data inserted");
                self.refresh_leaderboard();
                self.refresh_stats();
            }
            AppMessage::Exported(path) => {
                self.toast.success(format!("Exported to {}", path.display()));
            }
            AppMessage::Imported(snapshot) => {
                if let Some(leaders) = snapshot.leaders {
                    self.state.leaders = leaders;
                }
                if let Some(tiles) = snapshot.stat_tiles {
                    self.state.stat_tiles = tiles;
                }
                self.toast.success("Data imported");
            }
            AppMessage::Failed { context, error } => {
                warn!("{} failed: {}", context, error);
                if context == REGISTER_CONTEXT {
                    self.registering = false;
                }
                let text = format!("{}: {}", context, error.user_message());
                match error {
                    PodwaveError::Validation(_) => self.toast.warning(text),
                    _ => self.toast.error(text),
                }
            }
        }
        true
    }

    fn handle_tick(&mut self, tick: PlaybackTick) -> bool {
        match self.state.playback.on_tick(tick) {
            TickOutcome::Ignored => false,
            TickOutcome::Advanced(_) => true,
            TickOutcome::Completed => {
                self.toast.success("Episode completed");
                true
            }
        }
    }

    // ── Keyboard handling ─────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // Modals own the keyboard while open.
        let s = &self.state;
        if self.register_form.visible {
            return self.register_form.handle_key(key, s);
        }
        if self.import_prompt.visible {
            return self.import_prompt.handle_key(key, s);
        }
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, s);
        }
        if self.state.input_mode == InputMode::Search {
            return self.explore.handle_key(key, s);
        }
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return vec![];
        }

        // Global keys (Normal mode only)
        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char(c @ '1'..='3') => {
                let idx = (c as u8 - b'1') as usize;
                return Screen::from_index(idx)
                    .map(|s| vec![Action::SwitchScreen(s)])
                    .unwrap_or_default();
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => return vec![Action::PrevScreen],
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => return vec![Action::NextScreen],
            KeyCode::Char('r') => return vec![Action::OpenRegister],
            KeyCode::Char(' ') => return vec![Action::TogglePause],
            KeyCode::Esc => return vec![Action::ClosePlayer],
            KeyCode::Char('t') => return vec![Action::ToggleTheme],
            KeyCode::Char('s') => return vec![Action::Seed],
            KeyCode::Char('e') => return vec![Action::Export],
            KeyCode::Char('i') => return vec![Action::OpenImport],
            KeyCode::Char('x') => return vec![Action::EndSession],
            KeyCode::Char('K') => return vec![Action::ToggleKeys],
            _ => {}
        }

        // Dispatch to the active screen
        match self.state.active_screen {
            Screen::Home => self.home.handle_key(key, s),
            Screen::Explore => self.explore.handle_key(key, s),
            Screen::Library => self.library.handle_key(key, s),
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        if self.register_form.visible || self.import_prompt.visible || self.help_overlay.visible {
            return vec![];
        }
        let (col, row) = (event.column, event.row);
        let areas = self.pane_areas.clone();
        let s = &self.state;

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if hit(areas.header, col, row) {
                    self.swipe.cancel();
                    return self.header.handle_mouse(event, areas.header, s);
                }
                if hit(areas.player, col, row) {
                    self.swipe.cancel();
                    return self.mini_player.handle_mouse(event, areas.player, s);
                }
                if hit(areas.body, col, row) {
                    self.swipe.begin(col);
                    return match s.active_screen {
                        Screen::Home => self.home.handle_mouse(event, areas.body, s),
                        Screen::Explore => self.explore.handle_mouse(event, areas.body, s),
                        Screen::Library => self.library.handle_mouse(event, areas.body, s),
                    };
                }
                vec![]
            }
            MouseEventKind::Up(MouseButton::Left) => self
                .swipe
                .end(col)
                .and_then(|dir| dir.target(s.active_screen))
                .map(|target| vec![Action::SwitchScreen(target)])
                .unwrap_or_default(),
            _ => vec![],
        }
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.home.on_action(&action, s));
            out.extend(self.explore.on_action(&action, s));
            out.extend(self.library.on_action(&action, s));
            out.extend(self.register_form.on_action(&action, s));
            out.extend(self.import_prompt.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Secondary actions are applied directly (one level deep).
        for a in secondary {
            self.apply_action(a);
        }
        self.sync_input_mode();
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Navigation ────────────────────────────────────────────────────
            Action::SwitchScreen(screen) => self.switch_screen(screen),
            Action::NextScreen => {
                if let Some(next) = self.state.active_screen.next() {
                    self.switch_screen(next);
                }
            }
            Action::PrevScreen => {
                if let Some(prev) = self.state.active_screen.prev() {
                    self.switch_screen(prev);
                }
            }

            // ── Filters ───────────────────────────────────────────────────────
            Action::SelectMood(mood) => {
                self.state.filters.mood = mood;
                self.refresh_episodes();
            }
            Action::SearchInput(text) => self.debounce_search(text),

            // ── Episodes ──────────────────────────────────────────────────────
            Action::Play(id) => self.play(id),
            Action::ToggleFavorite(id) => self.toggle_favorite(id),

            // ── Player ────────────────────────────────────────────────────────
            Action::TogglePause => {
                if let Some(st) = self.state.playback.toggle() {
                    debug!("playback now {:?}", st);
                }
            }
            Action::ClosePlayer => self.state.playback.close(),

            // ── Session ───────────────────────────────────────────────────────
            Action::OpenRegister => {
                if let Some(user) = &self.state.user {
                    self.toast
                        .warning(format!("Already registered as {}", user.name));
                    self.register_form.visible = false;
                }
            }
            Action::SubmitRegistration { name, dni } => self.submit_registration(&name, &dni),
            Action::EndSession => self.end_session(),

            // ── Demo data ─────────────────────────────────────────────────────
            Action::Seed => {
                let client = self.client.clone();
                self.spawn_call(
                    "Seed",
                    async move { Ok::<_, PodwaveError>(session::seed_demo_users(&client).await) },
                    AppMessage::Seeded,
                );
            }
            Action::Export => {
                let client = self.client.clone();
                let dir = self.settings.export_dir.clone();
                self.spawn_call(
                    "Export",
                    async move { snapshot::export(&client, &dir).await },
                    AppMessage::Exported,
                );
            }
            Action::Import(path) => {
                self.spawn_call(
                    "Import",
                    async move { snapshot::import(&path).await },
                    AppMessage::Imported,
                );
            }

            // ── UI toggles ────────────────────────────────────────────────────
            Action::ToggleTheme => {
                let theme = self.state.theme.toggled();
                self.state.theme = theme;
                if let Err(e) = prefs::save_theme(&self.settings.prefs_path, theme) {
                    warn!("saving theme: {:#}", e);
                    self.toast.warning("Theme not saved");
                }
            }
            Action::ToggleKeys => self.show_keys_bar = !self.show_keys_bar,
            // Overlays react to these in `on_action`.
            Action::OpenImport | Action::ToggleHelp | Action::CloseOverlay => {}

            Action::Quit => self.should_quit = true,
        }
    }

    // ── Flows ─────────────────────────────────────────────────────────────────

    fn switch_screen(&mut self, screen: Screen) {
        if !self.state.visit(screen) {
            return;
        }
        self.spawn_event(
            EventType::ScreenView,
            None,
            json!({ "screen": screen.name() }),
        );
        if screen == Screen::Library {
            self.refresh_library();
        }
    }

    fn debounce_search(&mut self, text: String) {
        if let Some(h) = self.search_debounce.take() {
            h.abort();
        }
        let tx = self.msg_tx.clone();
        let delay = self.settings.search_debounce;
        self.search_debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppMessage::SearchSettled(text)).await;
        }));
    }

    fn play(&mut self, id: EpisodeId) {
        let Some(ep) = self.state.find_episode(id).cloned() else {
            debug!("play: episode {} not loaded", id);
            return;
        };
        self.state.playback.start(&ep);
        self.state.plays_count += 1;
        self.spawn_event(
            EventType::PlayEpisode,
            Some(ep.id),
            json!({ "episodeId": ep.id, "title": ep.title, "mood": ep.mood }),
        );
        self.toast.success(format!("Playing: {}", ep.title));
    }

    fn toggle_favorite(&mut self, episode_id: EpisodeId) {
        let Some(user) = self.state.user.as_ref() else {
            self.toast.warning("Register first");
            return;
        };
        let client = self.client.clone();
        let user_id = user.id;
        self.spawn_call(
            "Favorite",
            async move {
                client
                    .toggle_favorite(user_id, episode_id)
                    .await
                    .map_err(PodwaveError::from)
            },
            move |active| AppMessage::FavoriteToggled { episode_id, active },
        );
    }

    fn submit_registration(&mut self, name: &str, dni: &str) {
        if let Some(user) = &self.state.user {
            self.toast
                .warning(format!("Already registered as {}", user.name));
            return;
        }
        if self.registering {
            self.toast.info("Registration in progress");
            return;
        }
        let (name, dni) = match session::validate_registration(name, dni) {
            Ok(v) => v,
            Err(e) => {
                self.toast.warning(e.user_message());
                return;
            }
        };
        self.registering = true;
        let client = self.client.clone();
        self.spawn_call(
            REGISTER_CONTEXT,
            async move { session::register(&client, &name, &dni).await },
            |(user, session)| AppMessage::Registered { user, session },
        );
    }

    fn end_session(&mut self) {
        let Some(report) = self.state.session_report() else {
            self.toast.info("No open session");
            return;
        };
        let client = self.client.clone();
        let id = report.session_id;
        self.spawn_call(
            "End session",
            async move { session::end_session(&client, &report).await },
            move |()| AppMessage::SessionEnded(id),
        );
    }

    // ── Refreshes ─────────────────────────────────────────────────────────────

    fn load_initial(&self) {
        let client = self.client.clone();
        self.spawn_call(
            "Channels",
            async move { client.channels().await.map_err(PodwaveError::from) },
            AppMessage::Channels,
        );
        self.refresh_episodes();
    }

    fn refresh_episodes(&self) {
        let client = self.client.clone();
        let mood = self.state.filters.mood.clone();
        self.spawn_call(
            "Episodes",
            async move {
                let episodes = client
                    .episodes(mood.as_deref())
                    .await
                    .map_err(PodwaveError::from)?;
                Ok::<_, PodwaveError>((mood, episodes))
            },
            |(mood, episodes)| AppMessage::Episodes { mood, episodes },
        );
    }

    fn refresh_favorites(&self) {
        let Some(user) = self.state.user.as_ref() else {
            return;
        };
        let client = self.client.clone();
        let user_id = user.id;
        self.spawn_call(
            "Favorites",
            async move { client.favorites(user_id).await.map_err(PodwaveError::from) },
            AppMessage::Favorites,
        );
    }

    fn refresh_leaderboard(&self) {
        let client = self.client.clone();
        self.spawn_call(
            "Leaderboard",
            async move { client.leaderboard().await.map_err(PodwaveError::from) },
            AppMessage::Leaderboard,
        );
    }

    fn refresh_stats(&self) {
        let client = self.client.clone();
        self.spawn_call(
            "Stats",
            async move { client.stats().await.map_err(PodwaveError::from) },
            AppMessage::Stats,
        );
    }

    fn refresh_library(&self) {
        self.refresh_favorites();
        self.refresh_leaderboard();
        self.refresh_stats();
    }

    // ── Task helpers ──────────────────────────────────────────────────────────

    /// Run `fut` on its own task and post the outcome back to the loop.
    fn spawn_call<T, F, M>(&self, context: &'static str, fut: F, on_ok: M)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, PodwaveError>> + Send + 'static,
        M: FnOnce(T) -> AppMessage + Send + 'static,
    {
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let msg = match fut.await {
                Ok(v) => on_ok(v),
                Err(error) => AppMessage::Failed { context, error },
            };
            let _ = tx.send(msg).await;
        });
    }

    /// Fire-and-forget analytics event; skipped when no session is open.
    fn spawn_event(&self, event_type: EventType, episode_id: Option<EpisodeId>, payload: serde_json::Value) {
        let Some(record) = session::event_record(&self.state, event_type, episode_id, payload) else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.log_event(&record).await {
                debug!("event {:?} dropped: {}", record.event_type, e);
            }
        });
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.register_form.visible || self.import_prompt.visible {
            InputMode::Form
        } else if self.explore.search_active() {
            InputMode::Search
        } else {
            InputMode::Normal
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let p = self.state.palette();
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(p.bg)), area);

        let player_h = if self.state.playback.now_playing().is_some() {
            MINI_PLAYER_HEIGHT + 1
        } else {
            0
        };
        let status_h = u16::from(self.show_keys_bar);
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(player_h),
                Constraint::Length(status_h),
            ])
            .split(area);

        self.pane_areas.header = outer[0];
        self.pane_areas.body = outer[1];
        self.header.draw(frame, outer[0], false, &self.state);

        let body = outer[1];
        match self.state.active_screen {
            Screen::Home => self.home.draw(frame, body, true, &self.state),
            Screen::Explore => self.explore.draw(frame, body, true, &self.state),
            Screen::Library => self.library.draw(frame, body, true, &self.state),
        }

        if player_h > 0 {
            let sep = Rect { height: 1, ..outer[2] };
            status_bar::draw_separator(frame, sep, &p);
            let player = Rect {
                y: outer[2].y + 1,
                height: MINI_PLAYER_HEIGHT,
                ..outer[2]
            };
            self.pane_areas.player = player;
            self.mini_player.draw(frame, player, false, &self.state);
        } else {
            self.pane_areas.player = Rect::default();
        }

        if self.show_keys_bar {
            status_bar::draw_keys_bar(
                frame,
                outer[3],
                self.state.input_mode,
                self.state.active_screen,
                &p,
            );
        }

        self.help_overlay.draw(frame, area, false, &self.state);
        self.register_form.draw(frame, area, true, &self.state);
        self.import_prompt.draw(frame, area, true, &self.state);
        self.toast.draw(frame, area, &p);
    }
}

// ── Test hooks ────────────────────────────────────────────────────────────────

#[cfg(test)]
impl App {
    pub(crate) fn apply(&mut self, action: Action) {
        self.dispatch(action);
    }

    pub(crate) fn key(&mut self, key: KeyEvent) {
        self.handle_message(AppMessage::Event(Event::Key(key)));
    }

    pub(crate) fn mouse(&mut self, event: MouseEvent) {
        self.handle_message(AppMessage::Event(Event::Mouse(event)));
    }

    pub(crate) fn set_areas(&mut self, header: Rect, body: Rect) {
        self.pane_areas.header = header;
        self.pane_areas.body = body;
    }

    /// Wait for the next app message, apply it, and return its debug form.
    pub(crate) async fn pump(&mut self) -> String {
        let msg = tokio::time::timeout(Duration::from_secs(5), self.msg_rx.recv())
            .await
            .expect("app message within 5s")
            .expect("app channel open");
        let summary = format!("{:?}", msg);
        self.handle_message(msg);
        summary
    }

    /// True when no app message arrives within `wait`.
    pub(crate) async fn idle_for(&mut self, wait: Duration) -> bool {
        tokio::time::timeout(wait, self.msg_rx.recv()).await.is_err()
    }

    pub(crate) async fn next_tick(&mut self) -> PlaybackTick {
        tokio::time::timeout(Duration::from_secs(5), self.tick_rx.recv())
            .await
            .expect("tick within 5s")
            .expect("tick channel open")
    }

    pub(crate) fn tick(&mut self, tick: PlaybackTick) -> bool {
        self.handle_tick(tick)
    }

    pub(crate) fn latest_toast(&self) -> Option<(&str, crate::widgets::toast::Severity)> {
        self.toast.latest()
    }

    pub(crate) fn quitting(&self) -> bool {
        self.should_quit
    }
}
