//! Action enum: every user intent the App knows how to apply.

use std::path::PathBuf;

use podwave_proto::protocol::EpisodeId;

/// One of the three top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Screen {
    Home,
    Explore,
    Library,
}

impl Screen {
    /// Fixed order used by tabs, digit keys and swipes.
    pub const ORDER: [Screen; 3] = [Screen::Home, Screen::Explore, Screen::Library];

    pub fn index(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Explore => 1,
            Self::Library => 2,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ORDER.get(idx).copied()
    }

    /// The screen after this one, if any. No wrap-around.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The screen before this one, if any. No wrap-around.
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Name used for analytics and the backend's `screenName`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Explore => "explore",
            Self::Library => "library",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Explore => "Explore",
            Self::Library => "Library",
        }
    }
}

/// All actions that can flow through the system.
/// Components produce Actions; the App applies them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    SwitchScreen(Screen),
    NextScreen,
    PrevScreen,

    // ── Catalogue filters ────────────────────────────────────────────────────
    /// `None` is the "All" chip.
    SelectMood(Option<String>),
    /// Raw search text after a keystroke; applied once the debounce settles.
    SearchInput(String),

    // ── Episodes ─────────────────────────────────────────────────────────────
    Play(EpisodeId),
    ToggleFavorite(EpisodeId),

    // ── Player ───────────────────────────────────────────────────────────────
    TogglePause,
    ClosePlayer,

    // ── Session ──────────────────────────────────────────────────────────────
    OpenRegister,
    SubmitRegistration { name: String, dni: String },
    EndSession,

    // ── Demo data ────────────────────────────────────────────────────────────
    Seed,
    Export,
    OpenImport,
    Import(PathBuf),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleTheme,
    ToggleHelp,
    ToggleKeys,
    CloseOverlay,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
