//! Simulated playback: a progress percentage driven by a one-second tick.
//!
//! ```text
//!  Idle ──start──▶ Playing ◀──toggle──▶ Paused
//!                     │
//!                  100% │            close (any state) ──▶ Idle
//!                     ▼
//!                 Completed ──toggle──▶ Playing (from 0%)
//! ```
//!
//! The simulator owns at most one `TickTimer`. Arming always drops the old
//! one first, and every arm bumps the generation so that a tick already
//! queued by a cancelled timer is recognised as stale and ignored.

use std::time::Duration;

use podwave_proto::protocol::{Episode, EpisodeId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One tick from the timer armed under `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTick(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub episode_id: EpisodeId,
    pub title: String,
    pub channel: String,
    pub emoji: String,
    pub total_seconds: u32,
    pub elapsed_percent: f64,
    elapsed_ticks: u32,
}

impl NowPlaying {
    fn from_episode(ep: &Episode) -> Self {
        Self {
            episode_id: ep.id,
            title: ep.title.clone(),
            channel: ep.channel_name.clone(),
            emoji: ep.cover().to_string(),
            total_seconds: ep.duration_secs(),
            elapsed_percent: 0.0,
            elapsed_ticks: 0,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.total_seconds as f64 * self.elapsed_percent / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Stale generation, or not playing.
    Ignored,
    Advanced(f64),
    Completed,
}

/// Handle to the spawned ticker task. Dropping it cancels the task.
struct TickTimer {
    handle: JoinHandle<()>,
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct PlaybackSimulator {
    state: PlaybackState,
    now_playing: Option<NowPlaying>,
    timer: Option<TickTimer>,
    generation: u64,
    period: Duration,
    tick_tx: mpsc::Sender<PlaybackTick>,
}

impl PlaybackSimulator {
    pub fn new(tick_tx: mpsc::Sender<PlaybackTick>) -> Self {
        Self::with_period(tick_tx, TICK_PERIOD)
    }

    pub fn with_period(tick_tx: mpsc::Sender<PlaybackTick>, period: Duration) -> Self {
        Self {
            state: PlaybackState::Idle,
            now_playing: None,
            timer: None,
            generation: 0,
            period,
            tick_tx,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    /// Displayed progress, 0..=100. Zero when nothing is loaded.
    /// Playing or paused. A completed episode stays loaded but is not active.
    pub fn is_active(&self) -> bool {
        matches!(self.state, PlaybackState::Playing | PlaybackState::Paused)
    }

    pub fn progress(&self) -> f64 {
        self.now_playing
            .as_ref()
            .map(|n| n.elapsed_percent)
            .unwrap_or(0.0)
    }

    #[cfg(test)]
    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace whatever was playing with `episode`, from 0%.
    pub fn start(&mut self, episode: &Episode) {
        self.disarm();
        self.now_playing = Some(NowPlaying::from_episode(episode));
        self.state = PlaybackState::Playing;
        self.arm();
        debug!("playback: start {} ({}s)", episode.id, episode.duration_secs());
    }

    /// Pause ⇄ resume. A completed episode restarts from 0%.
    /// Returns the new state, or `None` when nothing is loaded.
    pub fn toggle(&mut self) -> Option<PlaybackState> {
        let np = self.now_playing.as_mut()?;
        match self.state {
            PlaybackState::Playing => {
                self.disarm();
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
                self.arm();
            }
            PlaybackState::Completed => {
                np.elapsed_percent = 0.0;
                np.elapsed_ticks = 0;
                self.state = PlaybackState::Playing;
                self.arm();
            }
            PlaybackState::Idle => return None,
        }
        Some(self.state)
    }

    pub fn close(&mut self) {
        self.disarm();
        self.now_playing = None;
        self.state = PlaybackState::Idle;
    }

    pub fn on_tick(&mut self, tick: PlaybackTick) -> TickOutcome {
        if tick.0 != self.generation || self.state != PlaybackState::Playing {
            return TickOutcome::Ignored;
        }
        let Some(np) = self.now_playing.as_mut() else {
            return TickOutcome::Ignored;
        };
        // Each tick is worth 100 / total_seconds percent, derived from the
        // tick count so the final tick lands exactly on 100.
        let total = np.total_seconds.max(1);
        np.elapsed_ticks += 1;
        np.elapsed_percent = f64::from(np.elapsed_ticks) * 100.0 / f64::from(total);
        if np.elapsed_ticks >= total {
            np.elapsed_percent = 100.0;
            self.disarm();
            self.state = PlaybackState::Completed;
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced(np.elapsed_percent)
        }
    }

    fn arm(&mut self) {
        self.disarm();
        self.generation += 1;
        let generation = self.generation;
        let period = self.period;
        let tx = self.tick_tx.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(PlaybackTick(generation)).await.is_err() {
                    break;
                }
            }
        });
        self.timer = Some(TickTimer { handle });
    }

    fn disarm(&mut self) {
        self.timer = None;
    }
}
