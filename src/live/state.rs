use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{config::SyncConfig, status::StatusUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncMode {
    /// Local tick scrambles through the attack pool.
    Looping,
    /// Server-declared static display.
    Fixed,
    /// Terminal. Reached at the event deadline and never left.
    Ended,
}

/// Outcome of applying one status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    EnteredFixed,
    EnteredLooping,
    /// The state is terminal; only connectivity and label were refreshed.
    Ignored,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    pub mode: SyncMode,
    pub displayed_text: String,
    pub event_label: String,
    pub is_connected: bool,
}

/// Authoritative per-widget state. Pure: timers and I/O live in the actor.
#[derive(Debug, Clone)]
pub struct SyncState {
    mode: SyncMode,
    attack_pool: Vec<String>,
    displayed_text: String,
    is_connected: bool,
    last_known_server_text: Option<String>,
    event_label: String,
    rng: StdRng,
}

impl SyncState {
    pub fn new(config: &SyncConfig, now: DateTime<Utc>) -> Self {
        Self::with_rng(config, now, StdRng::from_entropy())
    }

    pub fn with_rng(config: &SyncConfig, now: DateTime<Utc>, rng: StdRng) -> Self {
        let attack_pool = config.initial_pool();
        let (mode, displayed_text) = match config.pinned_attack.as_deref() {
            Some(pinned) => (SyncMode::Fixed, pinned.to_string()),
            None => (SyncMode::Looping, attack_pool[0].clone()),
        };

        let mut state = Self {
            mode,
            attack_pool,
            displayed_text,
            is_connected: false,
            last_known_server_text: None,
            event_label: config.event_label.clone(),
            rng,
        };

        if let Some(deadline) = config.event_deadline {
            if deadline <= now {
                info!(%deadline, "event deadline already passed at start");
                state.mode = SyncMode::Ended;
            }
        }
        state
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn is_ended(&self) -> bool {
        self.mode == SyncMode::Ended
    }

    pub fn attack_pool(&self) -> &[String] {
        &self.attack_pool
    }

    pub fn displayed_text(&self) -> &str {
        &self.displayed_text
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn last_known_server_text(&self) -> Option<&str> {
        self.last_known_server_text.as_deref()
    }

    pub fn event_label(&self) -> &str {
        &self.event_label
    }

    /// Local scramble tick. Only has an effect while looping.
    pub fn tick(&mut self) -> bool {
        if self.mode != SyncMode::Looping {
            return false;
        }
        let index = self.rng.gen_range(0..self.attack_pool.len());
        let next = &self.attack_pool[index];
        if *next == self.displayed_text {
            return false;
        }
        self.displayed_text = next.clone();
        true
    }

    pub fn apply_update(&mut self, update: StatusUpdate) -> Transition {
        self.is_connected = true;
        if let Some(label) = update.event_label.clone() {
            self.event_label = label;
        }

        if self.is_ended() {
            debug!("status update after end, mode is frozen");
            return Transition::Ignored;
        }

        if let Some(text) = update.fixed_text() {
            self.last_known_server_text = Some(text.to_string());
        }

        if let Some(attacks) = update.attacks.clone() {
            // 빈 목록은 StatusUpdate 단계에서 이미 걸러진다
            if attacks != self.attack_pool {
                debug!(size = attacks.len(), "attack pool replaced by server");
                self.attack_pool = attacks;
            }
        }

        let wants_looping = update.is_looping.unwrap_or(self.mode == SyncMode::Looping);
        match (self.mode, wants_looping) {
            (SyncMode::Looping, false) => {
                if let Some(text) = update.fixed_text() {
                    self.displayed_text = text.to_string();
                }
                info!(text = %self.displayed_text, "switching to fixed display");
                self.mode = SyncMode::Fixed;
                Transition::EnteredFixed
            }
            (SyncMode::Fixed, true) => {
                info!("resuming looping display");
                self.mode = SyncMode::Looping;
                self.keep_text_in_pool();
                Transition::EnteredLooping
            }
            (SyncMode::Fixed, false) => {
                if let Some(text) = update.fixed_text() {
                    if text != self.displayed_text {
                        self.displayed_text = text.to_string();
                    }
                }
                Transition::Unchanged
            }
            _ => {
                self.keep_text_in_pool();
                Transition::Unchanged
            }
        }
    }

    /// Both endpoints failed. The last-known-good display stays on screen.
    pub fn mark_disconnected(&mut self) {
        if self.is_connected {
            warn!("status endpoints unreachable, keeping last known state");
        }
        self.is_connected = false;
    }

    /// One-way transition to `Ended`. Returns `false` if already ended.
    pub fn end(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        info!(text = %self.displayed_text, "event deadline reached, widget ended");
        self.mode = SyncMode::Ended;
        true
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            mode: self.mode,
            displayed_text: self.displayed_text.clone(),
            event_label: self.event_label.clone(),
            is_connected: self.is_connected,
        }
    }

    fn keep_text_in_pool(&mut self) {
        if self.mode == SyncMode::Looping && !self.attack_pool.contains(&self.displayed_text) {
            let index = self.rng.gen_range(0..self.attack_pool.len());
            self.displayed_text = self.attack_pool[index].clone();
        }
    }
}
