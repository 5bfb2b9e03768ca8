//! Completion policy.
//!
//! Decides what happens when a countdown reaches zero:
//! - which mode comes next (short or long break, or back to work)
//! - whether the next countdown starts on its own
//! - which side effects to request (sound, notification, session record)
//!
//! The decision in [`on_complete`] is pure apart from bumping the completed
//! pomodoro counter. Side effects are carried out by [`CompletionPorts`],
//! which isolates each failure so the timer always advances.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::notification::{NotificationContent, NotificationPermission, Notifier};
use crate::sound::{SoundPlayer, SoundSource};
use crate::types::{CompletionEvent, TimerConfig, TimerMode, TimerState};

// ============================================================================
// Decision
// ============================================================================

/// A side effect requested by the completion policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Play the completion sound
    PlaySound {
        /// Volume (0-100)
        volume: u32,
    },
    /// Show a desktop notification
    Notify(NotificationContent),
    /// Hand the completed interval to the session recorder
    RecordSession(CompletionEvent),
}

/// Result of the completion policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Mode the engine switches to
    pub next_mode: TimerMode,
    /// Start the next countdown without user action
    pub auto_start: bool,
    /// Side effects in dispatch order
    pub side_effects: Vec<SideEffect>,
}

/// Applies the completion policy to a finished countdown.
///
/// A finished pomodoro increments the completed count; the long break is
/// chosen from the incremented count, so with an interval of 4 the fourth
/// pomodoro is followed directly by the long break.
pub fn on_complete(
    event: &CompletionEvent,
    state: &mut TimerState,
    config: &TimerConfig,
) -> CompletionOutcome {
    let (next_mode, auto_start) = match event.completed_mode {
        TimerMode::Pomodoro => {
            let completed = state.record_pomodoro();
            let next = if completed % config.long_break_interval == 0 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            };
            (next, config.auto_start_break)
        }
        TimerMode::ShortBreak | TimerMode::LongBreak => {
            (TimerMode::Pomodoro, config.auto_start_pomodoro)
        }
    };

    let mut side_effects = Vec::with_capacity(3);
    if config.sound_enabled {
        side_effects.push(SideEffect::PlaySound {
            volume: config.volume,
        });
    }
    if config.notifications_enabled {
        side_effects.push(SideEffect::Notify(NotificationContent::for_completion(
            event.completed_mode,
            next_mode,
        )));
    }
    side_effects.push(SideEffect::RecordSession(event.clone()));

    CompletionOutcome {
        next_mode,
        auto_start,
        side_effects,
    }
}

// ============================================================================
// CompletionPorts
// ============================================================================

/// Host-supplied implementations of the completion side effects.
///
/// Any port left unset turns its side effect into a no-op.
#[derive(Clone, Default)]
pub struct CompletionPorts {
    sound: Option<(Arc<dyn SoundPlayer>, SoundSource)>,
    notifier: Option<Arc<dyn Notifier>>,
    sessions: Option<mpsc::UnboundedSender<CompletionEvent>>,
}

impl CompletionPorts {
    /// Creates ports with every side effect disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plays `source` through `player` on completion.
    pub fn with_sound(mut self, player: Arc<dyn SoundPlayer>, source: SoundSource) -> Self {
        self.sound = Some((player, source));
        self
    }

    /// Sends completion notifications through `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Forwards completed intervals to the session recorder task.
    pub fn with_sessions(mut self, sessions: mpsc::UnboundedSender<CompletionEvent>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Carries out `effects`.
    ///
    /// Each effect is independent: a failure is logged and the remaining
    /// effects still run. Nothing here waits on the outcome of a call.
    pub fn dispatch(&self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::PlaySound { volume } => self.play_sound(volume),
                SideEffect::Notify(content) => self.notify(content),
                SideEffect::RecordSession(event) => self.record_session(event),
            }
        }
    }

    fn play_sound(&self, volume: u32) {
        let Some((player, source)) = &self.sound else {
            return;
        };
        if !player.is_available() {
            debug!("Sound player unavailable, skipping completion sound");
            return;
        }
        if let Err(e) = player.play(source, volume) {
            warn!("Completion sound failed: {}", e);
        }
    }

    fn notify(&self, content: NotificationContent) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        match notifier.permission() {
            NotificationPermission::Granted => {
                if let Err(e) = notifier.notify(&content) {
                    warn!("Completion notification failed: {}", e);
                }
            }
            NotificationPermission::Undetermined => notifier.request_permission(content),
            NotificationPermission::Denied => {
                debug!("Notifications denied, skipping");
            }
        }
    }

    fn record_session(&self, event: CompletionEvent) {
        let Some(sessions) = &self.sessions else {
            return;
        };
        if sessions.send(event).is_err() {
            warn!("Session recorder is not running; completed interval not recorded");
        }
    }
}

impl std::fmt::Debug for CompletionPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionPorts")
            .field("sound", &self.sound.as_ref().map(|(_, source)| source))
            .field("notifier", &self.notifier.is_some())
            .field("sessions", &self.sessions.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
