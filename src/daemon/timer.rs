//! Timer engine for the Pomodoro Timer.
//!
//! This module provides the core timer functionality:
//! - State transitions (Idle → Running ⇄ Paused, reset, mode switch)
//! - One-second countdown steps driven by the runner
//! - Synchronous completion handling through the completion policy
//! - Auto-start scheduling with a cancellable grace delay
//!
//! The engine never sleeps and never spawns: the runner decides when a
//! second has elapsed and when a scheduled auto-start is due.

use chrono::{Duration as ChronoDuration, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{debug, info};

use crate::types::{CompletionEvent, TaskId, TimerConfig, TimerMode, TimerSnapshot, TimerState};

use super::duration::resolve_duration;
use super::policy::{on_complete, CompletionPorts};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events published for displays and external integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started {
        /// Mode of the countdown
        mode: TimerMode,
        /// True when resuming from pause
        resumed: bool,
    },
    /// Countdown paused
    Paused {
        /// Remaining seconds
        seconds_remaining: u32,
    },
    /// Current mode re-armed at full duration
    Reset {
        /// Mode that was re-armed
        mode: TimerMode,
    },
    /// Mode changed, by the user or after a completion
    ModeSwitched {
        /// New mode
        mode: TimerMode,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        seconds_remaining: u32,
    },
    /// Countdown reached zero
    Completed(CompletionEvent),
    /// The next countdown will start after a grace delay
    AutoStartScheduled {
        /// Mode that will start
        mode: TimerMode,
        /// Grace delay in milliseconds
        delay_ms: u64,
    },
    /// A scheduled auto-start was cancelled by a manual command
    AutoStartCancelled,
}

// ============================================================================
// TimerError
// ============================================================================

/// Rejected timer transitions. Neither variant changes any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    /// `start` while the countdown is already running
    #[error("timer is already running")]
    AlreadyRunning,

    /// `pause` while the countdown is not running
    #[error("timer is not running")]
    NotRunning,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns the timer state.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Configuration used for the next duration lookup
    config: TimerConfig,
    /// Completion side effects
    ports: CompletionPorts,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Grace delay of a scheduled auto-start
    pending_auto_start: Option<Duration>,
}

impl TimerEngine {
    /// Creates an engine armed for a pomodoro.
    ///
    /// `config` must already be validated.
    pub fn new(
        config: TimerConfig,
        ports: CompletionPorts,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let seconds = resolve_duration(TimerMode::Pomodoro, &config);
        Self {
            state: TimerState::new(TimerMode::Pomodoro, seconds),
            config,
            ports,
            event_tx,
            pending_auto_start: None,
        }
    }

    /// Starts or resumes the countdown.
    ///
    /// Cancels a scheduled auto-start.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::AlreadyRunning` if the countdown is running.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.state.is_running() {
            return Err(TimerError::AlreadyRunning);
        }
        self.cancel_auto_start();
        self.begin();
        Ok(())
    }

    /// Pauses the countdown, keeping the remaining time.
    ///
    /// While idle with an auto-start scheduled, cancels the auto-start
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotRunning` if there is nothing to pause.
    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.state.is_running() {
            self.state.pause();
            debug!("Paused at {}s", self.state.seconds_remaining());
            self.emit(TimerEvent::Paused {
                seconds_remaining: self.state.seconds_remaining(),
            });
            return Ok(());
        }
        if self.cancel_auto_start() {
            return Ok(());
        }
        Err(TimerError::NotRunning)
    }

    /// Re-arms the current mode at its full duration and goes idle.
    ///
    /// Leaves the completed pomodoro count untouched.
    pub fn reset(&mut self) {
        self.cancel_auto_start();
        let mode = self.state.mode();
        self.state
            .switch_mode(mode, resolve_duration(mode, &self.config));
        debug!("Reset {} to {}s", mode, self.state.seconds_remaining());
        self.emit(TimerEvent::Reset { mode });
    }

    /// Switches to `mode` at its full duration and goes idle.
    ///
    /// A manual switch never counts as a completion.
    pub fn switch_mode(&mut self, mode: TimerMode) {
        self.cancel_auto_start();
        self.arm(mode);
    }

    /// Advances the countdown by one elapsed second.
    ///
    /// When the countdown reaches zero, the completion is handled before
    /// this returns: the policy runs, side effects are dispatched, the next
    /// mode is armed and any auto-start is scheduled. `task` is the task
    /// selected by the host at that moment.
    ///
    /// Returns the completion event, if this second finished the countdown.
    pub fn tick(&mut self, task: Option<&TaskId>) -> Option<CompletionEvent> {
        if !self.state.is_running() {
            return None;
        }

        let finished = self.state.tick();
        self.emit(TimerEvent::Tick {
            seconds_remaining: self.state.seconds_remaining(),
        });
        if !finished {
            return None;
        }

        let ended_at = Utc::now();
        let planned = self.state.planned_seconds();
        let started_at = self
            .state
            .take_started_at()
            .unwrap_or_else(|| ended_at - ChronoDuration::seconds(i64::from(planned)));
        let event = CompletionEvent {
            completed_mode: self.state.mode(),
            started_at,
            ended_at,
            planned_duration_seconds: planned,
            associated_task_id: task.cloned(),
        };
        info!("{} complete", event.completed_mode);
        self.emit(TimerEvent::Completed(event.clone()));

        let outcome = on_complete(&event, &mut self.state, &self.config);
        self.ports.dispatch(outcome.side_effects);
        self.arm(outcome.next_mode);

        if outcome.auto_start {
            self.schedule_auto_start();
        }

        Some(event)
    }

    /// Replaces the configuration.
    ///
    /// The current countdown is not rescaled; new durations apply from the
    /// next reset, mode switch or completion. `config` must already be
    /// validated.
    pub fn update_config(&mut self, config: TimerConfig) {
        debug!("Configuration updated");
        self.config = config;
    }

    /// Clears the completed pomodoro count.
    pub fn reset_completed_pomodoros(&mut self) {
        self.state.clear_completed_pomodoros();
    }

    /// Returns the grace delay of the scheduled auto-start, if any.
    pub fn pending_auto_start(&self) -> Option<Duration> {
        self.pending_auto_start
    }

    /// Starts the countdown scheduled by the last completion.
    ///
    /// Returns false if the auto-start was cancelled in the meantime.
    pub fn fire_auto_start(&mut self) -> bool {
        if self.pending_auto_start.take().is_none() || self.state.is_running() {
            return false;
        }
        self.begin();
        true
    }

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the display read model.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&self.state)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }

    fn begin(&mut self) {
        let resumed = self.state.is_paused();
        self.state.start(Utc::now());
        let mode = self.state.mode();
        debug!(
            "{} {} at {}s",
            if resumed { "Resumed" } else { "Started" },
            mode,
            self.state.seconds_remaining()
        );
        self.emit(TimerEvent::Started { mode, resumed });
    }

    fn arm(&mut self, mode: TimerMode) {
        self.state.switch_mode(mode, resolve_duration(mode, &self.config));
        debug!("Switched to {} ({}s)", mode, self.state.seconds_remaining());
        self.emit(TimerEvent::ModeSwitched { mode });
    }

    fn schedule_auto_start(&mut self) {
        let delay_ms = self.config.auto_start_delay_ms;
        if delay_ms == 0 {
            self.begin();
            return;
        }
        self.pending_auto_start = Some(Duration::from_millis(delay_ms));
        self.emit(TimerEvent::AutoStartScheduled {
            mode: self.state.mode(),
            delay_ms,
        });
    }

    /// Returns true if an auto-start was pending.
    fn cancel_auto_start(&mut self) -> bool {
        if self.pending_auto_start.take().is_none() {
            return false;
        }
        debug!("Auto-start cancelled");
        self.emit(TimerEvent::AutoStartCancelled);
        true
    }

    fn emit(&self, event: TimerEvent) {
        // Nobody listening is fine.
        if self.event_tx.send(event).is_err() {
            debug!("Timer event dropped: no receiver");
        }
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("pending_auto_start", &self.pending_auto_start)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
