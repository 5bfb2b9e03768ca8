//! Core data types for the Pomodoro timer.
//!
//! This module defines the data structures used for:
//! - Timer modes, run status and the engine-owned state
//! - Timer configuration with boundary validation
//! - Completion events handed to the session recorder
//! - The display read model and IPC request/response serialization

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// TimerMode
// ============================================================================

/// Which interval type the timer currently targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    /// Focused work interval
    Pomodoro,
    /// Short break between pomodoros
    ShortBreak,
    /// Long break inserted every `long_break_interval` pomodoros
    LongBreak,
}

impl TimerMode {
    /// All modes in shortcut order (`1`, `2`, `3`).
    pub const ALL: [TimerMode; 3] = [
        TimerMode::Pomodoro,
        TimerMode::ShortBreak,
        TimerMode::LongBreak,
    ];

    /// Returns the wire representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Pomodoro => "pomodoro",
            TimerMode::ShortBreak => "shortBreak",
            TimerMode::LongBreak => "longBreak",
        }
    }

    /// Returns the human-readable label of the mode.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Pomodoro => "Pomodoro",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    /// Returns true for either break mode.
    pub fn is_break(&self) -> bool {
        matches!(self, TimerMode::ShortBreak | TimerMode::LongBreak)
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Pomodoro
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// TimerStatus
// ============================================================================

/// Run state of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Countdown armed at its full duration (or finished)
    Idle,
    /// Counting down once per second
    Running,
    /// Countdown suspended, remaining time retained
    Paused,
}

impl TimerStatus {
    /// Returns the wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        }
    }
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Idle
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Errors raised when a configuration fails boundary validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric setting is outside its allowed range.
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// Setting name as it appears in the settings file
        field: &'static str,
        /// Inclusive lower bound
        min: u32,
        /// Inclusive upper bound
        max: u32,
        /// Offending value
        value: u32,
    },
}

/// Timer configuration, owned by the host and read-only to the engine.
///
/// Serialized in camelCase so the settings file matches the settings
/// payload used by the web client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerConfig {
    /// Pomodoro duration in minutes (1-60)
    pub pomodoro_minutes: u32,
    /// Short break duration in minutes (1-30)
    pub short_break_minutes: u32,
    /// Long break duration in minutes (1-60)
    pub long_break_minutes: u32,
    /// Completed pomodoros before a long break replaces a short one (2-10)
    pub long_break_interval: u32,
    /// Start the next pomodoro automatically after a break
    pub auto_start_pomodoro: bool,
    /// Start the next break automatically after a pomodoro
    pub auto_start_break: bool,
    /// Play a sound on completion
    pub sound_enabled: bool,
    /// Show a desktop notification on completion
    pub notifications_enabled: bool,
    /// Playback volume (0-100)
    pub volume: u32,
    /// Grace delay before an automatic start, in milliseconds
    pub auto_start_delay_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            pomodoro_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
            auto_start_pomodoro: false,
            auto_start_break: false,
            sound_enabled: true,
            notifications_enabled: true,
            volume: 50,
            auto_start_delay_ms: 1000,
        }
    }
}

impl TimerConfig {
    /// Returns the configuration with the given pomodoro duration.
    pub fn with_pomodoro_minutes(mut self, minutes: u32) -> Self {
        self.pomodoro_minutes = minutes;
        self
    }

    /// Returns the configuration with the given short break duration.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = minutes;
        self
    }

    /// Returns the configuration with the given long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Returns the configuration with the given long break interval.
    pub fn with_long_break_interval(mut self, interval: u32) -> Self {
        self.long_break_interval = interval;
        self
    }

    /// Validates the configuration.
    ///
    /// The engine assumes validated input, so every entry point that accepts
    /// a configuration from outside (settings file, IPC, CLI) calls this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("pomodoroMinutes", self.pomodoro_minutes, 1, 60)?;
        check_range("shortBreakMinutes", self.short_break_minutes, 1, 30)?;
        check_range("longBreakMinutes", self.long_break_minutes, 1, 60)?;
        check_range("longBreakInterval", self.long_break_interval, 2, 10)?;
        check_range("volume", self.volume, 0, 100)?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

// ============================================================================
// TaskId
// ============================================================================

/// Identifier of a task held by the host; opaque to the timer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// CompletionEvent
// ============================================================================

/// Produced exactly once per countdown reaching zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    /// Mode whose countdown finished
    pub completed_mode: TimerMode,
    /// When the interval was first started
    pub started_at: DateTime<Utc>,
    /// When the countdown reached zero
    pub ended_at: DateTime<Utc>,
    /// Full length of the countdown that finished
    pub planned_duration_seconds: u32,
    /// Task selected when the interval finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_task_id: Option<TaskId>,
}

// ============================================================================
// TimerState
// ============================================================================

/// State owned exclusively by the timer engine.
///
/// Fields are read through accessors; mutation is crate-internal and goes
/// through [`crate::daemon::TimerEngine`]. It is never deserialized, so
/// callers cannot build one from outside:
///
/// ```compile_fail
/// let state: pomofocus::types::TimerState = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TimerState {
    mode: TimerMode,
    status: TimerStatus,
    seconds_remaining: u32,
    completed_pomodoros: u32,
    /// Full length of the current countdown
    planned_seconds: u32,
    started_at: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Creates an idle state armed for `mode` with `seconds` on the clock.
    pub fn new(mode: TimerMode, seconds: u32) -> Self {
        Self {
            mode,
            status: TimerStatus::Idle,
            seconds_remaining: seconds,
            completed_pomodoros: 0,
            planned_seconds: seconds,
            started_at: None,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn completed_pomodoros(&self) -> u32 {
        self.completed_pomodoros
    }

    pub fn planned_seconds(&self) -> u32 {
        self.planned_seconds
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns true if the countdown is running.
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Returns true if the countdown is paused.
    pub fn is_paused(&self) -> bool {
        self.status == TimerStatus::Paused
    }

    /// Arms `mode` at its full duration and goes idle.
    pub(crate) fn switch_mode(&mut self, mode: TimerMode, seconds: u32) {
        self.mode = mode;
        self.status = TimerStatus::Idle;
        self.seconds_remaining = seconds;
        self.planned_seconds = seconds;
        self.started_at = None;
    }

    /// Starts or resumes the countdown.
    ///
    /// The interval start time is kept across pause/resume.
    pub(crate) fn start(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.status = TimerStatus::Running;
    }

    pub(crate) fn pause(&mut self) {
        if self.is_running() {
            self.status = TimerStatus::Paused;
        }
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true when this tick reached zero; the state is then idle at
    /// zero. Has no effect unless running.
    pub(crate) fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        if self.seconds_remaining <= 1 {
            self.seconds_remaining = 0;
            self.status = TimerStatus::Idle;
            return true;
        }
        self.seconds_remaining -= 1;
        false
    }

    /// Counts one more finished pomodoro and returns the new total.
    pub(crate) fn record_pomodoro(&mut self) -> u32 {
        self.completed_pomodoros += 1;
        self.completed_pomodoros
    }

    pub(crate) fn clear_completed_pomodoros(&mut self) {
        self.completed_pomodoros = 0;
    }

    pub(crate) fn take_started_at(&mut self) -> Option<DateTime<Utc>> {
        self.started_at.take()
    }

    #[cfg(test)]
    pub(crate) fn set_seconds_remaining(&mut self, seconds: u32) {
        self.seconds_remaining = seconds;
    }

    #[cfg(test)]
    pub(crate) fn set_completed_pomodoros(&mut self, count: u32) {
        self.completed_pomodoros = count;
    }
}

// ============================================================================
// Read model
// ============================================================================

/// Display-facing view of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub status: TimerStatus,
    pub seconds_remaining: u32,
    pub completed_pomodoros: u32,
}

impl TimerSnapshot {
    /// Returns the remaining time as `mm:ss`.
    pub fn clock(&self) -> String {
        format_clock(self.seconds_remaining)
    }
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            mode: state.mode,
            status: state.status,
            seconds_remaining: state.seconds_remaining,
            completed_pomodoros: state.completed_pomodoros,
        }
    }
}

/// Formats seconds as zero-padded `mm:ss`.
///
/// Minutes are not wrapped at 60, so 3600 seconds renders as `60:00`.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// IPC Types
// ============================================================================

/// IPC request from client to daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum IpcRequest {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Pause when running, start otherwise
    Toggle,
    /// Re-arm the current mode at its full duration
    Reset,
    /// Switch to another mode
    Mode {
        /// Target mode
        mode: TimerMode,
    },
    /// Select or clear the current task
    Task {
        /// Task to attribute completed pomodoros to
        #[serde(rename = "taskId", default, skip_serializing_if = "Option::is_none")]
        task_id: Option<TaskId>,
    },
    /// Query the current status
    Status,
    /// Reload settings from disk
    Reload,
    /// Reset the completed pomodoro count to zero
    Clear,
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    /// Current mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TimerMode>,
    /// Current status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TimerStatus>,
    /// Remaining seconds
    #[serde(rename = "secondsRemaining", skip_serializing_if = "Option::is_none")]
    pub seconds_remaining: Option<u32>,
    /// Completed pomodoro count
    #[serde(rename = "completedPomodoros", skip_serializing_if = "Option::is_none")]
    pub completed_pomodoros: Option<u32>,
    /// Currently selected task
    #[serde(rename = "taskId", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
}

impl ResponseData {
    /// Creates response data from a snapshot and the current task.
    pub fn from_snapshot(snapshot: &TimerSnapshot, task_id: Option<TaskId>) -> Self {
        Self {
            mode: Some(snapshot.mode),
            status: Some(snapshot.status),
            seconds_remaining: Some(snapshot.seconds_remaining),
            completed_pomodoros: Some(snapshot.completed_pomodoros),
            task_id,
        }
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// Returns true for an error response.
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // TimerMode / TimerStatus Tests
    // ------------------------------------------------------------------------

    mod mode_tests {
        use super::*;

        #[test]
        fn test_default_mode_is_pomodoro() {
            assert_eq!(TimerMode::default(), TimerMode::Pomodoro);
            assert_eq!(TimerStatus::default(), TimerStatus::Idle);
        }

        #[test]
        fn test_mode_wire_names() {
            for mode in TimerMode::ALL {
                let json = serde_json::to_string(&mode).unwrap();
                assert_eq!(json, format!("\"{}\"", mode.as_str()));
            }
        }

        #[test]
        fn test_mode_labels() {
            assert_eq!(TimerMode::Pomodoro.to_string(), "Pomodoro");
            assert_eq!(TimerMode::ShortBreak.to_string(), "Short Break");
            assert_eq!(TimerMode::LongBreak.to_string(), "Long Break");
        }

        #[test]
        fn test_is_break() {
            assert!(!TimerMode::Pomodoro.is_break());
            assert!(TimerMode::ShortBreak.is_break());
            assert!(TimerMode::LongBreak.is_break());
        }

        #[test]
        fn test_status_serializes_lowercase() {
            let json = serde_json::to_string(&TimerStatus::Running).unwrap();
            assert_eq!(json, "\"running\"");
        }
    }

    // ------------------------------------------------------------------------
    // TimerConfig Tests
    // ------------------------------------------------------------------------

    mod config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = TimerConfig::default();
            assert_eq!(config.pomodoro_minutes, 25);
            assert_eq!(config.short_break_minutes, 5);
            assert_eq!(config.long_break_minutes, 15);
            assert_eq!(config.long_break_interval, 4);
            assert!(!config.auto_start_pomodoro);
            assert!(!config.auto_start_break);
            assert!(config.sound_enabled);
            assert!(config.notifications_enabled);
            assert_eq!(config.volume, 50);
            assert_eq!(config.auto_start_delay_ms, 1000);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_builder_pattern() {
            let config = TimerConfig::default()
                .with_pomodoro_minutes(50)
                .with_short_break_minutes(10)
                .with_long_break_minutes(30)
                .with_long_break_interval(3);

            assert_eq!(config.pomodoro_minutes, 50);
            assert_eq!(config.short_break_minutes, 10);
            assert_eq!(config.long_break_minutes, 30);
            assert_eq!(config.long_break_interval, 3);
        }

        #[test]
        fn test_validate_boundary_values() {
            let config = TimerConfig {
                pomodoro_minutes: 1,
                short_break_minutes: 1,
                long_break_minutes: 1,
                long_break_interval: 2,
                volume: 0,
                ..TimerConfig::default()
            };
            assert!(config.validate().is_ok());

            let config = TimerConfig {
                pomodoro_minutes: 60,
                short_break_minutes: 30,
                long_break_minutes: 60,
                long_break_interval: 10,
                volume: 100,
                ..TimerConfig::default()
            };
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_validate_rejects_zero_durations() {
            for config in [
                TimerConfig::default().with_pomodoro_minutes(0),
                TimerConfig::default().with_short_break_minutes(0),
                TimerConfig::default().with_long_break_minutes(0),
            ] {
                assert!(config.validate().is_err());
            }
        }

        #[test]
        fn test_validate_rejects_upper_bounds() {
            assert!(TimerConfig::default()
                .with_pomodoro_minutes(61)
                .validate()
                .is_err());
            assert!(TimerConfig::default()
                .with_short_break_minutes(31)
                .validate()
                .is_err());
            assert!(TimerConfig::default()
                .with_long_break_minutes(61)
                .validate()
                .is_err());
            let loud = TimerConfig {
                volume: 101,
                ..TimerConfig::default()
            };
            assert!(loud.validate().is_err());
        }

        #[test]
        fn test_validate_rejects_degenerate_interval() {
            for interval in [0, 1, 11] {
                let err = TimerConfig::default()
                    .with_long_break_interval(interval)
                    .validate()
                    .unwrap_err();
                assert_eq!(
                    err,
                    ConfigError::OutOfRange {
                        field: "longBreakInterval",
                        min: 2,
                        max: 10,
                        value: interval,
                    }
                );
            }
        }

        #[test]
        fn test_error_message_names_field() {
            let err = TimerConfig::default()
                .with_pomodoro_minutes(0)
                .validate()
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "pomodoroMinutes must be between 1 and 60 (got 0)"
            );
        }

        #[test]
        fn test_deserialize_camel_case_with_defaults() {
            let json = r#"{"pomodoroMinutes": 30, "autoStartBreak": true}"#;
            let config: TimerConfig = serde_json::from_str(json).unwrap();
            assert_eq!(config.pomodoro_minutes, 30);
            assert!(config.auto_start_break);
            assert_eq!(config.short_break_minutes, 5);
            assert_eq!(config.long_break_interval, 4);
        }
    }

    // ------------------------------------------------------------------------
    // TimerState Tests
    // ------------------------------------------------------------------------

    mod timer_state_tests {
        use super::*;

        fn state() -> TimerState {
            TimerState::new(TimerMode::Pomodoro, 1500)
        }

        #[test]
        fn test_new_state() {
            let state = state();
            assert_eq!(state.mode(), TimerMode::Pomodoro);
            assert_eq!(state.status(), TimerStatus::Idle);
            assert_eq!(state.seconds_remaining(), 1500);
            assert_eq!(state.planned_seconds(), 1500);
            assert_eq!(state.completed_pomodoros(), 0);
            assert!(state.started_at().is_none());
        }

        #[test]
        fn test_tick_ignored_unless_running() {
            let mut state = state();
            assert!(!state.tick());
            assert_eq!(state.seconds_remaining(), 1500);

            state.start(Utc::now());
            state.pause();
            assert!(!state.tick());
            assert_eq!(state.seconds_remaining(), 1500);
        }

        #[test]
        fn test_tick_reaches_zero_and_goes_idle() {
            let mut state = TimerState::new(TimerMode::ShortBreak, 2);
            state.start(Utc::now());

            assert!(!state.tick());
            assert_eq!(state.seconds_remaining(), 1);

            assert!(state.tick());
            assert_eq!(state.seconds_remaining(), 0);
            assert_eq!(state.status(), TimerStatus::Idle);
        }

        #[test]
        fn test_start_keeps_first_start_time_across_pause() {
            let mut state = state();
            let first = Utc::now();
            state.start(first);
            state.pause();
            state.start(first + chrono::Duration::seconds(30));
            assert_eq!(state.started_at(), Some(first));
        }

        #[test]
        fn test_switch_mode_rearms_and_clears_start() {
            let mut state = state();
            state.start(Utc::now());
            state.set_seconds_remaining(900);

            state.switch_mode(TimerMode::LongBreak, 900);

            assert_eq!(state.mode(), TimerMode::LongBreak);
            assert_eq!(state.status(), TimerStatus::Idle);
            assert_eq!(state.seconds_remaining(), 900);
            assert!(state.started_at().is_none());
        }

        #[test]
        fn test_record_pomodoro_returns_new_total() {
            let mut state = state();
            assert_eq!(state.record_pomodoro(), 1);
            assert_eq!(state.record_pomodoro(), 2);
            state.clear_completed_pomodoros();
            assert_eq!(state.completed_pomodoros(), 0);
        }
    }

    // ------------------------------------------------------------------------
    // Read model Tests
    // ------------------------------------------------------------------------

    mod read_model_tests {
        use super::*;

        #[test]
        fn test_format_clock() {
            assert_eq!(format_clock(0), "00:00");
            assert_eq!(format_clock(59), "00:59");
            assert_eq!(format_clock(300), "05:00");
            assert_eq!(format_clock(1485), "24:45");
            assert_eq!(format_clock(3600), "60:00");
        }

        #[test]
        fn test_snapshot_from_state() {
            let state = TimerState::new(TimerMode::ShortBreak, 300);
            let snapshot = TimerSnapshot::from(&state);
            assert_eq!(snapshot.mode, TimerMode::ShortBreak);
            assert_eq!(snapshot.status, TimerStatus::Idle);
            assert_eq!(snapshot.clock(), "05:00");
        }
    }

    // ------------------------------------------------------------------------
    // IPC Type Tests
    // ------------------------------------------------------------------------

    mod ipc_tests {
        use super::*;

        #[test]
        fn test_request_wire_format() {
            let json = serde_json::to_string(&IpcRequest::Mode {
                mode: TimerMode::LongBreak,
            })
            .unwrap();
            assert_eq!(json, r#"{"command":"mode","mode":"longBreak"}"#);

            let json = serde_json::to_string(&IpcRequest::Status).unwrap();
            assert_eq!(json, r#"{"command":"status"}"#);

            let request: IpcRequest = serde_json::from_str(r#"{"command":"clear"}"#).unwrap();
            assert_eq!(request, IpcRequest::Clear);
        }

        #[test]
        fn test_task_request_without_id_clears() {
            let request: IpcRequest = serde_json::from_str(r#"{"command":"task"}"#).unwrap();
            assert_eq!(request, IpcRequest::Task { task_id: None });

            let request: IpcRequest =
                serde_json::from_str(r#"{"command":"task","taskId":"t-1"}"#).unwrap();
            assert_eq!(
                request,
                IpcRequest::Task {
                    task_id: Some(TaskId::new("t-1"))
                }
            );
        }

        #[test]
        fn test_response_data_from_snapshot() {
            let snapshot = TimerSnapshot {
                mode: TimerMode::Pomodoro,
                status: TimerStatus::Running,
                seconds_remaining: 42,
                completed_pomodoros: 3,
            };
            let data = ResponseData::from_snapshot(&snapshot, Some(TaskId::new("a")));
            assert_eq!(data.seconds_remaining, Some(42));
            assert_eq!(data.completed_pomodoros, Some(3));
            assert_eq!(data.task_id, Some(TaskId::new("a")));
        }

        #[test]
        fn test_error_response_has_no_data() {
            let response = IpcResponse::error("boom");
            assert!(response.is_error());
            assert!(response.data.is_none());

            let json = serde_json::to_string(&response).unwrap();
            assert!(!json.contains("data"));
        }
    }
}
