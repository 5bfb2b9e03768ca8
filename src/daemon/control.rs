//! Control adapter.
//!
//! Maps external commands onto timer engine operations and holds the
//! currently selected task on behalf of the host. Keyboard shortcuts are
//! translated here too, with a guard that leaves keys alone while the user
//! is typing.

use thiserror::Error;

use crate::types::{ConfigError, TaskId, TimerConfig, TimerMode, TimerSnapshot};

use super::timer::{TimerEngine, TimerError};

/// Discrete commands accepted by the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    /// Pause when running, start otherwise
    Toggle,
    Reset,
    SwitchMode(TimerMode),
    /// Select a task, or clear the selection with `None`
    SelectTask(Option<TaskId>),
    /// Clear the completed pomodoro count
    ClearCompleted,
    /// Replace the configuration (validated before it is applied)
    UpdateConfig(TimerConfig),
    /// Read-only status query
    Status,
}

/// Errors returned when a command cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Where keyboard input is currently going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    /// A text field has focus; keys belong to it
    TextEntry,
    /// Anything else
    Other,
}

/// Translates a single key press into a timer command.
///
/// | Key | Command |
/// |-----|---------|
/// | Space | toggle start/pause |
/// | `r` | reset |
/// | `1` / `2` / `3` | Pomodoro / Short Break / Long Break |
///
/// Returns `None` for unbound keys and for every key while a text field
/// has focus.
pub fn command_for_key(key: char, focus: InputFocus) -> Option<Command> {
    if focus == InputFocus::TextEntry {
        return None;
    }
    match key {
        ' ' => Some(Command::Toggle),
        'r' | 'R' => Some(Command::Reset),
        '1' => Some(Command::SwitchMode(TimerMode::Pomodoro)),
        '2' => Some(Command::SwitchMode(TimerMode::ShortBreak)),
        '3' => Some(Command::SwitchMode(TimerMode::LongBreak)),
        _ => None,
    }
}

/// Timer read model plus the selected task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub snapshot: TimerSnapshot,
    pub task_id: Option<TaskId>,
}

/// Applies commands to an engine.
#[derive(Debug, Default)]
pub struct ControlAdapter {
    current_task: Option<TaskId>,
}

impl ControlAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the currently selected task.
    pub fn current_task(&self) -> Option<&TaskId> {
        self.current_task.as_ref()
    }

    /// Applies `command` to `engine` and reports the resulting status.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the transition or the
    /// configuration is out of range. Rejected commands change nothing.
    pub fn apply(
        &mut self,
        engine: &mut TimerEngine,
        command: Command,
    ) -> Result<StatusReport, ControlError> {
        match command {
            Command::Start => engine.start()?,
            Command::Pause => engine.pause()?,
            Command::Toggle => {
                if engine.state().is_running() {
                    engine.pause()?;
                } else {
                    engine.start()?;
                }
            }
            Command::Reset => engine.reset(),
            Command::SwitchMode(mode) => engine.switch_mode(mode),
            Command::SelectTask(task) => self.current_task = task,
            Command::ClearCompleted => engine.reset_completed_pomodoros(),
            Command::UpdateConfig(config) => {
                config.validate()?;
                engine.update_config(config);
            }
            Command::Status => {}
        }
        Ok(self.report(engine))
    }

    /// Returns the status of `engine` with the selected task.
    pub fn report(&self, engine: &TimerEngine) -> StatusReport {
        StatusReport {
            snapshot: engine.snapshot(),
            task_id: self.current_task.clone(),
        }
    }
}
