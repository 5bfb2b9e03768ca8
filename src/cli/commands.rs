//! Command definitions for the Pomodoro Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::{TimerConfig, TimerMode};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomofocus - a headless Pomodoro timer
#[derive(Parser, Debug)]
#[command(
    name = "pomofocus",
    version,
    about = "Headless Pomodoro timer daemon and CLI",
    long_about = "A Pomodoro timer that runs as a background daemon.\n\
                  Control it from the command line, get a sound and a desktop notification \
                  when an interval ends, and keep a history of completed sessions.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start or resume the countdown
    Start,

    /// Pause the countdown
    Pause,

    /// Pause when running, start otherwise
    Toggle,

    /// Restart the current mode at its full duration
    Reset,

    /// Switch to another mode (stops the countdown)
    Mode {
        /// Mode to switch to
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Select the task completed pomodoros count towards
    Task {
        /// Task identifier; omit to clear the selection
        #[arg(value_parser = validate_task_id)]
        id: Option<String>,
    },

    /// Show current timer status
    Status,

    /// Make the daemon re-read the settings file
    Reload,

    /// Reset the completed pomodoro count to zero
    Clear,

    /// Run the timer daemon in the foreground
    Daemon {
        /// Print timer events and read shortcuts from stdin
        /// (space: start/pause, r: reset, 1/2/3: switch mode)
        #[arg(short, long)]
        interactive: bool,
    },

    /// Show recently completed sessions
    History {
        /// Number of sessions to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Show or change the settings file
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Timer modes as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Pomodoro,
    #[value(alias = "short")]
    ShortBreak,
    #[value(alias = "long")]
    LongBreak,
}

impl From<ModeArg> for TimerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pomodoro => TimerMode::Pomodoro,
            ModeArg::ShortBreak => TimerMode::ShortBreak,
            ModeArg::LongBreak => TimerMode::LongBreak,
        }
    }
}

/// `settings` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Print the current settings
    Show,
    /// Print the settings file path
    Path,
    /// Change one or more settings
    Set(SetArgs),
}

// ============================================================================
// Settings Arguments
// ============================================================================

/// Arguments for `settings set`. Unset flags keep their current value.
#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Pomodoro duration in minutes (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub pomodoro: Option<u32>,

    /// Short break duration in minutes (1-30)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=30))]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub long_break: Option<u32>,

    /// Pomodoros before a long break (2-10)
    #[arg(long, value_parser = clap::value_parser!(u32).range(2..=10))]
    pub long_break_interval: Option<u32>,

    /// Start breaks automatically
    #[arg(long)]
    pub auto_start_break: Option<bool>,

    /// Start pomodoros automatically after a break
    #[arg(long)]
    pub auto_start_pomodoro: Option<bool>,

    /// Play a sound when an interval ends
    #[arg(long)]
    pub sound: Option<bool>,

    /// Show a desktop notification when an interval ends
    #[arg(long)]
    pub notifications: Option<bool>,

    /// Sound volume (0-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub volume: Option<u32>,

    /// Delay before an automatic start, in milliseconds
    #[arg(long)]
    pub auto_start_delay_ms: Option<u64>,
}

impl SetArgs {
    /// Returns true if no flag was given.
    pub fn is_empty(&self) -> bool {
        self.pomodoro.is_none()
            && self.short_break.is_none()
            && self.long_break.is_none()
            && self.long_break_interval.is_none()
            && self.auto_start_break.is_none()
            && self.auto_start_pomodoro.is_none()
            && self.sound.is_none()
            && self.notifications.is_none()
            && self.volume.is_none()
            && self.auto_start_delay_ms.is_none()
    }

    /// Applies the given flags on top of `config`.
    pub fn apply(&self, mut config: TimerConfig) -> TimerConfig {
        if let Some(v) = self.pomodoro {
            config.pomodoro_minutes = v;
        }
        if let Some(v) = self.short_break {
            config.short_break_minutes = v;
        }
        if let Some(v) = self.long_break {
            config.long_break_minutes = v;
        }
        if let Some(v) = self.long_break_interval {
            config.long_break_interval = v;
        }
        if let Some(v) = self.auto_start_break {
            config.auto_start_break = v;
        }
        if let Some(v) = self.auto_start_pomodoro {
            config.auto_start_pomodoro = v;
        }
        if let Some(v) = self.sound {
            config.sound_enabled = v;
        }
        if let Some(v) = self.notifications {
            config.notifications_enabled = v;
        }
        if let Some(v) = self.volume {
            config.volume = v;
        }
        if let Some(v) = self.auto_start_delay_ms {
            config.auto_start_delay_ms = v;
        }
        config
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a task identifier.
///
/// - Must not be empty
/// - Must not exceed 100 characters
fn validate_task_id(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("task id must not be empty".to_string());
    }
    if s.chars().count() > 100 {
        return Err("task id must be at most 100 characters".to_string());
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================
