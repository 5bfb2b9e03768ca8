//! Maps a timer mode to its configured countdown length.

use crate::types::{TimerConfig, TimerMode};

/// Returns the full countdown length of `mode` in seconds.
pub fn resolve_duration(mode: TimerMode, config: &TimerConfig) -> u32 {
    let minutes = match mode {
        TimerMode::Pomodoro => config.pomodoro_minutes,
        TimerMode::ShortBreak => config.short_break_minutes,
        TimerMode::LongBreak => config.long_break_minutes,
    };
    minutes * 60
}
