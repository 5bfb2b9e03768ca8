//! Display utilities for the Pomodoro Timer CLI.
//!
//! This module provides formatted output for:
//! - Command results and status
//! - Session history and task progress
//! - Settings
//! - Error messages

use std::collections::BTreeMap;

use crate::daemon::SessionRecord;
use crate::types::{format_clock, IpcResponse, ResponseData, TimerConfig, TimerStatus};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the result of a timer command.
    ///
    /// Falls back to a description of the new status when the daemon sent
    /// no message (e.g. for `toggle`).
    pub fn show_command_result(response: &IpcResponse) {
        println!("{}", Self::render_command_result(response));
    }

    /// Shows the current timer status.
    pub fn show_status(response: &IpcResponse) {
        println!("{}", Self::render_status(response));
    }

    /// Shows completed sessions, oldest first, followed by task totals.
    pub fn show_history(records: &[SessionRecord], progress: &BTreeMap<String, u32>) {
        println!("{}", Self::render_history(records, progress));
    }

    /// Shows the settings.
    pub fn show_settings(config: &TimerConfig) {
        println!("{}", Self::render_settings(config));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    fn render_command_result(response: &IpcResponse) -> String {
        let headline = match (&response.data, response.message.is_empty()) {
            (_, false) => response.message.clone(),
            (Some(data), true) => match data.status {
                Some(TimerStatus::Running) => "Timer running".to_string(),
                Some(TimerStatus::Paused) => "Timer paused".to_string(),
                _ => "Timer idle".to_string(),
            },
            (None, true) => "OK".to_string(),
        };

        match response.data.as_ref().and_then(Self::clock_line) {
            Some(line) => format!("{}\n  {}", headline, line),
            None => headline,
        }
    }

    fn render_status(response: &IpcResponse) -> String {
        let Some(data) = &response.data else {
            return "Timer is not running".to_string();
        };

        let mut lines = vec!["Pomodoro Timer".to_string(), "─".repeat(24)];
        if let Some(mode) = data.mode {
            lines.push(format!("Mode:      {}", mode));
        }
        if let Some(status) = data.status {
            lines.push(format!("Status:    {}", status));
        }
        if let Some(seconds) = data.seconds_remaining {
            lines.push(format!("Remaining: {}", format_clock(seconds)));
        }
        if let Some(count) = data.completed_pomodoros {
            lines.push(format!("Completed: {}", count));
        }
        if let Some(task) = &data.task_id {
            lines.push(format!("Task:      {}", task));
        }
        lines.join("\n")
    }

    fn render_history(records: &[SessionRecord], progress: &BTreeMap<String, u32>) -> String {
        if records.is_empty() {
            return "No completed sessions yet".to_string();
        }

        let mut lines = Vec::with_capacity(records.len() + progress.len() + 2);
        for record in records {
            let ended = record.ended_at.with_timezone(&chrono::Local);
            let mut line = format!(
                "{}  {:<11}  {}",
                ended.format("%Y-%m-%d %H:%M"),
                record.mode.label(),
                format_clock(record.seconds)
            );
            if let Some(task) = &record.task_id {
                line.push_str("  ");
                line.push_str(task.as_str());
            }
            lines.push(line);
        }

        if !progress.is_empty() {
            lines.push(String::new());
            lines.push("Pomodoros per task:".to_string());
            for (task, count) in progress {
                lines.push(format!("  {}: {}", task, count));
            }
        }
        lines.join("\n")
    }

    fn render_settings(config: &TimerConfig) -> String {
        let on_off = |flag: bool| if flag { "on" } else { "off" };
        [
            format!("Pomodoro:            {} min", config.pomodoro_minutes),
            format!("Short break:         {} min", config.short_break_minutes),
            format!("Long break:          {} min", config.long_break_minutes),
            format!("Long break interval: {}", config.long_break_interval),
            format!("Auto-start breaks:   {}", on_off(config.auto_start_break)),
            format!("Auto-start pomodoro: {}", on_off(config.auto_start_pomodoro)),
            format!("Auto-start delay:    {} ms", config.auto_start_delay_ms),
            format!("Sound:               {}", on_off(config.sound_enabled)),
            format!("Volume:              {}", config.volume),
            format!("Notifications:       {}", on_off(config.notifications_enabled)),
        ]
        .join("\n")
    }

    fn clock_line(data: &ResponseData) -> Option<String> {
        let mode = data.mode?;
        let seconds = data.seconds_remaining?;
        Some(format!("{} {}", mode, format_clock(seconds)))
    }
}

// ============================================================================
// Tests
// ============================================================================
