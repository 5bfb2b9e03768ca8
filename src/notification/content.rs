//! Notification content construction.

use crate::types::TimerMode;

/// Title shown on every completion notification.
pub const NOTIFICATION_TITLE: &str = "Pomodoro Timer";

/// Maximum length for notification text.
const MAX_TEXT_LENGTH: usize = 200;

/// Title and body of a desktop notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    /// Creates notification content, stripping control characters and
    /// truncating overly long text.
    #[must_use]
    pub fn new(title: impl AsRef<str>, body: impl AsRef<str>) -> Self {
        Self {
            title: sanitize(title.as_ref()),
            body: sanitize(body.as_ref()),
        }
    }

    /// Content announcing the end of a countdown.
    ///
    /// `next_mode` is the mode the timer switched to and selects which
    /// break a finished pomodoro leads into.
    #[must_use]
    pub fn for_completion(completed: TimerMode, next_mode: TimerMode) -> Self {
        match completed {
            TimerMode::Pomodoro => Self::pomodoro_complete(next_mode),
            TimerMode::ShortBreak | TimerMode::LongBreak => Self::break_complete(),
        }
    }

    /// Content shown when a pomodoro finishes.
    #[must_use]
    pub fn pomodoro_complete(next_break: TimerMode) -> Self {
        let kind = if next_break == TimerMode::LongBreak {
            "long"
        } else {
            "short"
        };
        Self::new(
            NOTIFICATION_TITLE,
            format!("Pomodoro complete! Time for a {} break.", kind),
        )
    }

    /// Content shown when a break finishes.
    #[must_use]
    pub fn break_complete() -> Self {
        Self::new(
            NOTIFICATION_TITLE,
            "Break complete! Ready for another Pomodoro?",
        )
    }
}

fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .take(MAX_TEXT_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pomodoro_complete_short_break() {
        let content = NotificationContent::for_completion(TimerMode::Pomodoro, TimerMode::ShortBreak);
        assert_eq!(content.title, "Pomodoro Timer");
        assert_eq!(content.body, "Pomodoro complete! Time for a short break.");
    }

    #[test]
    fn test_pomodoro_complete_long_break() {
        let content = NotificationContent::for_completion(TimerMode::Pomodoro, TimerMode::LongBreak);
        assert_eq!(content.body, "Pomodoro complete! Time for a long break.");
    }

    #[test]
    fn test_break_complete() {
        for mode in [TimerMode::ShortBreak, TimerMode::LongBreak] {
            let content = NotificationContent::for_completion(mode, TimerMode::Pomodoro);
            assert_eq!(content.body, "Break complete! Ready for another Pomodoro?");
        }
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        let content = NotificationContent::new("a\nb", "c\td\u{7}");
        assert_eq!(content.title, "ab");
        assert_eq!(content.body, "cd");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "x".repeat(500);
        let content = NotificationContent::new("t", long);
        assert_eq!(content.body.chars().count(), MAX_TEXT_LENGTH);
    }
}
