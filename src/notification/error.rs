//! Notification system error types.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Notification permission was denied by the user.
    #[error("notification permission denied")]
    PermissionDenied,

    /// Failed to send a notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// No notification backend exists on this host.
    #[error("no notification backend available")]
    NotAvailable,
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "allow notifications for your terminal in system settings",
            Self::SendFailed(_) => "check that the notification daemon is running",
            Self::NotAvailable => "start a desktop notification daemon (for example dunst or mako)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NotificationError::PermissionDenied.to_string(),
            "notification permission denied"
        );
        let err = NotificationError::SendFailed("exit status 1".to_string());
        assert!(err.to_string().contains("exit status 1"));
    }

    #[test]
    fn test_is_permission_error() {
        assert!(NotificationError::PermissionDenied.is_permission_error());
        assert!(!NotificationError::NotAvailable.is_permission_error());
    }

    #[test]
    fn test_suggestion() {
        assert!(NotificationError::NotAvailable
            .suggestion()
            .contains("notification daemon"));
    }
}
