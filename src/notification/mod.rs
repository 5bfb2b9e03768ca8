//! Desktop notification support.
//!
//! Completion notifications go through the [`Notifier`] port so the
//! completion dispatcher can apply the permission rules without knowing
//! the platform:
//!
//! - `Granted`: the notification is shown
//! - `Undetermined`: permission is requested; the notification is shown
//!   only if the request is granted, and the timer never waits for it
//! - `Denied`: silently skipped
//!
//! # Example
//!
//! ```rust,no_run
//! use pomofocus::notification::{DesktopNotifier, NotificationContent, Notifier};
//! use pomofocus::types::TimerMode;
//!
//! let notifier = DesktopNotifier::detect();
//! let content = NotificationContent::for_completion(TimerMode::Pomodoro, TimerMode::ShortBreak);
//! let _ = notifier.notify(&content);
//! ```

mod content;
mod desktop;
pub mod error;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub use self::content::{NotificationContent, NOTIFICATION_TITLE};
pub use self::desktop::DesktopNotifier;
pub use self::error::NotificationError;

/// Whether the user allows desktop notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Not yet asked.
    Undetermined,
}

/// Port for desktop notification backends.
pub trait Notifier: Send + Sync {
    /// Returns the current permission state.
    fn permission(&self) -> NotificationPermission;

    /// Asks the user for permission and shows `pending` if it is granted.
    ///
    /// Must not block on the user's answer.
    fn request_permission(&self, pending: NotificationContent);

    /// Shows a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    fn notify(&self, content: &NotificationContent) -> Result<(), NotificationError>;
}

/// Mock notifier for testing.
#[derive(Debug)]
pub struct MockNotifier {
    permission: Mutex<NotificationPermission>,
    grant_on_request: AtomicBool,
    should_fail: AtomicBool,
    permission_requests: AtomicUsize,
    sent: Mutex<Vec<NotificationContent>>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    /// Creates a mock with permission already granted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            permission: Mutex::new(NotificationPermission::Granted),
            grant_on_request: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
            permission_requests: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_permission(&self, permission: NotificationPermission) {
        *self.permission.lock().unwrap() = permission;
    }

    /// Sets the answer given to the next permission request.
    pub fn set_grant_on_request(&self, grant: bool) {
        self.grant_on_request.store(grant, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn permission_request_count(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn sent(&self) -> Vec<NotificationContent> {
        self.sent.lock().unwrap().clone()
    }

    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Notifier for MockNotifier {
    fn permission(&self) -> NotificationPermission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&self, pending: NotificationContent) {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        let answer = if self.grant_on_request.load(Ordering::SeqCst) {
            NotificationPermission::Granted
        } else {
            NotificationPermission::Denied
        };
        self.set_permission(answer);
        if answer == NotificationPermission::Granted {
            let _ = self.notify(&pending);
        }
    }

    fn notify(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        if self.permission() != NotificationPermission::Granted {
            return Err(NotificationError::PermissionDenied);
        }
        self.sent.lock().unwrap().push(content.clone());
        Ok(())
    }
}
