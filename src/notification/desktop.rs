//! Desktop notifications through `notify-rust`.
//!
//! On Linux and the BSDs this talks to the freedesktop notification server
//! over D-Bus; on macOS it goes through the native notification center.

use notify_rust::Notification;
use tracing::{debug, warn};

use super::content::NotificationContent;
use super::error::NotificationError;
use super::{NotificationPermission, Notifier};

/// Application name shown alongside each notification.
const APP_NAME: &str = "pomofocus";

/// Notifier backed by the platform notification service.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    available: bool,
}

impl DesktopNotifier {
    /// Checks whether a notification service is reachable on this host.
    #[must_use]
    pub fn detect() -> Self {
        let available = server_available();
        if available {
            debug!("Desktop notification service available");
        } else {
            warn!("No desktop notification service found; notifications disabled");
        }
        Self { available }
    }

    /// Returns true if a notification service was found.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    fn build(content: &NotificationContent) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(&content.title)
            .body(&content.body)
            .appname(APP_NAME);
        notification
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn server_available() -> bool {
    match notify_rust::get_server_information() {
        Ok(info) => {
            debug!("Notification server: {} {}", info.name, info.version);
            true
        }
        Err(e) => {
            debug!("Notification server unreachable: {}", e);
            false
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn server_available() -> bool {
    true
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> NotificationPermission {
        if self.available {
            NotificationPermission::Granted
        } else {
            NotificationPermission::Denied
        }
    }

    fn request_permission(&self, pending: NotificationContent) {
        // The platform service has no separate consent step to drive.
        if self.available {
            if let Err(e) = self.notify(&pending) {
                warn!("Notification failed after permission request: {}", e);
            }
        }
    }

    fn notify(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        if !self.available {
            return Err(NotificationError::NotAvailable);
        }

        Self::build(content)
            .show()
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        debug!("Notification sent: {}", content.body);
        Ok(())
    }
}
