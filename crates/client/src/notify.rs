//! User-facing notifications and navigation.
//!
//! The request core reports failures and session expiry through these two
//! seams instead of printing or redirecting itself. The CLI logs them; tests
//! record them.

use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

/// A transient message for the user (a toast in a GUI shell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Receives notifications raised by the client.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Knows where the user is and can send them elsewhere.
pub trait Navigator: Send + Sync {
    /// Current location, as a path with query string.
    fn current_location(&self) -> String;

    /// Moves the user to `path`.
    fn redirect(&self, path: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Info => info!("{}: {}", notification.title, notification.message),
            NotificationKind::Warning => {
                warn!("{}: {}", notification.title, notification.message)
            }
            NotificationKind::Error => {
                error!("{}: {}", notification.title, notification.message)
            }
        }
    }
}

/// Keeps every notification it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}

/// A navigator with a fixed current location that remembers redirects.
///
/// The CLI has no router, so a redirect to the login view is logged as a
/// hint to sign in again.
#[derive(Debug, Clone)]
pub struct StaticNavigator {
    location: String,
    redirects: Arc<Mutex<Vec<String>>>,
}

impl StaticNavigator {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            redirects: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for StaticNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for StaticNavigator {
    fn current_location(&self) -> String {
        self.location.clone()
    }

    fn redirect(&self, path: &str) {
        warn!(target = path, "Redirecting to login");
        if let Ok(mut redirects) = self.redirects.lock() {
            redirects.push(path.to_string());
        }
    }
}
