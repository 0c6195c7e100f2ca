//! User-facing notifications.
//!
//! Anything the user should see about the outcome of a request (a rejected
//! input, a failed upload, a finished batch) is delivered through a
//! [`Notifier`] handed to the service client and the orchestrators at
//! construction time. The CLI prints them, library consumers can route them
//! anywhere, and tests assert on them with [`MockNotifier`].

use colored::Colorize;
use mockall::automock;
use std::fmt::{Display, Formatter};
use strum::Display as StrumDisplay;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// A transient message for the user, the equivalent of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Receives every notification produced while talking to the service.
///
/// Implementations must be cheap and must not block; they are called inline
/// on the request path.
#[automock]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications to the console through tracing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                info!(target: "always", "{} {}", "✔".green().bold(), notification.message)
            }
            NotificationKind::Info => {
                info!(target: "always", "{} {}", "ℹ".blue().bold(), notification.message)
            }
            NotificationKind::Error => {
                error!(target: "always", "{} {}", "✘".red().bold(), notification.message)
            }
        }
    }
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _notification: Notification) {}
}
