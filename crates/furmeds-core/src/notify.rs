//! Blocking user notifications
//!
//! Failures that abort an operation (network, auth, device permission)
//! are surfaced through a [`Notifier`]. The screen decides what state to
//! keep; the notifier only tells the user.

use std::fmt;

use tracing::warn;

use crate::error::FurMedsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub header: String,
    pub sub_header: Option<String>,
    pub message: String,
}

impl Notification {
    pub fn new(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sub_header: None,
            message: message.into(),
        }
    }

    pub fn with_sub_header(mut self, sub_header: impl Into<String>) -> Self {
        self.sub_header = Some(sub_header.into());
        self
    }

    /// Notification for an operation that failed with `err`
    pub fn request_failed(action: &str, err: &FurMedsError) -> Self {
        Self::new("Error", err.to_string()).with_sub_header(action.to_string())
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        if let Some(sub) = &self.sub_header {
            write!(f, " ({})", sub)?;
        }
        write!(f, ": {}", self.message)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that only writes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        warn!(
            header = %notification.header,
            sub_header = ?notification.sub_header,
            message = %notification.message,
            "User notification"
        );
    }
}
