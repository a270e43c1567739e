//! Short-lived user notifications

use chrono::{DateTime, Duration, Utc};

/// How long a notification stays visible
pub const DISPLAY_SECONDS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Info,
        }
    }
}

/// Holds the latest notification; a new one replaces the old
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    current: Option<(Notification, DateTime<Utc>)>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, notification: Notification, now: DateTime<Utc>) {
        self.current = Some((notification, now));
    }

    /// The visible notification, if its window has not passed
    pub fn current(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|(_, shown)| now - *shown < Duration::seconds(DISPLAY_SECONDS))
            .map(|(n, _)| n)
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
