use std::time::{Duration, Instant};

/// How long a notification stays on screen without being replaced.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient status line. Only one is shown at a time; posting a new one
/// replaces whatever was there, so the operator always sees the latest
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    level: NotificationLevel,
    message: String,
    shown_at: Instant,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn level(&self) -> NotificationLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= NOTIFICATION_TTL
    }
}
