//! User-visible notifications raised after an update attempt.

use serde::Serialize;
use tracing::{info, warn};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A single notification shown to the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

/// Sink for success/error notifications.
pub trait Notifier {
    fn success(&mut self, title: &str, message: &str);
    fn error(&mut self, title: &str, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn success(&mut self, title: &str, message: &str) {
        (**self).success(title, message);
    }

    fn error(&mut self, title: &str, message: &str) {
        (**self).error(title, message);
    }
}

/// Writes notifications to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&mut self, title: &str, message: &str) {
        info!(title, message, "Notification");
    }

    fn error(&mut self, title: &str, message: &str) {
        warn!(title, message, "Notification");
    }
}

/// Records notifications so they can be returned to the client.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct NotificationLog {
    notifications: Vec<Notification>,
}

impl NotificationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    #[must_use]
    pub fn last(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Notification> {
        self.notifications
    }

    fn push(&mut self, level: NotificationLevel, title: &str, message: &str) {
        self.notifications.push(Notification {
            level,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

impl Notifier for NotificationLog {
    fn success(&mut self, title: &str, message: &str) {
        TracingNotifier.success(title, message);
        self.push(NotificationLevel::Success, title, message);
    }

    fn error(&mut self, title: &str, message: &str) {
        TracingNotifier.error(title, message);
        self.push(NotificationLevel::Error, title, message);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_log_records_in_order() {
        let mut log = NotificationLog::new();
        log.error("Error", "first");
        log.success("Success", "second");

        assert_eq!(log.notifications().len(), 2);
        assert_eq!(log.notifications()[0].level, NotificationLevel::Error);
        assert_eq!(log.last().unwrap().message, "second");
    }

    #[test]
    fn test_log_through_mut_reference() {
        fn notify<N: Notifier>(mut sink: N) {
            sink.success("Success", "saved");
        }

        let mut log = NotificationLog::new();
        notify(&mut log);
        assert_eq!(log.into_inner().len(), 1);
    }

    #[test]
    fn test_log_serializes_as_array() {
        let mut log = NotificationLog::new();
        log.success("Success", "saved");

        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"level": "success", "title": "Success", "message": "saved"}])
        );
    }
}
