//! User-facing notification sink.
//!
//! The tracker reports reminders, prayer arrivals and warnings through the
//! [`Notifier`] trait. Delivery is fire-and-forget: implementations never
//! report failure back to the caller.
//!
//! - [`DesktopNotifier`]: native desktop notifications via `notify-rust`,
//!   downgrading to log output if the notification service is unavailable
//! - [`LogNotifier`]: log output only (headless environments)
//! - [`MockNotifier`]: records messages for tests

mod desktop;

use std::sync::Mutex;

use tracing::{info, warn};

pub use desktop::DesktopNotifier;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Reminders and prayer arrivals
    Info,
    /// Problems the user may want to act on (e.g. missing audio file)
    Warning,
}

/// Accepts plain notification messages.
pub trait Notifier: Send + Sync {
    /// Shows a message to the user without waiting for delivery.
    fn notify(&self, level: NotificationLevel, message: &str);

    /// Shows an informational message.
    fn info(&self, message: &str) {
        self.notify(NotificationLevel::Info, message);
    }

    /// Shows a warning message.
    fn warning(&self, message: &str) {
        self.notify(NotificationLevel::Warning, message);
    }
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Info => info!("[通知] {}", message),
            NotificationLevel::Warning => warn!("[警告] {}", message),
        }
    }
}

/// Mock notifier for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    notifications: Mutex<Vec<(NotificationLevel, String)>>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded notification in delivery order.
    #[must_use]
    pub fn get_notifications(&self) -> Vec<(NotificationLevel, String)> {
        self.notifications.lock().unwrap().clone()
    }

    /// Returns the recorded messages of one level.
    #[must_use]
    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    pub fn clear_recorded(&self) {
        self.notifications.lock().unwrap().clear();
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_notifier_records_in_order() {
        let mock = MockNotifier::new();
        mock.info("first");
        mock.warning("second");

        assert_eq!(
            mock.get_notifications(),
            vec![
                (NotificationLevel::Info, "first".to_string()),
                (NotificationLevel::Warning, "second".to_string()),
            ]
        );
        assert_eq!(mock.messages(NotificationLevel::Warning), vec!["second"]);
    }

    #[test]
    fn test_mock_notifier_clear() {
        let mock = MockNotifier::new();
        mock.info("x");
        mock.clear_recorded();
        assert_eq!(mock.notification_count(), 0);
    }

    #[test]
    fn test_log_notifier_does_not_panic() {
        LogNotifier.info("reminder");
        LogNotifier.warning("warning");
    }
}
