//! Native desktop notifications via `notify-rust`.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use notify_rust::Notification;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{NotificationLevel, Notifier};

/// Application name shown by the notification service.
const APP_NAME: &str = "Prayer Reminder";

/// How long to stay on log output after a delivery failure.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

type Pending = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;

/// Sends one notification to the notification service.
type Delivery = fn(Notification) -> Pending;

/// Suspension window opened by a failed delivery.
#[derive(Debug, Default)]
struct Backoff {
    suspended_until: Mutex<Option<Instant>>,
}

impl Backoff {
    /// Returns true while the window is open; clears it once it has elapsed.
    fn is_suspended(&self, now: Instant) -> bool {
        let mut until = self
            .suspended_until
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match *until {
            Some(deadline) if now < deadline => true,
            Some(_) => {
                debug!("通知サービスへの送信を再開します");
                *until = None;
                false
            }
            None => false,
        }
    }

    fn suspend(&self, now: Instant, retry_after: Duration) {
        *self
            .suspended_until
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(now + retry_after);
    }
}

/// Desktop notifier that falls back to logging.
///
/// Delivery runs on a spawned task, so `notify` never waits on the
/// notification service. A failed delivery switches to log output for
/// `retry_after`, after which the service is tried again.
#[derive(Debug)]
pub struct DesktopNotifier {
    backoff: Arc<Backoff>,
    retry_after: Duration,
    delivery: Delivery,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        debug!("デスクトップ通知を初期化しました (notify-rust)");
        Self::with_delivery(deliver)
    }

    fn with_delivery(delivery: Delivery) -> Self {
        Self {
            backoff: Arc::new(Backoff::default()),
            retry_after: DEFAULT_RETRY_AFTER,
            delivery,
        }
    }

    /// Overrides how long log output is used after a failure.
    #[must_use]
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// Returns true while deliveries are skipped after a failure.
    #[must_use]
    pub fn is_backend_suspended(&self) -> bool {
        self.backoff.is_suspended(Instant::now())
    }

    fn summary(level: NotificationLevel) -> &'static str {
        match level {
            NotificationLevel::Info => APP_NAME,
            NotificationLevel::Warning => "Prayer Reminder: Warning",
        }
    }

    fn build(level: NotificationLevel, message: &str) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(Self::summary(level))
            .body(message);
        notification
    }

    fn log(level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Info => info!("[通知] {}", message),
            NotificationLevel::Warning => warn!("[警告] {}", message),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        if self.backoff.is_suspended(Instant::now()) {
            Self::log(level, message);
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("非同期ランタイムがないため通知をログに出力します");
            Self::log(level, message);
            return;
        };

        let pending = (self.delivery)(Self::build(level, message));
        let backoff = Arc::clone(&self.backoff);
        let retry_after = self.retry_after;
        let message = message.to_string();
        runtime.spawn(async move {
            match pending.await {
                Ok(()) => debug!("通知を表示しました: {}", message),
                Err(e) => {
                    warn!(
                        error = %e,
                        "通知サービスを利用できません。{}秒間はログに出力します",
                        retry_after.as_secs()
                    );
                    backoff.suspend(Instant::now(), retry_after);
                    DesktopNotifier::log(level, &message);
                }
            }
        });
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn deliver(notification: Notification) -> Pending {
    Box::pin(async move {
        notification
            .show_async()
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    })
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn deliver(notification: Notification) -> Pending {
    Box::pin(async move {
        tokio::task::spawn_blocking(move || {
            notification.show().map(|_| ()).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| e.to_string())?
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_summary_by_level() {
        assert_eq!(DesktopNotifier::summary(NotificationLevel::Info), "Prayer Reminder");
        assert!(DesktopNotifier::summary(NotificationLevel::Warning).contains("Warning"));
    }

    #[test]
    fn test_new_is_not_suspended() {
        assert!(!DesktopNotifier::new().is_backend_suspended());
    }

    #[test]
    fn test_notify_outside_runtime_logs_only() {
        static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);
        fn counting(_: Notification) -> Pending {
            ATTEMPTS.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(()) })
        }

        let notifier = DesktopNotifier::with_delivery(counting);
        notifier.info("no runtime here");
        assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 0);
    }

    mod backoff_tests {
        use super::*;

        #[test]
        fn test_window_expires_and_clears() {
            let backoff = Backoff::default();
            let start = Instant::now();
            assert!(!backoff.is_suspended(start));

            backoff.suspend(start, Duration::from_secs(60));
            assert!(backoff.is_suspended(start + Duration::from_secs(59)));
            assert!(!backoff.is_suspended(start + Duration::from_secs(60)));
            assert!(!backoff.is_suspended(start));
        }
    }

    mod delivery_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_delivery_runs_on_spawned_task() {
            static DELIVERED: AtomicUsize = AtomicUsize::new(0);
            fn slow(_: Notification) -> Pending {
                Box::pin(async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    DELIVERED.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            }

            let notifier = DesktopNotifier::with_delivery(slow);
            let before = Instant::now();
            notifier.info("🕌 Prayer Reminder: Fajr in 10 minutes");
            assert_eq!(Instant::now(), before);
            assert_eq!(DELIVERED.load(Ordering::SeqCst), 0);

            tokio::time::sleep(Duration::from_secs(31)).await;
            assert_eq!(DELIVERED.load(Ordering::SeqCst), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_failure_suspends_then_retries() {
            static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);
            fn failing(_: Notification) -> Pending {
                Box::pin(async {
                    ATTEMPTS.fetch_add(1, Ordering::SeqCst);
                    Err("no session bus".to_string())
                })
            }

            let notifier = DesktopNotifier::with_delivery(failing)
                .with_retry_after(Duration::from_secs(60));

            notifier.info("first");
            tokio::time::sleep(Duration::from_millis(1)).await;
            assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 1);
            assert!(notifier.is_backend_suspended());

            notifier.info("while suspended");
            tokio::time::sleep(Duration::from_millis(1)).await;
            assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 1);

            tokio::time::sleep(Duration::from_secs(60)).await;
            assert!(!notifier.is_backend_suspended());
            notifier.info("next tick");
            tokio::time::sleep(Duration::from_millis(1)).await;
            assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
        }
    }
}
