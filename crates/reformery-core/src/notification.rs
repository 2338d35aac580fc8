// ── NotificationQueue ──
//
// Single-slot, auto-expiring status banner. A new `show` replaces the
// current message and restarts the expiry timer (last write wins).

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use strum::Display;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default time a banner stays visible.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: Instant,
    /// Increases with every `show`; lets an expiry timer recognize that
    /// its notification has since been replaced.
    seq: u64,
}

/// The single visible notification slot.
pub struct NotificationQueue {
    slot: Arc<watch::Sender<Option<Notification>>>,
    ttl: Duration,
    timer: Mutex<Timer>,
}

#[derive(Default)]
struct Timer {
    seq: u64,
    cancel: Option<CancellationToken>,
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
            ttl,
            timer: Mutex::new(Timer::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replace the visible notification and restart the expiry timer.
    ///
    /// Must be called from within a Tokio runtime for the timer to run;
    /// outside one the notification stays until dismissed.
    pub fn show(&self, kind: NotificationKind, message: impl Into<String>) {
        let message = message.into();
        let cancel = CancellationToken::new();

        let seq = {
            let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = timer.cancel.replace(cancel.clone()) {
                previous.cancel();
            }
            timer.seq += 1;
            timer.seq
        };

        let expires_at = Instant::now() + self.ttl;
        debug!(%kind, message = %message, "notification shown");
        self.slot.send_replace(Some(Notification {
            kind,
            message,
            expires_at,
            seq,
        }));

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime; notification will not auto-expire");
            return;
        };
        let slot = Arc::clone(&self.slot);
        runtime.spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep_until(expires_at) => {
                    slot.send_if_modified(|current| {
                        if current.as_ref().is_some_and(|n| n.seq == seq) {
                            *current = None;
                            true
                        } else {
                            false
                        }
                    });
                }
            }
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(NotificationKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(NotificationKind::Error, message);
    }

    /// Clear immediately and cancel the pending timer.
    pub fn dismiss(&self) {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cancel) = timer.cancel.take() {
            cancel.cancel();
        }
        self.slot.send_replace(None);
    }

    /// The visible notification, if any.
    pub fn current(&self) -> Option<Notification> {
        self.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.slot.subscribe()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl Drop for NotificationQueue {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(cancel) = timer.cancel.take() {
            cancel.cancel();
        }
    }
}

impl std::fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("ttl", &self.ttl)
            .field("current", &*self.slot.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn notification_expires_after_ttl() {
        let queue = NotificationQueue::new(Duration::from_secs(4));
        queue.success("Package created");
        assert_eq!(
            queue.current().map(|n| n.kind),
            Some(NotificationKind::Success)
        );

        tokio::time::sleep(Duration::from_millis(3900)).await;
        assert!(queue.current().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(queue.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn second_show_wins_and_restarts_timer() {
        let queue = NotificationQueue::new(Duration::from_secs(5));
        queue.success("first");
        tokio::time::sleep(Duration::from_secs(3)).await;
        queue.error("second");

        // First message's deadline passes; the second stays.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let current = queue.current();
        assert_eq!(current.as_ref().map(|n| n.message.as_str()), Some("second"));
        assert_eq!(current.map(|n| n.kind), Some(NotificationKind::Error));

        // Gone ~5s after the second call.
        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert!(queue.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_clears_immediately() {
        let queue = NotificationQueue::default();
        queue.error("Failed to update user");
        queue.dismiss();
        assert!(queue.current().is_none());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(queue.current().is_none());
    }

    #[test]
    fn show_without_runtime_keeps_message() {
        let queue = NotificationQueue::default();
        queue.success("saved");
        assert_eq!(queue.current().map(|n| n.message), Some("saved".into()));
    }
}
