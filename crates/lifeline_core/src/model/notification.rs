//! Transient user-facing notifications.
//!
//! # Responsibility
//! - Carry success/failure messages from screens to the host UI.
//!
//! # Invariants
//! - Each failed operation produces exactly one notification.
//! - Sending never blocks and never fails the originating operation.

use log::debug;
use tokio::sync::mpsc;

pub const MSG_LOAD_EMERGENCY_FAILED: &str = "Failed to load emergency number";
pub const MSG_EMERGENCY_SAVED: &str = "Emergency number saved successfully";
pub const MSG_SAVE_EMERGENCY_FAILED: &str = "Failed to save emergency number";
pub const MSG_CONTACTS_DENIED: &str = "Contacts permission denied";
pub const MSG_CONTACTS_FAILED: &str = "Failed to load contacts";
pub const MSG_LOCATION_DENIED: &str = "Location permission denied";
pub const MSG_WEATHER_FAILED: &str = "Failed to load weather data";
pub const TITLE_SCANNED: &str = "Scanned App Info";

const TITLE_ERROR: &str = "Error";
const TITLE_SUCCESS: &str = "Success";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// One dismissible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::info(TITLE_SUCCESS, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: TITLE_ERROR.to_string(),
            message: message.into(),
        }
    }
}

/// Cloneable sending side handed to every screen.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            debug!("event=notify module=notification status=dropped reason=feed_closed");
        }
    }

    pub fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }

    pub fn success(&self, message: &str) {
        self.notify(Notification::success(message));
    }
}

/// Receiving side drained by the host UI.
#[derive(Debug)]
pub struct NotificationFeed {
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl NotificationFeed {
    /// Returns the next queued notification without waiting.
    pub fn try_next(&mut self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next notification; `None` once every notifier is gone.
    pub async fn next(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    /// Drains everything currently queued.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

/// Creates a connected notifier/feed pair.
pub fn channel() -> (Notifier, NotificationFeed) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, NotificationFeed { rx })
}

#[cfg(test)]
mod tests {
    use super::{channel, NotificationLevel, MSG_EMERGENCY_SAVED, MSG_WEATHER_FAILED};

    #[test]
    fn feed_preserves_send_order() {
        let (notifier, mut feed) = channel();
        notifier.success(MSG_EMERGENCY_SAVED);
        notifier.error(MSG_WEATHER_FAILED);

        let drained = feed.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NotificationLevel::Info);
        assert_eq!(drained[0].message, MSG_EMERGENCY_SAVED);
        assert_eq!(drained[1].level, NotificationLevel::Error);
        assert!(feed.try_next().is_none());
    }

    #[test]
    fn notifying_after_feed_drop_is_harmless() {
        let (notifier, feed) = channel();
        drop(feed);
        notifier.error(MSG_WEATHER_FAILED);
    }
}
