//! Global error notifications.
//!
//! Request failures are broadcast on a channel so any interested component
//! (a status bar, a toast renderer, a log sink) can observe them without the
//! HTTP layer knowing who is listening. Sends are fire-and-forget: they never
//! block and a missing subscriber is not an error.

use serde::Serialize;
use tokio::sync::broadcast;

/// Fallback shown to users when the backend gives no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Default channel capacity; late subscribers only miss old notifications.
const CHANNEL_CAPACITY: usize = 64;

/// A user-facing failure notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorNotification {
    pub message: String,
}

/// Broadcast bus for [`ApiErrorNotification`]s.
#[derive(Debug, Clone)]
pub struct ErrorNotifications {
    sender: broadcast::Sender<ApiErrorNotification>,
}

impl ErrorNotifications {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to future notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ApiErrorNotification> {
        self.sender.subscribe()
    }

    /// Publish a notification. Silently drops it when nobody listens.
    pub fn publish(&self, message: impl Into<String>) {
        let _ = self.sender.send(ApiErrorNotification {
            message: message.into(),
        });
    }
}

impl Default for ErrorNotifications {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_subscriber() {
        let notifications = ErrorNotifications::new();
        let mut rx = notifications.subscribe();

        notifications.publish("Coupon expired");

        let received = rx.recv().await.expect("notification");
        assert_eq!(received.message, "Coupon expired");
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let notifications = ErrorNotifications::new();
        notifications.publish("nobody is listening");
    }
}
