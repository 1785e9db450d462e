//! Best-effort delivery of notifications from the core.

use crate::domain::Notification;
use crate::ports::Notifier;
use tracing::{debug, warn};

/// Queues a notification, logging and swallowing any failure so the state
/// change that triggered it stands.
pub(crate) async fn notify_best_effort(notifier: &dyn Notifier, notification: Notification) {
    let kind = notification.kind.as_str();
    let recipient = notification.recipient.clone();
    match notifier.notify(notification).await {
        Ok(()) => debug!(kind, %recipient, "notification queued"),
        Err(e) => warn!(kind, %recipient, error = %e, "failed to queue notification"),
    }
}
