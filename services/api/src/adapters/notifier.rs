//! services/api/src/adapters/notifier.rs
//!
//! Outbound notifications. Request handlers push onto a bounded queue and
//! return immediately; a background worker drains the queue into the mail
//! transport.

use async_trait::async_trait;
use placement_core::domain::Notification;
use placement_core::ports::{Notifier, PortError, PortResult};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

//=========================================================================================
// Queue side (implements the core's `Notifier` port)
//=========================================================================================

#[derive(Clone)]
pub struct QueuedNotifier {
    sender: mpsc::Sender<Notification>,
}

impl QueuedNotifier {
    /// Creates the notifier and the receiving end for the delivery worker.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Notifier for QueuedNotifier {
    async fn notify(&self, notification: Notification) -> PortResult<()> {
        self.sender.try_send(notification).map_err(|e| match e {
            TrySendError::Full(_) => PortError::Unexpected("notification queue is full".to_string()),
            TrySendError::Closed(_) => {
                PortError::Unexpected("notification worker has stopped".to_string())
            }
        })
    }
}

//=========================================================================================
// Delivery side
//=========================================================================================

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> PortResult<()>;
}

/// Transport that writes each message to the log instead of an SMTP relay.
pub struct LogMailer {
    sender: String,
}

impl LogMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl MailTransport for LogMailer {
    async fn deliver(&self, notification: &Notification) -> PortResult<()> {
        info!(
            from = %self.sender,
            to = %notification.recipient,
            template = notification.kind.as_str(),
            subject = %notification.subject(),
            context = ?notification.context,
            "mail sent"
        );
        Ok(())
    }
}

/// Delivers queued notifications until the queue closes or `shutdown` fires.
/// On shutdown, messages already queued are still delivered.
pub async fn run_delivery_worker(
    mut receiver: mpsc::Receiver<Notification>,
    transport: Arc<dyn MailTransport>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            next = receiver.recv() => match next {
                Some(notification) => deliver(transport.as_ref(), &notification).await,
                None => return,
            },
        }
    }

    receiver.close();
    while let Some(notification) = receiver.recv().await {
        deliver(transport.as_ref(), &notification).await;
    }
    info!("notification worker stopped");
}

async fn deliver(transport: &dyn MailTransport, notification: &Notification) {
    if let Err(e) = transport.deliver(notification).await {
        // Not retried.
        warn!(to = %notification.recipient, template = notification.kind.as_str(), error = %e, "mail delivery failed");
    }
}
