//! User-visible notifications.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::colors::severity_tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// A toast shown to the user: the HTTP status as title, a short message as body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub title: u16,
    pub message: String,
}

impl Notification {
    pub fn error(title: u16, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title,
            message: message.into(),
        }
    }
}

/// Anything that can put a notification in front of the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, n: Notification) {
        error!("{} {}: {}", severity_tag(n.severity), n.title, n.message);
    }
}

/// Forwards notifications to whatever renders them.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            warn!("notification dropped: receiver closed");
        }
    }
}
