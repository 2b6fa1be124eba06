//! Capabilities the engine calls out to: the notification sink and the host
//! window controller.
//!
//! Both are fire-and-forget. An implementation that can fail must swallow
//! the failure itself; the engine never waits on or inspects the outcome.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Short-lived progress notice (phase started).
    Transient,
    /// Persistent display of a completed milestone.
    Success,
    /// Persistent display of an aborted session.
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Notification {
    pub fn transient(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Transient,
            title: title.into(),
            message: Some(message.into()),
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: None,
        }
    }

    pub fn failure(title: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            title: title.into(),
            message: None,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Dismisses the host window once a session starts. Most hosts have none.
pub trait WindowController: Send + Sync {
    fn dismiss(&self) {}
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, n: Notification) {
        tracing::info!(kind = ?n.kind, title = %n.title, message = ?n.message, "notification");
    }
}

/// Drops every notification. Used when notifications are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutedNotifier;

impl Notifier for MutedNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Keeps every notification in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Return and clear everything recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoWindow;

impl WindowController for NoWindow {}
