//! crates/field_service_core/src/notifications.rs
//!
//! In-app notifications. They live only in this process and are never sent
//! to the backend.

use crate::domain::Notification;
use crate::ports::Notifier;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// How many notifications are kept before the oldest are dropped.
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 50;

pub struct NotificationCenter {
    inner: Mutex<Vec<Notification>>,
    limit: usize,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::with_limit(DEFAULT_NOTIFICATION_LIMIT)
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `limit` notifications, newest first.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
            limit: limit.max(1),
        }
    }

    /// Newest first.
    pub fn all(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|n| n.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    pub fn push(&self, message: impl Into<String>) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            read: false,
        };
        debug!("Notification {}: {}", notification.id, notification.message);
        if let Ok(mut n) = self.inner.lock() {
            n.push(notification.clone());
            let overflow = n.len().saturating_sub(self.limit);
            n.drain(..overflow);
        }
        notification
    }

    /// Returns false when no notification has that id.
    pub fn mark_read(&self, id: Uuid) -> bool {
        match self.inner.lock() {
            Ok(mut n) => match n.iter_mut().find(|n| n.id == id) {
                Some(found) => {
                    found.read = true;
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    pub fn mark_all_read(&self) {
        if let Ok(mut n) = self.inner.lock() {
            n.iter_mut().for_each(|n| n.read = true);
        }
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        match self.inner.lock() {
            Ok(mut n) => {
                let before = n.len();
                n.retain(|n| n.id != id);
                n.len() != before
            }
            Err(_) => false,
        }
    }

    pub fn unread_count(&self) -> usize {
        self.inner
            .lock()
            .map(|n| n.iter().filter(|n| !n.read).count())
            .unwrap_or(0)
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, message: String) -> Notification {
        self.push(message)
    }
}
