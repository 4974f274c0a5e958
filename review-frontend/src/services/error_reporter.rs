//! Single sink for failures that should reach the user.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

const DEFAULT_TITLE: &str = "Error";
const DEFAULT_CAPACITY: usize = 20;

/// Fire-and-forget error sink. Implementations must never panic.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, message: &str, source: Option<&str>);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    /// Text shown in the transient notification, `[title] :: message`.
    pub display: String,
}

impl Notification {
    pub fn new(message: &str, title: Option<&str>) -> Self {
        let title = title.unwrap_or(DEFAULT_TITLE).to_string();
        Self {
            display: format!("[{}] :: {}", title, message),
            title,
            message: message.to_string(),
        }
    }
}

/// Bounded queue of pending notifications for one session.
///
/// When full, the oldest notification is dropped.
pub struct NotificationCenter {
    pending: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned queue still holds valid notifications.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter for NotificationCenter {
    fn report(&self, message: &str, source: Option<&str>) {
        let notification = Notification::new(message, source);
        tracing::error!(
            title = %notification.title,
            message = %notification.message,
            "{}",
            notification.display
        );

        let mut pending = self.lock();
        if pending.len() >= self.capacity {
            pending.pop_front();
        }
        pending.push_back(notification);
    }
}
