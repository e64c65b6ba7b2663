//! Transient user notifications ("toasts").
//!
//! Services report the outcome of every admin operation through a
//! [`Notifier`]. The CLI drains a [`ToastLog`] after each command; a UI
//! would render the same queue.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tracing::{error, info, warn};

/// Default number of toasts kept before the oldest is dropped.
const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
    Warning,
}

/// A short message shown to the admin user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            message: message.into(),
        }
    }
}

/// Sink for toasts.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Bounded in-memory toast queue that also logs every toast.
#[derive(Debug)]
pub struct ToastLog {
    capacity: usize,
    queue: Mutex<VecDeque<Toast>>,
}

impl Default for ToastLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ToastLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` toasts (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Remove and return every queued toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Queued toasts without removing them.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Toast> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// The most recent toast.
    #[must_use]
    pub fn last(&self) -> Option<Toast> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }
}

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Error => error!(message = %toast.message, "toast"),
            ToastLevel::Warning => warn!(message = %toast.message, "toast"),
            ToastLevel::Success | ToastLevel::Info => info!(message = %toast.message, "toast"),
        }

        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(toast);
    }
}
