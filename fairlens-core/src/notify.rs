//! Toast notifications: a bounded stack of dismissible messages that expire.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✔",
            Self::Error => "✖",
            Self::Warning => "⚠",
            Self::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    pub shown_at: DateTime<Local>,
    created: Instant,
}

impl Toast {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created)
    }
}

/// Newest toasts are at the end. Overflow drops the oldest.
#[derive(Debug, Clone)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    ttl: Duration,
    max: usize,
    next_id: u64,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), 5)
    }
}

impl ToastStack {
    pub fn new(ttl: Duration, max: usize) -> Self {
        Self {
            toasts: Vec::new(),
            ttl,
            max: max.max(1),
            next_id: 0,
        }
    }

    /// Push a toast and return its id.
    pub fn push(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let toast = Toast {
            id,
            kind,
            title: title.into(),
            message: message.into(),
            shown_at: Local::now(),
            created: Instant::now(),
        };
        match kind {
            ToastKind::Error | ToastKind::Warning => {
                tracing::warn!(title = %toast.title, message = %toast.message, "toast")
            }
            _ => tracing::info!(title = %toast.title, message = %toast.message, "toast"),
        }
        self.toasts.push(toast);
        if self.toasts.len() > self.max {
            let overflow = self.toasts.len() - self.max;
            self.toasts.drain(..overflow);
        }
        id
    }

    pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, title, message)
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, title, message)
    }

    pub fn warning(&mut self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Warning, title, message)
    }

    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, title, message)
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Dismiss the newest toast.
    pub fn dismiss_latest(&mut self) -> bool {
        self.toasts.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    /// Remove toasts older than the TTL.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.toasts.retain(|t| t.age(now) < ttl);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}
