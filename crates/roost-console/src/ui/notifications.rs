// Toast queue for status feedback, auto-dismissed after a per-level duration.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration: Duration,
    shown_at: Option<Instant>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            duration: Duration::from_secs(3),
            shown_at: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
            duration: Duration::from_secs(3),
            shown_at: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            duration: Duration::from_secs(5),
            shown_at: None,
        }
    }

    fn is_expired(&self) -> bool {
        self.shown_at
            .map(|shown| shown.elapsed() >= self.duration)
            .unwrap_or(false)
    }

    fn mark_shown(&mut self) {
        if self.shown_at.is_none() {
            self.shown_at = Some(Instant::now());
        }
    }
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    queue: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.queue.push_back(notification);
    }

    /// The notification to display this frame, expiring as time passes.
    pub fn current(&mut self) -> Option<&Notification> {
        while self.queue.front().is_some_and(|n| n.is_expired()) {
            self.queue.pop_front();
        }
        if let Some(front) = self.queue.front_mut() {
            front.mark_shown();
        }
        self.queue.front()
    }

    pub fn dismiss(&mut self) {
        self.queue.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_shows_oldest_first() {
        let mut queue = NotificationQueue::new();
        queue.push(Notification::info("first"));
        queue.push(Notification::error("second"));
        assert_eq!(queue.current().unwrap().message, "first");
    }

    #[test]
    fn test_dismiss_advances() {
        let mut queue = NotificationQueue::new();
        queue.push(Notification::info("first"));
        queue.push(Notification::success("second"));
        queue.dismiss();
        let current = queue.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.level, NotificationLevel::Success);
    }

    #[test]
    fn test_zero_duration_expires_immediately() {
        let mut queue = NotificationQueue::new();
        let mut n = Notification::info("gone");
        n.duration = Duration::from_secs(0);
        queue.push(n);
        // First call marks it shown, second sees it expired.
        assert!(queue.current().is_some());
        assert!(queue.current().is_none());
    }
}
