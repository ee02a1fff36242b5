//! Non-blocking live feed of accepted events.
//!
//! Consumers (a dashboard, a debug logger) read from a bounded channel. A
//! slow consumer loses notifications; it never slows ingestion down.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use hooks_store_core::{json_utils::extract_str, HookEvent};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Summary of one accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestEvent {
    pub kind: String,
    pub tool_name: String,
    pub session_id: String,
    pub body_size: usize,
    pub timestamp: Option<DateTime<Utc>>,
}

impl IngestEvent {
    #[must_use]
    pub fn from_hook_event(evt: &HookEvent, body_size: usize) -> Self {
        Self {
            kind: evt.kind.clone(),
            tool_name: extract_str(&evt.data, &["tool_name"]).unwrap_or_default().to_owned(),
            session_id: extract_str(&evt.data, &["session_id"]).unwrap_or_default().to_owned(),
            body_size,
            timestamp: evt.timestamp,
        }
    }
}

/// Sending half of the live feed.
#[derive(Debug)]
pub struct IngestObserver {
    tx: mpsc::Sender<IngestEvent>,
    dropped: AtomicU64,
}

impl IngestObserver {
    /// Bounded feed holding at most `capacity` undelivered events (minimum 1).
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<IngestEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx, dropped: AtomicU64::new(0) }, rx)
    }

    /// Offer an event without waiting. Returns `false` if it was dropped.
    pub fn notify(&self, event: IngestEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            },
        }
    }

    /// Notifications dropped because the feed was full or had no reader.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(kind: &str) -> IngestEvent {
        IngestEvent::from_hook_event(&HookEvent::new(kind, json!({"tool_name": "Bash"})), 42)
    }

    #[test]
    fn from_hook_event_copies_summary_fields() {
        let evt = HookEvent::new("PreToolUse", json!({"tool_name": "Read", "session_id": "s-1", "n": 1}));
        let summary = IngestEvent::from_hook_event(&evt, 99);
        assert_eq!(summary.kind, "PreToolUse");
        assert_eq!(summary.tool_name, "Read");
        assert_eq!(summary.session_id, "s-1");
        assert_eq!(summary.body_size, 99);
        assert_eq!(summary.timestamp, None);
    }

    #[test]
    fn full_channel_drops_and_counts() {
        let (observer, mut rx) = IngestObserver::channel(2);
        assert!(observer.notify(event("a")));
        assert!(observer.notify(event("b")));
        assert!(!observer.notify(event("c")));
        assert_eq!(observer.dropped(), 1);

        assert_eq!(rx.try_recv().unwrap().kind, "a");
        assert!(observer.notify(event("d")));
        assert_eq!(observer.dropped(), 1);
    }

    #[test]
    fn closed_channel_counts_as_dropped() {
        let (observer, rx) = IngestObserver::channel(4);
        drop(rx);
        assert!(!observer.notify(event("a")));
        assert_eq!(observer.dropped(), 1);
    }

    #[test]
    fn zero_capacity_is_bumped() {
        let (observer, _rx) = IngestObserver::channel(0);
        assert!(observer.notify(event("a")));
    }
}
