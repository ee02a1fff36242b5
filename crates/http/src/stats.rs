//! Lock-free ingest counters.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, Utc};

/// Success/error counters and the time of the last accepted event.
///
/// Each counter is independent, so a snapshot taken under load may briefly
/// show `ingested + errors` lagging the number of finished requests.
#[derive(Debug, Default)]
pub struct IngestStats {
    ingested: AtomicU64,
    errors: AtomicU64,
    /// Unix millis of the last success; 0 = never.
    last_event_ms: AtomicI64,
}

/// Point-in-time copy of [`IngestStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub ingested: u64,
    pub errors: u64,
    pub last_event: Option<DateTime<Utc>>,
}

impl IngestStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, at: DateTime<Utc>) {
        self.ingested.fetch_add(1, Ordering::Relaxed);
        self.last_event_ms.store(at.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        let last_ms = self.last_event_ms.load(Ordering::Relaxed);
        StatsSnapshot {
            ingested: self.ingested.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            last_event: (last_ms != 0).then(|| DateTime::from_timestamp_millis(last_ms)).flatten(),
        }
    }
}
