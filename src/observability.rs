//! Tracing setup and in-process counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber, honouring `RUST_LOG` (default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    entries_ingested: AtomicU64,
    entries_rejected: AtomicU64,
    persist_failures: AtomicU64,
    pages_served: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_ingested(&self) {
        self.entries_ingested.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "entries_ingested", "Metric incremented");
    }

    pub fn entry_rejected(&self) {
        self.entries_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "entries_rejected", "Metric incremented");
    }

    pub fn persist_failed(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "persist_failures", "Metric incremented");
    }

    pub fn page_served(&self) {
        self.pages_served.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "pages_served", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            entries_ingested: self.entries_ingested.load(Ordering::Relaxed),
            entries_rejected: self.entries_rejected.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            pages_served: self.pages_served.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub entries_ingested: u64,
    pub entries_rejected: u64,
    pub persist_failures: u64,
    pub pages_served: u64,
}
