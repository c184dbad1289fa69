//! Tracing setup and request counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "vidgrab=info,tower_http=info";

/// Install the global fmt subscriber, honoring `RUST_LOG`
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Counters for inspect and download outcomes
#[derive(Debug, Default)]
pub struct Metrics {
    inspections_ok: AtomicU64,
    inspections_failed: AtomicU64,
    downloads_ok: AtomicU64,
    downloads_failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inspection_ok(&self) {
        self.inspections_ok.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "inspections_ok", "Metric incremented");
    }

    pub fn inspection_failed(&self) {
        self.inspections_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "inspections_failed", "Metric incremented");
    }

    pub fn download_ok(&self) {
        self.downloads_ok.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "downloads_ok", "Metric incremented");
    }

    pub fn download_failed(&self) {
        self.downloads_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "downloads_failed", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inspections_ok: self.inspections_ok.load(Ordering::Relaxed),
            inspections_failed: self.inspections_failed.load(Ordering::Relaxed),
            downloads_ok: self.downloads_ok.load(Ordering::Relaxed),
            downloads_failed: self.downloads_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub inspections_ok: u64,
    pub inspections_failed: u64,
    pub downloads_ok: u64,
    pub downloads_failed: u64,
}
