//! Per-logger metrics

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters shared by the dispatch loop, write tasks and the facade
#[derive(Debug, Default)]
pub struct WriterMetrics {
    /// Messages pulled from the submission queue
    dispatched_count: AtomicU64,
    /// Write tasks spawned and not yet finished
    in_flight: AtomicUsize,
    /// Total successful writes
    write_count: AtomicU64,
    /// Total bytes accepted by the sink
    bytes_written: AtomicU64,
    /// Total write failures (both paths)
    failure_count: AtomicU64,
    /// Errors queued on the error channel
    errors_reported: AtomicU64,
    /// Errors dropped because the error queue was full or gone
    errors_dropped: AtomicU64,
}

impl WriterMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched_count(&self) -> u64 {
        self.dispatched_count.load(Ordering::Relaxed)
    }

    pub fn inc_dispatched_count(&self) {
        self.dispatched_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns the new in-flight count
    pub fn inc_in_flight(&self) -> usize {
        self.in_flight.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns the new in-flight count
    pub fn dec_in_flight(&self) -> usize {
        self.in_flight.fetch_sub(1, Ordering::Relaxed).saturating_sub(1)
    }

    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Record a successful write of `bytes`
    pub fn record_write(&self, bytes: usize) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn errors_reported(&self) -> u64 {
        self.errors_reported.load(Ordering::Relaxed)
    }

    pub fn inc_errors_reported(&self) {
        self.errors_reported.fetch_add(1, Ordering::Relaxed);
    }

    pub fn errors_dropped(&self) -> u64 {
        self.errors_dropped.load(Ordering::Relaxed)
    }

    pub fn inc_errors_dropped(&self) {
        self.errors_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dispatched_count: self.dispatched_count(),
            in_flight: self.in_flight(),
            write_count: self.write_count(),
            bytes_written: self.bytes_written(),
            failure_count: self.failure_count(),
            errors_reported: self.errors_reported(),
            errors_dropped: self.errors_dropped(),
        }
    }
}

/// Snapshot of logger metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub dispatched_count: u64,
    pub in_flight: usize,
    pub write_count: u64,
    pub bytes_written: u64,
    pub failure_count: u64,
    pub errors_reported: u64,
    pub errors_dropped: u64,
}
