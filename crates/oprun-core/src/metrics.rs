//! Atomic counters for runner observability.
//!
//! Each [`ReportingContext`](crate::reporting::ReportingContext) owns one
//! [`RunMetrics`]. Counters are incremented silently; call
//! [`RunMetrics::flush`] to emit current values as a single `info!` event.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RunMetrics {
    runs: AtomicU64,
    failures: AtomicU64,
    presentations: AtomicU64,
    fallbacks: AtomicU64,
    rejected: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub runs: u64,
    pub failures: u64,
    pub presentations: u64,
    pub fallbacks: u64,
    pub rejected: u64,
}

impl RunMetrics {
    pub const fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            presentations: AtomicU64::new(0),
            fallbacks: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Record a settled run.
    pub fn record_run(&self, succeeded: bool) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        tracing::trace!(metric = "runs", succeeded, "counter incremented");
    }

    pub fn inc_presentations(&self) {
        self.presentations.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "presentations", "counter incremented");
    }

    pub fn inc_fallbacks(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "fallbacks", "counter incremented");
    }

    pub fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "rejected", "counter incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            presentations: self.presentations.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        let s = self.snapshot();
        tracing::info!(
            metric = "flush",
            runs = s.runs,
            failures = s.failures,
            presentations = s.presentations,
            fallbacks = s.fallbacks,
            rejected = s.rejected,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = RunMetrics::new();
        metrics.record_run(true);
        metrics.record_run(false);
        metrics.inc_presentations();
        metrics.inc_fallbacks();
        metrics.inc_rejected();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                runs: 2,
                failures: 1,
                presentations: 1,
                fallbacks: 1,
                rejected: 1,
            }
        );
        metrics.flush();
    }
}
