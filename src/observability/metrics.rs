//! Metrics registry for one lineage
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters of one lineage
///
/// Uses Relaxed ordering; the counters are not used for synchronization.
/// A disabled registry ignores every increment.
#[derive(Debug)]
pub struct MetricsRegistry {
    enabled: bool,
    /// Mutations that produced a version
    commits: AtomicU64,
    /// Mutations rejected because the view was not the latest
    stale_rejections: AtomicU64,
    /// Mutations rejected for a bad index, key or position
    range_rejections: AtomicU64,
    /// Slot entries written by committed mutations
    slot_appends: AtomicU64,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MetricsRegistry {
    /// Create a registry with all counters at zero
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            commits: AtomicU64::new(0),
            stale_rejections: AtomicU64::new(0),
            range_rejections: AtomicU64::new(0),
            slot_appends: AtomicU64::new(0),
        }
    }

    /// Whether increments are recorded
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn add(&self, counter: &AtomicU64, n: u64) {
        if self.enabled {
            counter.fetch_add(n, Ordering::Relaxed);
        }
    }

    /// Record a committed mutation that wrote `appended` slot entries
    pub fn record_commit(&self, appended: u64) {
        self.add(&self.commits, 1);
        self.add(&self.slot_appends, appended);
    }

    /// Increment stale-view rejections
    pub fn increment_stale_rejections(&self) {
        self.add(&self.stale_rejections, 1);
    }

    /// Increment index/key/position rejections
    pub fn increment_range_rejections(&self) {
        self.add(&self.range_rejections, 1);
    }

    /// Get committed mutation count
    pub fn commits(&self) -> u64 {
        self.commits.load(Ordering::Relaxed)
    }

    /// Get current values as a JSON object
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"commits":{},"stale_rejections":{},"range_rejections":{},"slot_appends":{}}}"#,
            s.commits, s.stale_rejections, s.range_rejections, s.slot_appends,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commits: self.commits.load(Ordering::Relaxed),
            stale_rejections: self.stale_rejections.load(Ordering::Relaxed),
            range_rejections: self.range_rejections.load(Ordering::Relaxed),
            slot_appends: self.slot_appends.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub commits: u64,
    pub stale_rejections: u64,
    pub range_rejections: u64,
    pub slot_appends: u64,
}
