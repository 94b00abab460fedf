//! Allocator Metrics
//!
//! Atomic counters describing id allocator activity. Each
//! [`IdAllocator`](crate::identity::allocator::IdAllocator) owns one
//! [`AllocatorMetrics`]; there is no global instance.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Counters for one id allocator
#[derive(Debug)]
pub struct AllocatorMetrics {
    /// Ids handed out by `allocate`
    pub ids_allocated: AtomicU64,
    /// Ids removed by `release`
    pub ids_released: AtomicU64,
    /// `release` calls for ids that were not registered
    pub release_misses: AtomicU64,
    /// Candidate ids skipped because they were still registered
    pub collisions_skipped: AtomicU64,
    /// Times the counter wrapped past `u32::MAX`
    pub counter_wraps: AtomicU64,
    start_time: Instant,
}

impl AllocatorMetrics {
    pub fn new() -> Self {
        Self {
            ids_allocated: AtomicU64::new(0),
            ids_released: AtomicU64::new(0),
            release_misses: AtomicU64::new(0),
            collisions_skipped: AtomicU64::new(0),
            counter_wraps: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn id_allocated(&self) {
        self.ids_allocated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn id_released(&self) {
        self.ids_released.fetch_add(1, Ordering::Relaxed);
    }

    pub fn release_missed(&self) {
        self.release_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn collision_skipped(&self) {
        self.collisions_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn counter_wrapped(&self) {
        self.counter_wraps.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> AllocatorSnapshot {
        AllocatorSnapshot {
            ids_allocated: self.ids_allocated.load(Ordering::Relaxed),
            ids_released: self.ids_released.load(Ordering::Relaxed),
            release_misses: self.release_misses.load(Ordering::Relaxed),
            collisions_skipped: self.collisions_skipped.load(Ordering::Relaxed),
            counter_wraps: self.counter_wraps.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            ids_allocated = snapshot.ids_allocated,
            ids_released = snapshot.ids_released,
            release_misses = snapshot.release_misses,
            collisions_skipped = snapshot.collisions_skipped,
            counter_wraps = snapshot.counter_wraps,
            uptime_seconds = snapshot.uptime_seconds,
            "Id allocator metrics snapshot"
        );
    }
}

impl Default for AllocatorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of allocator metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatorSnapshot {
    pub ids_allocated: u64,
    pub ids_released: u64,
    pub release_misses: u64,
    pub collisions_skipped: u64,
    pub counter_wraps: u64,
    pub uptime_seconds: u64,
}

impl AllocatorSnapshot {
    /// Ids allocated and not yet released, as seen by the counters
    pub fn outstanding(&self) -> u64 {
        self.ids_allocated.saturating_sub(self.ids_released)
    }
}
