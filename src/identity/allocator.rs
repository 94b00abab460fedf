//! # Connection Id Allocator
//!
//! Issues 32-bit connection ids above [`ID_FLOOR`] that are unique among the
//! ids currently registered with the allocator.
//!
//! ## Allocation Strategy
//! - A counter only ever moves forward (or is clamped up to the floor)
//! - Each candidate is checked against the set of registered ids
//! - The chosen id is registered before the allocation lock is released
//! - `release` removes an id so the counter may issue it again after wrapping
//!
//! ## Locking
//! Two `parking_lot` mutexes: the counter lock serialises the whole
//! increment/check/register sequence, the registry lock guards the set.
//! Lock order is always counter then registry; `release` only takes the
//! registry lock, so it never waits on a running allocation longer than one
//! set insert.
//!
//! ## Example
//! ```
//! use connection_identity::identity::allocator::{IdAllocator, ID_FLOOR};
//!
//! let allocator = IdAllocator::new();
//! let id = allocator.allocate();
//! assert!(id > ID_FLOOR);
//! assert!(allocator.is_registered(id));
//!
//! assert!(allocator.release(id));
//! assert!(!allocator.is_registered(id));
//! ```

use std::collections::HashSet;

use parking_lot::Mutex;
use tracing::{debug, instrument, trace, warn};

use crate::config::AllocatorConfig;
use crate::utils::metrics::{AllocatorMetrics, AllocatorSnapshot};

/// Ids are always strictly greater than this value
pub const ID_FLOOR: u32 = 1_000_000_000;

/// Default number of live ids before the allocator starts warning
pub const DEFAULT_MAX_LIVE_IDS: usize = 1_000_000;

/// Collision-free connection id allocator.
///
/// Meant to be owned by one long-lived component (a listener, a connection
/// pool) and shared by reference or `Arc`. Independent allocators issue
/// overlapping ids; uniqueness holds per allocator only.
#[derive(Debug)]
pub struct IdAllocator {
    /// Last id issued (or the clamped start value)
    counter: Mutex<u32>,
    /// Ids currently in use
    registered: Mutex<HashSet<u32>>,
    /// Live id count above which a warning is logged
    max_live_ids: usize,
    metrics: AllocatorMetrics,
}

impl IdAllocator {
    /// Create an allocator whose first id is `ID_FLOOR + 1`
    pub fn new() -> Self {
        Self::with_counter(ID_FLOOR)
    }

    /// Create an allocator with an explicit starting counter.
    ///
    /// The next id issued is `start + 1`, or `ID_FLOOR + 1` when `start` is
    /// at or below the floor.
    pub fn with_counter(start: u32) -> Self {
        Self {
            counter: Mutex::new(start),
            registered: Mutex::new(HashSet::new()),
            max_live_ids: DEFAULT_MAX_LIVE_IDS,
            metrics: AllocatorMetrics::new(),
        }
    }

    /// Create an allocator from its configuration section
    pub fn from_config(config: &AllocatorConfig) -> Self {
        let mut allocator = Self::with_counter(config.start);
        allocator.max_live_ids = config.max_live_ids;
        debug!(
            start = config.start,
            max_live_ids = config.max_live_ids,
            "Id allocator initialized"
        );
        allocator
    }

    /// Allocate and register a fresh id.
    ///
    /// # Liveness
    /// If every id in `ID_FLOOR + 1..=u32::MAX` is registered this never
    /// returns. Callers must keep the number of live connections far below
    /// `u32::MAX - ID_FLOOR`; the allocator does not fail or back off.
    pub fn allocate(&self) -> u32 {
        let mut counter = self.counter.lock();
        loop {
            if *counter <= ID_FLOOR {
                *counter = ID_FLOOR;
            }
            *counter = match counter.checked_add(1) {
                Some(next) => next,
                None => {
                    self.metrics.counter_wrapped();
                    debug!("Id counter wrapped, restarting at floor");
                    ID_FLOOR + 1
                }
            };

            let candidate = *counter;
            let mut registered = self.registered.lock();
            if registered.insert(candidate) {
                let live = registered.len();
                drop(registered);

                self.metrics.id_allocated();
                if live - 1 == self.max_live_ids {
                    warn!(
                        live,
                        max_live_ids = self.max_live_ids,
                        "Live connection ids exceeded configured limit"
                    );
                }
                trace!(id = candidate, live, "Allocated connection id");
                return candidate;
            }

            self.metrics.collision_skipped();
            trace!(id = candidate, "Skipping registered connection id");
        }
    }

    /// Release a previously allocated id.
    ///
    /// Returns `true` if the id was registered.
    #[instrument(level = "trace", skip(self))]
    pub fn release(&self, id: u32) -> bool {
        let removed = self.registered.lock().remove(&id);
        if removed {
            self.metrics.id_released();
        } else {
            self.metrics.release_missed();
            debug!(id, "Attempted to release unregistered connection id");
        }
        removed
    }

    /// Mark an id obtained elsewhere (e.g. from a token issued before a
    /// restart) as in use, so `allocate` will skip it.
    ///
    /// Returns `false` if the id was already registered.
    pub fn reserve(&self, id: u32) -> bool {
        self.registered.lock().insert(id)
    }

    /// Checks if an id is currently registered
    pub fn is_registered(&self, id: u32) -> bool {
        self.registered.lock().contains(&id)
    }

    /// Number of registered ids
    pub fn in_use(&self) -> usize {
        self.registered.lock().len()
    }

    /// Last value the counter produced
    pub fn last_issued(&self) -> u32 {
        *self.counter.lock()
    }

    pub fn max_live_ids(&self) -> usize {
        self.max_live_ids
    }

    pub fn metrics(&self) -> AllocatorSnapshot {
        self.metrics.snapshot()
    }

    /// Log a metrics snapshot at info level
    pub fn log_metrics(&self) {
        self.metrics.log_metrics();
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
