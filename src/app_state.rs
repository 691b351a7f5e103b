// =============================================================================
// Central Application State — latest published snapshot cycle
// =============================================================================
//
// Written once per cycle by the polling loop, read by the status API.
//
// Thread safety:
//   - Atomic counter for lock-free cycle tracking.
//   - parking_lot::RwLock for the published report and snapshots; the
//     writer swaps both under one lock so readers never see a report from
//     one cycle next to snapshots from another.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::snapshot::Snapshot;

// =============================================================================
// Published cycle
// =============================================================================

/// Output of the most recent completed cycle.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedCycle {
    /// Per-cycle correlation id, matching the `cycle` tracing span.
    pub cycle_id: String,
    pub completed_at: DateTime<Utc>,
    pub report: String,
    pub snapshots: Vec<Snapshot>,
}

// =============================================================================
// AppState
// =============================================================================

/// State shared between the polling loop and the API via `Arc<AppState>`.
pub struct AppState {
    /// Number of cycles published since startup.
    pub cycles_completed: AtomicU64,

    latest: RwLock<Option<PublishedCycle>>,

    /// Instant when the engine was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            cycles_completed: AtomicU64::new(0),
            latest: RwLock::new(None),
            start_time: std::time::Instant::now(),
        }
    }

    /// Replace the published cycle and bump the counter.
    pub fn publish(&self, cycle: PublishedCycle) -> u64 {
        *self.latest.write() = Some(cycle);
        self.cycles_completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed.load(Ordering::SeqCst)
    }

    /// Clone of the latest published cycle, if any.
    pub fn latest(&self) -> Option<PublishedCycle> {
        self.latest.read().clone()
    }

    /// Latest report text without cloning the snapshots.
    pub fn latest_report(&self) -> Option<String> {
        self.latest.read().as_ref().map(|c| c.report.clone())
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
