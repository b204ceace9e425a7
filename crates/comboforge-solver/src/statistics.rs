//! Solver statistics collection.
//!
//! A [`StatisticsCollector`] is shared by every clone of a solver and by
//! parallel witness generation, so all counters are atomic.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters observed over the lifetime of a solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Witnesses returned.
    pub witnesses: u64,
    /// Solve calls that ended in an error.
    pub failures: u64,
    /// Attempts abandoned at the repair step limit.
    pub restarts: u64,
    /// Individual repair flips applied.
    pub repair_steps: u64,
}

impl SolverStatistics {
    /// Returns the average number of flips per returned witness.
    pub fn avg_repair_steps(&self) -> f64 {
        if self.witnesses == 0 {
            0.0
        } else {
            self.repair_steps as f64 / self.witnesses as f64
        }
    }
}

/// Thread-safe collector for solver statistics.
///
/// # Example
///
/// ```
/// use comboforge_solver::StatisticsCollector;
///
/// let collector = StatisticsCollector::new();
/// collector.record_repair_step();
/// collector.record_witness();
///
/// let stats = collector.snapshot();
/// assert_eq!(stats.witnesses, 1);
/// assert_eq!(stats.repair_steps, 1);
/// ```
#[derive(Debug, Default)]
pub struct StatisticsCollector {
    witnesses: AtomicU64,
    failures: AtomicU64,
    restarts: AtomicU64,
    repair_steps: AtomicU64,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_witness(&self) {
        self.witnesses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_restart(&self) {
        self.restarts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_repair_step(&self) {
        self.repair_steps.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of the counters.
    pub fn snapshot(&self) -> SolverStatistics {
        SolverStatistics {
            witnesses: self.witnesses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            restarts: self.restarts.load(Ordering::Relaxed),
            repair_steps: self.repair_steps.load(Ordering::Relaxed),
        }
    }
}
