//! Bandit arms.

use std::sync::{Mutex, PoisonError};

use comboforge_core::Assignment;

use crate::stats::RunningVariance;

/// One candidate assignment and the belief about its reward.
///
/// The assignment never changes; the statistics sit behind the arm's own
/// lock so updates to different arms never contend.
#[derive(Debug)]
pub struct Arm {
    assignment: Assignment,
    stats: Mutex<RunningVariance>,
}

impl Arm {
    pub(crate) fn new(assignment: Assignment, stats: RunningVariance) -> Self {
        Self {
            assignment,
            stats: Mutex::new(stats),
        }
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// A consistent copy of the arm's current statistics.
    pub fn stats(&self) -> RunningVariance {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `f` to the statistics while holding the arm's lock.
    pub(crate) fn update_with(&self, f: impl FnOnce(&mut RunningVariance)) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut stats);
    }

    pub(crate) fn replace_stats(&mut self, stats: RunningVariance) {
        *self.stats.get_mut().unwrap_or_else(PoisonError::into_inner) = stats;
    }
}
