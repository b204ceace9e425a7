//! Repair step termination.

use crate::scope::SearchScope;

/// Abandons an attempt after a number of repair flips.
///
/// # Example
///
/// ```
/// use comboforge_solver::StepCountTermination;
///
/// // Give up after 1000 flips
/// let term = StepCountTermination::new(1000);
/// assert_eq!(term.limit(), 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub(crate) fn is_terminated(&self, scope: &SearchScope<'_>) -> bool {
        scope.step_count() >= self.limit
    }
}
