//! Constraint repair by flipping selected variables off.

use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

use comboforge_config::RepairPolicy;
use comboforge_core::{ConstraintId, Model, VariableId};

use crate::scope::SearchScope;
use crate::statistics::StatisticsCollector;
use crate::termination::StepCountTermination;

/// How a repair run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Every constraint holds.
    Repaired,
    /// The flip limit was reached with constraints still violated.
    StepLimitReached,
    /// A violated constraint has nothing left to switch off.
    Stuck(ConstraintId),
}

/// Local search that repairs AtMost violations.
///
/// Each step picks a violated constraint uniformly at random and switches
/// off one of its selected, flippable variables. Flips only ever remove
/// selections, so every step strictly lowers the selected count of the
/// chosen constraint.
#[derive(Debug, Clone)]
pub struct RepairPhase {
    policy: RepairPolicy,
    termination: StepCountTermination,
}

impl RepairPhase {
    pub fn new(policy: RepairPolicy, termination: StepCountTermination) -> Self {
        Self {
            policy,
            termination,
        }
    }

    pub(crate) fn solve<R: Rng + ?Sized>(
        &self,
        model: &Model,
        scope: &mut SearchScope<'_>,
        rng: &mut R,
        statistics: &StatisticsCollector,
    ) -> RepairOutcome {
        loop {
            let violated = scope.violated_constraints();
            if violated.is_empty() {
                return RepairOutcome::Repaired;
            }
            if self.termination.is_terminated(scope) {
                return RepairOutcome::StepLimitReached;
            }

            let constraint = violated[rng.random_range(0..violated.len())];
            let candidates: SmallVec<[VariableId; 8]> = model
                .constraint(constraint)
                .variables()
                .iter()
                .copied()
                .filter(|&v| scope.is_flippable(v))
                .collect();
            if candidates.is_empty() {
                return RepairOutcome::Stuck(constraint);
            }

            let variable = match self.policy {
                RepairPolicy::Random => candidates[rng.random_range(0..candidates.len())],
                RepairPolicy::LowestPath => candidates.iter().copied().min().unwrap_or(candidates[0]),
            };
            scope.flip(variable);
            statistics.record_repair_step();

            trace!(
                event = "repair_step",
                step = scope.step_count(),
                constraint = constraint.index(),
                variable = model.variable(variable).path(),
                violated = violated.len(),
            );
        }
    }
}
