//! Construction of model bandits.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use rand::Rng;
use tracing::info;

use comboforge_config::{BanditConfig, ComboConfig, SolverConfig};
use comboforge_core::{Assignment, ComboError, Context, Model, Result, ScopeId};
use comboforge_solver::ModelSolver;

use crate::arm::Arm;
use crate::policy::{BanditPolicy, ThompsonSampling};
use crate::posterior::ConfiguredPosterior;
use crate::snapshot::BanditSnapshot;
use crate::stats::RunningVariance;
use crate::statistics::BanditStatisticsCollector;

use super::ModelBandit;

/// Builder for [`ModelBandit`].
///
/// Arms come from explicit assignments, from an imported snapshot, or,
/// when neither is given, from up to `arm_limit` feasible assignments of the
/// model. Small models are walked completely by [`ModelSolver::enumerate`];
/// larger ones are sampled with [`ModelSolver::distinct_witnesses`].
#[derive(Debug)]
pub struct ModelBanditBuilder<P> {
    model: Arc<Model>,
    policy: P,
    assignments: Vec<Assignment>,
    imported: Vec<(Assignment, RunningVariance)>,
    arm_limit: usize,
    maximize: bool,
    seed: Option<u64>,
    solver_config: SolverConfig,
}

impl<P: BanditPolicy> ModelBanditBuilder<P> {
    pub fn new(model: Arc<Model>, policy: P) -> Self {
        let defaults = BanditConfig::default();
        Self {
            model,
            policy,
            assignments: Vec::new(),
            imported: Vec::new(),
            arm_limit: defaults.arm_limit,
            maximize: defaults.maximize,
            seed: None,
            solver_config: SolverConfig::default(),
        }
    }

    /// Adds one candidate assignment.
    pub fn arm(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    /// Adds candidate assignments in order.
    pub fn assignments(mut self, assignments: impl IntoIterator<Item = Assignment>) -> Self {
        self.assignments.extend(assignments);
        self
    }

    /// Number of witnesses requested when arms are generated.
    pub fn arm_limit(mut self, limit: usize) -> Self {
        self.arm_limit = limit;
        self
    }

    pub fn maximize(mut self, maximize: bool) -> Self {
        self.maximize = maximize;
        self
    }

    /// Seed for arm generation and for [`ModelBandit::choose`].
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Solver settings used when arms are generated.
    pub fn solver_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    /// Restores arms and their statistics from a snapshot.
    ///
    /// Snapshot arms equal to an explicit assignment replace its prior
    /// statistics; the rest become additional arms.
    ///
    /// # Errors
    ///
    /// Lookup or domain errors if a snapshot arm does not fit the model, and
    /// [`ComboError::InvalidValue`] if its statistics are not finite or
    /// carry a negative weight or spread.
    pub fn import(mut self, snapshot: &BanditSnapshot) -> Result<Self> {
        for arm in &snapshot.arms {
            let assignment = Assignment::from_map(Arc::clone(&self.model), &arm.values)?;
            check_stats(&assignment, &arm.stats)?;
            self.imported.push((assignment, arm.stats));
        }
        Ok(self)
    }

    /// Builds the bandit.
    ///
    /// Duplicate assignments collapse into one arm, keeping the first
    /// position.
    ///
    /// # Errors
    ///
    /// - [`ComboError::InvalidValue`] if an assignment belongs to another
    ///   model instance or is a view of a sub-model.
    /// - [`ComboError::Unsatisfiable`] if generation finds no witness.
    /// - [`ComboError::InvalidModel`] if the bandit would have no arms.
    pub fn build(self) -> Result<ModelBandit<P>> {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        let generated = self.assignments.is_empty() && self.imported.is_empty();
        let candidates = if generated {
            let solver = ModelSolver::new(Arc::clone(&self.model)).with_config(self.solver_config);
            if solver.is_enumerable() {
                solver.enumerate(&Context::new(), self.arm_limit)?
            } else {
                solver.distinct_witnesses(&Context::new(), self.arm_limit, seed)?
            }
        } else {
            self.assignments
        };

        let mut arms = Vec::with_capacity(candidates.len() + self.imported.len());
        let mut index = HashMap::with_capacity(arms.capacity());
        for assignment in candidates {
            check_arm(&self.model, &assignment)?;
            if let Entry::Vacant(slot) = index.entry(assignment.clone()) {
                slot.insert(arms.len());
                arms.push(Arm::new(assignment, self.policy.prior()));
            }
        }

        let restored = self.imported.len();
        for (assignment, stats) in self.imported {
            match index.entry(assignment.clone()) {
                Entry::Occupied(slot) => arms[*slot.get()].replace_stats(stats),
                Entry::Vacant(slot) => {
                    slot.insert(arms.len());
                    arms.push(Arm::new(assignment, stats));
                }
            }
        }

        if arms.is_empty() {
            return Err(ComboError::InvalidModel(format!(
                "bandit over '{}' has no arms",
                self.model.name()
            )));
        }

        info!(
            event = "bandit_built",
            model = self.model.name(),
            arms = arms.len(),
            generated = generated,
            restored = restored,
            maximize = self.maximize,
        );

        Ok(ModelBandit {
            model: self.model,
            policy: self.policy,
            arms,
            index,
            maximize: self.maximize,
            seed,
            step: AtomicU64::new(0),
            statistics: BanditStatisticsCollector::new(),
        })
    }
}

impl ModelBanditBuilder<ThompsonSampling<ConfiguredPosterior>> {
    /// A Thompson sampling builder with every setting taken from `config`.
    pub fn from_config(model: Arc<Model>, config: &ComboConfig) -> Self {
        let posterior = ConfiguredPosterior::from(&config.bandit.posterior);
        let builder = Self::new(model, ThompsonSampling::new(posterior))
            .arm_limit(config.bandit.arm_limit)
            .maximize(config.bandit.maximize)
            .solver_config(config.solver.clone());
        match config.random_seed {
            Some(seed) => builder.seed(seed),
            None => builder,
        }
    }
}

fn check_arm(model: &Arc<Model>, assignment: &Assignment) -> Result<()> {
    if !Arc::ptr_eq(model, assignment.model()) {
        return Err(ComboError::InvalidValue {
            name: assignment.model().name().to_string(),
            reason: format!(
                "assignment belongs to another model than '{}'",
                model.name()
            ),
        });
    }
    if assignment.scope() != ScopeId::ROOT {
        return Err(ComboError::InvalidValue {
            name: model.scope(assignment.scope()).path().to_string(),
            reason: "arms must be assignments of the whole model".to_string(),
        });
    }
    Ok(())
}

fn check_stats(assignment: &Assignment, stats: &RunningVariance) -> Result<()> {
    let fields = [
        ("mean", stats.mean(), false),
        ("squared_deviations", stats.squared_deviations(), true),
        ("weight", stats.weight(), true),
    ];
    for (field, value, non_negative) in fields {
        if !value.is_finite() || (non_negative && value < 0.0) {
            return Err(ComboError::InvalidValue {
                name: format!("{} of arm {}", field, assignment),
                reason: format!("{} is not a valid snapshot statistic", value),
            });
        }
    }
    Ok(())
}
