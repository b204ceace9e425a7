//! A bandit whose arms are assignments of one model.

mod builder;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use comboforge_core::{Assignment, ComboError, Context, Model, Result};

use crate::arm::Arm;
use crate::policy::{argmax, BanditPolicy, ThompsonSampling};
use crate::posterior::ConfiguredPosterior;
use crate::snapshot::{ArmSnapshot, BanditSnapshot};
use crate::stats::RunningVariance;
use crate::statistics::{BanditStatistics, BanditStatisticsCollector};

pub use builder::ModelBanditBuilder;

/// An online competition between a fixed set of candidate assignments.
///
/// Each arm pairs an [`Assignment`] with its own reward statistics behind
/// its own lock. `choose` copies the statistics of every eligible arm and
/// lets the policy pick one; `update` locks only the arm being rewarded.
/// The bandit is `Send + Sync` and meant to be shared by serving threads.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use comboforge_bandit::{ModelBandit, NormalPosterior, ThompsonSampling};
/// use comboforge_core::{Assignment, Context, ModelBuilder};
///
/// let model = Arc::new(ModelBuilder::new("Root").boolean("b").build().unwrap());
/// let on = Assignment::new(Arc::clone(&model), vec![Some(true.into())]).unwrap();
/// let off = Assignment::new(Arc::clone(&model), vec![Some(false.into())]).unwrap();
///
/// let bandit = ModelBandit::builder(model, ThompsonSampling::new(NormalPosterior::default()))
///     .assignments([on.clone(), off.clone()])
///     .seed(7)
///     .build()
///     .unwrap();
///
/// for _ in 0..50 {
///     bandit.update(&on, 10.0).unwrap();
///     bandit.update(&off, -10.0).unwrap();
/// }
/// let chosen = bandit.choose(&Context::new()).unwrap();
/// assert!(chosen.get_bool("b").unwrap());
/// ```
#[derive(Debug)]
pub struct ModelBandit<P = ThompsonSampling<ConfiguredPosterior>> {
    model: Arc<Model>,
    policy: P,
    arms: Vec<Arm>,
    index: HashMap<Assignment, usize>,
    maximize: bool,
    seed: u64,
    step: AtomicU64,
    statistics: BanditStatisticsCollector,
}

impl<P: BanditPolicy> ModelBandit<P> {
    /// Starts building a bandit over `model` driven by `policy`.
    pub fn builder(model: Arc<Model>, policy: P) -> ModelBanditBuilder<P> {
        ModelBanditBuilder::new(model, policy)
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Whether larger rewards are better.
    pub fn maximize(&self) -> bool {
        self.maximize
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    pub fn arms(&self) -> &[Arm] {
        &self.arms
    }

    pub fn arm(&self, index: usize) -> Option<&Arm> {
        self.arms.get(index)
    }

    pub fn assignment(&self, index: usize) -> Option<&Assignment> {
        self.arms.get(index).map(Arm::assignment)
    }

    /// A consistent copy of one arm's statistics.
    pub fn arm_stats(&self, index: usize) -> Option<RunningVariance> {
        self.arms.get(index).map(Arm::stats)
    }

    /// Position of the arm holding an assignment equal to `assignment`.
    pub fn index_of(&self, assignment: &Assignment) -> Option<usize> {
        self.index.get(assignment).copied()
    }

    pub fn statistics(&self) -> BanditStatistics {
        self.statistics.snapshot()
    }

    /// Picks an arm consistent with `context`.
    ///
    /// Each call draws from its own `ChaCha8Rng`, seeded from the bandit
    /// seed and a call counter, so a single-threaded sequence of calls is
    /// reproducible for a fixed seed.
    ///
    /// # Errors
    ///
    /// - [`ComboError::NotFound`] or [`ComboError::InvalidValue`] if the
    ///   context does not fit the model.
    /// - [`ComboError::Unsatisfiable`] if no arm agrees with every context
    ///   value.
    pub fn choose(&self, context: &Context) -> Result<&Assignment> {
        let step = self.step.fetch_add(1, Ordering::Relaxed);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(step);
        self.choose_with_rng(context, &mut rng)
    }

    /// Like [`ModelBandit::choose`], drawing from `rng`.
    pub fn choose_with_rng<R: Rng + ?Sized>(
        &self,
        context: &Context,
        rng: &mut R,
    ) -> Result<&Assignment> {
        let index = self.select(context, |stats| self.policy.score(stats, &mut *rng))?;
        self.statistics.record_choice();
        trace!(event = "choose", model = self.model.name(), arm = index);
        Ok(self.arms[index].assignment())
    }

    /// Like [`ModelBandit::choose`], panicking with the error message on
    /// failure.
    pub fn choose_or_panic(&self, context: &Context) -> &Assignment {
        self.choose(context).unwrap_or_else(|e| panic!("{}", e))
    }

    /// The consistent arm with the best posterior mean, without exploring.
    pub fn optimal(&self, context: &Context) -> Result<&Assignment> {
        let index = self.select(context, |stats| self.policy.mean(stats))?;
        Ok(self.arms[index].assignment())
    }

    /// Records a reward of weight one for the arm holding `assignment`.
    ///
    /// # Errors
    ///
    /// [`ComboError::UnknownArm`] if no arm holds an equal assignment or
    /// `assignment` belongs to another model instance, and
    /// [`ComboError::InvalidValue`] for a reward that is not finite. In both
    /// cases no statistics change.
    pub fn update(&self, assignment: &Assignment, reward: f64) -> Result<()> {
        self.update_weighted(assignment, reward, 1.0)
    }

    /// Records a reward counting as `weight` observations.
    pub fn update_weighted(&self, assignment: &Assignment, reward: f64, weight: f64) -> Result<()> {
        if !reward.is_finite() {
            return Err(ComboError::InvalidValue {
                name: "reward".to_string(),
                reason: format!("{} is not a finite number", reward),
            });
        }
        if !(weight.is_finite() && weight > 0.0) {
            return Err(ComboError::InvalidValue {
                name: "weight".to_string(),
                reason: format!("{} is not a positive finite number", weight),
            });
        }
        let own_model = Arc::ptr_eq(&self.model, assignment.model());
        let Some(index) = own_model.then(|| self.index_of(assignment)).flatten() else {
            self.statistics.record_unknown_arm();
            debug!(event = "unknown_arm", model = self.model.name(), arm = %assignment);
            return Err(ComboError::UnknownArm);
        };

        self.arms[index].update_with(|stats| self.policy.update(stats, reward, weight));
        self.statistics.record_update(reward);
        trace!(
            event = "update",
            model = self.model.name(),
            arm = index,
            reward = reward,
            weight = weight,
        );
        Ok(())
    }

    /// Copies every arm's assignment and statistics.
    pub fn export(&self) -> BanditSnapshot {
        BanditSnapshot {
            model: self.model.name().to_string(),
            arms: self
                .arms
                .iter()
                .map(|arm| ArmSnapshot {
                    values: arm.assignment().to_map(),
                    stats: arm.stats(),
                })
                .collect(),
        }
    }

    /// Index of the best eligible arm under `score`, negated when
    /// minimizing.
    fn select(
        &self,
        context: &Context,
        mut score: impl FnMut(&RunningVariance) -> f64,
    ) -> Result<usize> {
        context.validate(&self.model)?;

        let eligible: Vec<usize> = self
            .arms
            .iter()
            .enumerate()
            .filter(|(_, arm)| arm.assignment().satisfies(context))
            .map(|(i, _)| i)
            .collect();

        let sign = if self.maximize { 1.0 } else { -1.0 };
        match argmax(eligible.iter().map(|&i| sign * score(&self.arms[i].stats()))) {
            Some(position) => Ok(eligible[position]),
            None => {
                self.statistics.record_rejection();
                debug!(
                    event = "context_rejected",
                    model = self.model.name(),
                    fixed = context.len(),
                    arms = self.arms.len(),
                );
                Err(ComboError::Unsatisfiable(format!(
                    "no arm of '{}' is consistent with the context",
                    self.model.name()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests;
