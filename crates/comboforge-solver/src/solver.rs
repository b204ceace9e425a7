//! Model solver.

use std::collections::HashSet;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use comboforge_config::SolverConfig;
use comboforge_core::{Assignment, ComboError, Context, Model, Result};

use crate::phase::{
    value_count, ExhaustiveSearch, RandomInitializer, RepairOutcome, RepairPhase,
    EXHAUSTIVE_VALUE_LIMIT,
};
use crate::scope::SearchScope;
use crate::statistics::{SolverStatistics, StatisticsCollector};
use crate::termination::StepCountTermination;

/// Finds feasible assignments of a model by randomized repair.
///
/// A solve validates the context, rejects constraints that are violated no
/// matter what, and then runs up to `restarts` attempts of random
/// initialization followed by repair. Nothing is returned until every
/// AtMost constraint holds.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use comboforge_core::{Context, ModelBuilder};
/// use comboforge_solver::ModelSolver;
///
/// let model = Arc::new(
///     ModelBuilder::new("Root")
///         .boolean("b")
///         .nominal("n", [1, 2, 3, 4, 5])
///         .at_most(1, ["b", "n"])
///         .build()
///         .unwrap(),
/// );
/// let solver = ModelSolver::new(Arc::clone(&model));
/// let context = Context::from(model.fixed("n", 5).unwrap());
///
/// let witness = solver.witness_seeded(&context, 7).unwrap();
/// assert_eq!(witness.get_int("n").unwrap(), 5);
/// assert!(!witness.get_bool("b").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ModelSolver {
    model: Arc<Model>,
    config: SolverConfig,
    initializer: RandomInitializer,
    statistics: Arc<StatisticsCollector>,
}

impl ModelSolver {
    /// Creates a solver with default settings.
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model,
            config: SolverConfig::default(),
            initializer: RandomInitializer::new(),
            statistics: Arc::new(StatisticsCollector::new()),
        }
    }

    /// Replaces the solver settings.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Counters accumulated by this solver and its clones.
    pub fn statistics(&self) -> SolverStatistics {
        self.statistics.snapshot()
    }

    /// Flip limit for one attempt on this model.
    pub fn repair_step_limit(&self) -> u64 {
        self.config.repair_step_limit(self.model.variable_count())
    }

    /// Finds one assignment that satisfies every constraint and agrees with
    /// `context`.
    ///
    /// # Errors
    ///
    /// - [`ComboError::InvalidValue`] if a context value lies outside its
    ///   domain for this model.
    /// - [`ComboError::Unsatisfiable`] if a constraint is violated by
    ///   always-selected variables alone, or no attempt succeeds within the
    ///   flip limit.
    pub fn witness<R: Rng + ?Sized>(&self, context: &Context, rng: &mut R) -> Result<Assignment> {
        let result = self.check_context(context).and_then(|()| self.search(context, rng));
        match &result {
            Ok(_) => self.statistics.record_witness(),
            Err(e) => {
                self.statistics.record_failure();
                debug!(event = "solve_failed", model = self.model.name(), error = %e);
            }
        }
        result
    }

    /// Like [`ModelSolver::witness`], panicking with the error message on
    /// failure.
    pub fn witness_or_panic<R: Rng + ?Sized>(&self, context: &Context, rng: &mut R) -> Assignment {
        self.witness(context, rng)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// Finds one witness using a `ChaCha8Rng` seeded with `seed`.
    pub fn witness_seeded(&self, context: &Context, seed: u64) -> Result<Assignment> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.witness(context, &mut rng)
    }

    /// An endless sequence of independent solve results.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use comboforge_core::{Context, ModelBuilder};
    /// # use comboforge_solver::ModelSolver;
    /// # use rand::SeedableRng;
    /// let model = Arc::new(ModelBuilder::new("R").boolean("a").build().unwrap());
    /// let solver = ModelSolver::new(model);
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
    /// let context = Context::new();
    /// let found: Vec<_> = solver.witnesses(&context, &mut rng).take(3).collect();
    /// assert!(found.iter().all(|w| w.is_ok()));
    /// ```
    pub fn witnesses<'a, R: Rng + ?Sized>(
        &'a self,
        context: &'a Context,
        rng: &'a mut R,
    ) -> impl Iterator<Item = Result<Assignment>> + 'a {
        std::iter::repeat_with(move || self.witness(context, &mut *rng))
    }

    /// Up to `limit` distinct witnesses from at most `2 * limit` attempts.
    ///
    /// Attempts run in parallel; attempt `i` uses a `ChaCha8Rng` seeded with
    /// `seed + i`, and results keep attempt order, so the output depends only
    /// on the inputs.
    ///
    /// # Errors
    ///
    /// Context and forced-selection errors as in [`ModelSolver::witness`],
    /// or [`ComboError::Unsatisfiable`] when `limit > 0` and no attempt
    /// succeeds.
    pub fn distinct_witnesses(
        &self,
        context: &Context,
        limit: usize,
        seed: u64,
    ) -> Result<Vec<Assignment>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.check_context(context)?;

        let attempts = limit.saturating_mul(2);
        let results: Vec<Option<Assignment>> = (0..attempts)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
                self.witness(context, &mut rng).ok()
            })
            .collect();

        let mut seen = HashSet::with_capacity(limit);
        let mut distinct = Vec::with_capacity(limit);
        for witness in results.into_iter().flatten() {
            if distinct.len() == limit {
                break;
            }
            if seen.insert(witness.clone()) {
                distinct.push(witness);
            }
        }

        info!(
            event = "distinct_witnesses",
            model = self.model.name(),
            requested = limit,
            attempts = attempts,
            found = distinct.len(),
        );

        if distinct.is_empty() {
            return Err(ComboError::Unsatisfiable(format!(
                "no witness found for '{}' in {} attempts",
                self.model.name(),
                attempts
            )));
        }
        Ok(distinct)
    }

    /// Whether [`ModelSolver::enumerate`] accepts this model.
    pub fn is_enumerable(&self) -> bool {
        value_count(&self.model) <= EXHAUSTIVE_VALUE_LIMIT
    }

    /// Up to `limit` feasible assignments agreeing with `context`, found by
    /// a complete depth-first walk in variable order.
    ///
    /// Unlike [`ModelSolver::distinct_witnesses`], every feasible assignment
    /// is reachable, so a limit of at least the number of solutions returns
    /// all of them.
    ///
    /// # Errors
    ///
    /// - [`ComboError::InvalidModel`] if the model spans more than
    ///   [`EXHAUSTIVE_VALUE_LIMIT`] values.
    /// - Context and forced-selection errors as in [`ModelSolver::witness`].
    /// - [`ComboError::Unsatisfiable`] when `limit > 0` and nothing is
    ///   feasible.
    pub fn enumerate(&self, context: &Context, limit: usize) -> Result<Vec<Assignment>> {
        let values = value_count(&self.model);
        if values > EXHAUSTIVE_VALUE_LIMIT {
            return Err(ComboError::InvalidModel(format!(
                "'{}' spans {} values, more than the {} that can be enumerated",
                self.model.name(),
                values,
                EXHAUSTIVE_VALUE_LIMIT
            )));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.check_context(context)?;

        let found = ExhaustiveSearch::new().solve(&self.model, context, limit);
        info!(
            event = "enumerate",
            model = self.model.name(),
            requested = limit,
            found = found.len(),
        );
        if found.is_empty() {
            return Err(ComboError::Unsatisfiable(format!(
                "'{}' has no feasible assignment",
                self.model.name()
            )));
        }
        found
            .into_iter()
            .map(|values| {
                Assignment::new(Arc::clone(&self.model), values.into_iter().map(Some).collect())
            })
            .collect()
    }

    /// Validates the context and rejects constraints that always-selected
    /// variables already violate.
    fn check_context(&self, context: &Context) -> Result<()> {
        context.validate(&self.model)?;

        for constraint in self.model.constraints() {
            let forced = constraint.selected_count(|v| {
                let kind = self.model.variable(v).kind();
                match context.get(v) {
                    Some(value) if kind.is_searchable() => value.is_selected(),
                    _ => kind.is_always_selected(),
                }
            });
            if forced > constraint.limit() {
                let scope = self.model.scope(constraint.scope());
                return Err(ComboError::Unsatisfiable(format!(
                    "{} variables are always selected in a constraint of '{}' allowing at most {}",
                    forced,
                    scope.name(),
                    constraint.limit()
                )));
            }
        }
        Ok(())
    }

    fn search<R: Rng + ?Sized>(&self, context: &Context, rng: &mut R) -> Result<Assignment> {
        let limit = self.repair_step_limit();
        let repair = RepairPhase::new(self.config.repair_policy, StepCountTermination::new(limit));

        for attempt in 0..self.config.restarts {
            let values = self.initializer.initialize(&self.model, context, rng);
            let mut scope = SearchScope::new(&self.model, context, values);

            match repair.solve(&self.model, &mut scope, rng, &self.statistics) {
                RepairOutcome::Repaired => {
                    debug!(
                        event = "solve_end",
                        model = self.model.name(),
                        attempt = attempt,
                        steps = scope.step_count(),
                    );
                    return Assignment::new(Arc::clone(&self.model), scope.into_values());
                }
                RepairOutcome::StepLimitReached => {
                    self.statistics.record_restart();
                    debug!(
                        event = "restart",
                        model = self.model.name(),
                        attempt = attempt,
                        limit = limit,
                    );
                }
                RepairOutcome::Stuck(constraint) => {
                    return Err(ComboError::Unsatisfiable(format!(
                        "constraint #{} has no variable left to switch off",
                        constraint.index()
                    )));
                }
            }
        }

        Err(ComboError::Unsatisfiable(format!(
            "no feasible assignment for '{}' after {} attempts of {} flips",
            self.model.name(),
            self.config.restarts,
            limit
        )))
    }
}
