//! ComboForge - Combinatorial decisions in Rust
//!
//! Declare a model of choices, find feasible assignments with the repair
//! solver, and let a bandit learn which assignment earns the most reward.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use comboforge::prelude::*;
//!
//! let model = Arc::new(
//!     ModelBuilder::new("Root")
//!         .boolean("b")
//!         .nominal("n", [1, 2, 3, 4, 5])
//!         .at_most(1, ["b", "n"])
//!         .build()
//!         .unwrap(),
//! );
//!
//! let solver = ModelSolver::new(Arc::clone(&model));
//! let witness = solver.witness_seeded(&Context::new(), 0).unwrap();
//! assert!(!witness.get_bool("b").unwrap());
//!
//! let bandit = ModelBanditBuilder::from_config(model, &ComboConfig::default())
//!     .arm_limit(10)
//!     .build()
//!     .unwrap();
//! let chosen = bandit.choose(&Context::new()).unwrap();
//! bandit.update(chosen, 1.0).unwrap();
//! ```

pub use comboforge_core::{
    Assignment, ComboError, Constraint, ConstraintId, Context, FixedValue, FromValue, Model,
    ModelBuilder, Result, ScopeId, ScopeNode, Value, Variable, VariableId, VariableKind,
    PATH_SEPARATOR,
};

pub use comboforge_config::{
    BanditConfig, BinomialPriorConfig, ComboConfig, ConfigError, NormalPriorConfig,
    PosteriorConfig, RepairPolicy, SolverConfig,
};

pub use comboforge_solver::{ModelSolver, SolverStatistics, StepCountTermination};

pub use comboforge_bandit::{
    Arm, ArmSnapshot, BanditPolicy, BanditSnapshot, BanditStatistics, BinomialPosterior,
    ConfiguredPosterior, Greedy, ModelBandit, ModelBanditBuilder, NormalPosterior, NormalPrior,
    Posterior, RunningVariance, ThompsonSampling,
};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{Assignment, ComboError, Context, Model, ModelBuilder, Value};
    pub use super::{ComboConfig, SolverConfig};
    pub use super::ModelSolver;
    pub use super::{
        BanditPolicy, ModelBandit, ModelBanditBuilder, NormalPosterior, Posterior,
        ThompsonSampling,
    };
}
