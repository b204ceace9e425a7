//! ComboForge Solver
//!
//! This crate provides the local search solver for ComboForge models:
//! - `ModelSolver` with single, sequential and parallel witness generation
//! - Random initialization and AtMost repair phases
//! - Exhaustive enumeration of small models
//! - Repair step termination
//! - Statistics collection

pub mod phase;
mod scope;
pub mod solver;
pub mod statistics;
pub mod termination;

pub use comboforge_config::{RepairPolicy, SolverConfig};
pub use phase::{
    value_count, ExhaustiveSearch, RandomInitializer, RepairOutcome, RepairPhase,
    EXHAUSTIVE_VALUE_LIMIT,
};
pub use solver::ModelSolver;
pub use statistics::{SolverStatistics, StatisticsCollector};
pub use termination::StepCountTermination;
