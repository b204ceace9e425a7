//! Solver phases.
//!
//! An attempt runs the [`RandomInitializer`] once and then the
//! [`RepairPhase`] until the assignment is feasible or the attempt gives up.
//! Small models can instead be walked completely by [`ExhaustiveSearch`].

mod exhaustive;
mod initializer;
mod repair;

pub use exhaustive::{value_count, ExhaustiveSearch, EXHAUSTIVE_VALUE_LIMIT};
pub use initializer::RandomInitializer;
pub use repair::{RepairOutcome, RepairPhase};
