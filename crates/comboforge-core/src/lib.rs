//! ComboForge Core - Model and assignment types for combinatorial decisions
//!
//! This crate provides the data model shared by the solver and the bandit:
//! - Values and typed extraction
//! - Variables, domains and AtMost constraints
//! - The immutable model arena with name resolution
//! - Contexts (fixed partial assignments) and immutable assignments

pub mod assignment;
pub mod constraint;
pub mod context;
pub mod error;
pub mod model;
pub mod value;
pub mod variable;

pub use assignment::Assignment;
pub use constraint::{Constraint, ConstraintId};
pub use context::{Context, FixedValue};
pub use error::{ComboError, Result};
pub use model::{Model, ModelBuilder, ScopeId, ScopeNode, PATH_SEPARATOR};
pub use value::{FromValue, Value};
pub use variable::{Variable, VariableId, VariableKind};
