//! Shared test fixtures for ComboForge crates.
//!
//! This crate provides ready-made models and assertion helpers. It depends
//! only on `comboforge-core` so every other crate can use it as a
//! dev-dependency.
//!
//! - [`demo`] - The quickstart model with a nested sub-model
//! - [`small`] - Tiny models that exercise one rule each
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! comboforge-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use comboforge_test::{demo_model, assert_feasible};
//! ```

pub mod demo;
pub mod small;

pub use demo::demo_model;
pub use small::{bool_nominal_model, exclusive_booleans, forced_overflow_model, nested_model};

use comboforge_core::{Assignment, Context};

/// Panics unless `assignment` is complete, feasible and agrees with `context`.
pub fn assert_feasible(assignment: &Assignment, context: &Context) {
    assert!(assignment.is_complete(), "incomplete: {}", assignment);
    assert!(assignment.is_feasible(), "infeasible: {}", assignment);
    assert!(
        assignment.satisfies(context),
        "context violated: {}",
        assignment
    );
}
