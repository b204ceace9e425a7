//! The quickstart model.

use std::sync::Arc;

use comboforge_core::{Model, ModelBuilder};

/// Name of the nested sub-model.
pub const CHILD: &str = "Child model";

/// Builds the demo model.
///
/// - `boolean variable`: boolean
/// - `wrapper around constant`: constant 10
/// - `only one of`: nominal over 1..=5
/// - `any number of`: optional subset of a, b, c
/// - at most one of `boolean variable` and `any number of`
/// - child `Child model` with a boolean `Child model variable`
pub fn demo_model() -> Arc<Model> {
    let model = ModelBuilder::new("Demo")
        .boolean("boolean variable")
        .constant("wrapper around constant", 10)
        .nominal("only one of", [1, 2, 3, 4, 5])
        .optional_multiple("any number of", ["a", "b", "c"])
        .at_most(1, ["boolean variable", "any number of"])
        .child(ModelBuilder::new(CHILD).boolean("Child model variable"))
        .build()
        .expect("demo model is valid");
    Arc::new(model)
}
