//! Small models for focused tests.

use std::sync::Arc;

use comboforge_core::{Model, ModelBuilder};

/// A boolean `b` and a nominal `n` over 1..=5, at most one selected.
///
/// Since `n` is always selected, `b` must be false in every solution.
pub fn bool_nominal_model() -> Arc<Model> {
    Arc::new(
        ModelBuilder::new("Root")
            .boolean("b")
            .nominal("n", [1, 2, 3, 4, 5])
            .at_most(1, ["b", "n"])
            .build()
            .expect("valid model"),
    )
}

/// `count` booleans `x0..` of which at most `limit` may be true.
pub fn exclusive_booleans(count: usize, limit: usize) -> Arc<Model> {
    let names: Vec<String> = (0..count).map(|i| format!("x{}", i)).collect();
    let mut builder = ModelBuilder::new("Root");
    for name in &names {
        builder = builder.boolean(name.as_str());
    }
    Arc::new(
        builder
            .at_most(limit, names)
            .build()
            .expect("valid model"),
    )
}

/// Two always-selected variables under an at-most-one constraint.
pub fn forced_overflow_model() -> Arc<Model> {
    Arc::new(
        ModelBuilder::new("Root")
            .constant("k", 1)
            .nominal("n", ["a", "b"])
            .boolean("free")
            .at_most(1, ["k", "n", "free"])
            .build()
            .expect("valid model"),
    )
}

/// A three-level tree with repeated local names and constraints at each
/// level.
pub fn nested_model() -> Arc<Model> {
    Arc::new(
        ModelBuilder::new("Root")
            .boolean("flag")
            .multi_select("tags", ["red", "green", "blue"], 0, 2)
            .at_most(1, ["/flag", "tags", "Inner/flag"])
            .child(
                ModelBuilder::new("Inner")
                    .boolean("flag")
                    .boolean("other")
                    .nominal("size", ["s", "m", "l"])
                    .at_most(1, ["flag", "other"])
                    .child(
                        ModelBuilder::new("Leaf")
                            .boolean("a")
                            .boolean("b")
                            .boolean("c")
                            .at_most(1, ["a", "b", "c"]),
                    ),
            )
            .build()
            .expect("valid model"),
    )
}
