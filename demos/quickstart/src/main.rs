//! Quickstart for ComboForge.
//!
//! Builds a small model with a nested sub-model, prints a random feasible
//! assignment, and runs a Thompson sampling bandit over candidate
//! assignments. Pass a TOML or YAML file to override the configuration;
//! set `RUST_LOG=debug` for more log output.

use std::error::Error;
use std::sync::Arc;

use comboforge::prelude::*;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    comboforge::console::init();

    let config = match std::env::args().nth(1) {
        Some(path) => ComboConfig::load(path)?,
        None => ComboConfig::default(),
    };

    // Some variables, one explicit constraint, and one child model.
    let model = Arc::new(
        ModelBuilder::new("Root")
            .boolean("boolean variable")
            .constant("wrapper around constant", 10)
            .nominal("only one of", [1, 2, 3, 4, 5])
            .optional_multiple("any number of", ["a", "b", "c"])
            .at_most(1, ["boolean variable", "any number of"])
            .child(ModelBuilder::new("Child model").boolean("Child model variable"))
            .build()?,
    );

    let solver = ModelSolver::new(Arc::clone(&model)).with_config(config.solver.clone());
    let assignment = match config.random_seed {
        Some(seed) => solver.witness_seeded(&Context::new(), seed)?,
        None => solver.witness(&Context::new(), &mut rand::rng())?,
    };
    println!("{}", assignment);
    println!("{}", assignment.get_bool("boolean variable")?);
    // Child variables resolve unqualified while the name is unique.
    println!("{}", assignment.get_bool("Child model variable")?);
    println!(
        "{}",
        assignment
            .sub_assignment("Child model")?
            .get_bool("Child model variable")?
    );
    println!("Optional multiple: {:?}", assignment.get_as::<Vec<String>>("any number of")?);
    println!("Mandatory nominal: {}", assignment.get_int("only one of")?);
    println!();

    // Competes over a fixed list of generated assignments.
    let bandit = ModelBanditBuilder::from_config(Arc::clone(&model), &config).build()?;
    info!(event = "quickstart_bandit", arms = bandit.len());

    let chosen = bandit.choose(&Context::new())?;
    bandit.update(chosen, -2.0)?;

    let context = Context::from(model.fixed("only one of", 5)?);
    let chosen = bandit.choose(&context)?;
    println!("{}", chosen);
    bandit.update(chosen, 1.0)?;
    println!("Should be 5: {}", chosen.get_int("only one of")?);

    let stats = bandit.statistics();
    println!(
        "{} choices, {} updates, average reward {:.2}",
        stats.choices,
        stats.updates,
        stats.avg_reward()
    );
    Ok(())
}
