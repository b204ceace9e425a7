//! Tests for ComboForge configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        random_seed = 42

        [solver]
        restarts = 3
        repair_policy = "lowest_path"
        max_repair_steps = 1000

        [bandit]
        arm_limit = 64
        maximize = false
        [bandit.posterior]
        type = "binomial"
        prior_weight = 4.0
    "#;

    let config = ComboConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.solver.restarts, 3);
    assert_eq!(config.solver.repair_policy, RepairPolicy::LowestPath);
    assert_eq!(config.solver.repair_step_limit(1), 1000);
    assert_eq!(config.bandit.arm_limit, 64);
    assert!(!config.bandit.maximize);
    match config.bandit.posterior {
        PosteriorConfig::Binomial(prior) => {
            assert_eq!(prior.prior_weight, 4.0);
            assert_eq!(prior.prior_mean, 0.5);
        }
        other => panic!("unexpected posterior {:?}", other),
    }
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        random_seed: 7
        solver:
          repair_steps_per_variable: 20
        bandit:
          posterior:
            type: normal
            prior_mean: 1.5
    "#;

    let config = ComboConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.random_seed, Some(7));
    assert_eq!(config.solver.restarts, 5);
    assert_eq!(config.solver.repair_step_limit(10), 200);
    assert_eq!(
        config.bandit.posterior,
        PosteriorConfig::Normal(NormalPriorConfig {
            prior_mean: 1.5,
            ..NormalPriorConfig::default()
        })
    );
}

#[test]
fn test_empty_document_gives_defaults() {
    let config = ComboConfig::from_toml_str("").unwrap();
    assert_eq!(config, ComboConfig::default());
    assert_eq!(config.solver.repair_policy, RepairPolicy::Random);
    assert_eq!(config.solver.repair_step_limit(5), 100);
    assert!(config.bandit.maximize);
}

#[test]
fn test_builder() {
    let config = ComboConfig::new()
        .with_random_seed(123)
        .with_solver(SolverConfig::new().with_restarts(2).with_max_repair_steps(50))
        .with_bandit(BanditConfig::new().with_arm_limit(10).with_maximize(false));

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.solver.restarts, 2);
    assert_eq!(config.bandit.arm_limit, 10);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validation_rejects_nonsense() {
    let bad = [
        "[solver]\nrestarts = 0",
        "[solver]\nmax_repair_steps = 0",
        "[solver]\nmin_repair_steps = 0",
        "[bandit]\narm_limit = 0",
        "[bandit.posterior]\ntype = \"normal\"\nprior_weight = 0.0",
        "[bandit.posterior]\ntype = \"normal\"\nprior_squared_deviations = -1.0",
        "[bandit.posterior]\ntype = \"binomial\"\nprior_mean = 1.0",
    ];
    for doc in bad {
        assert!(
            matches!(ComboConfig::from_toml_str(doc), Err(ConfigError::Invalid(_))),
            "accepted {}",
            doc
        );
    }
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        ComboConfig::from_toml_str("[solver\n"),
        Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
        ComboConfig::from_yaml_str("solver: [1, 2"),
        Err(ConfigError::Yaml(_))
    ));
    assert!(matches!(
        ComboConfig::load("/nonexistent/combo.toml"),
        Err(ConfigError::Io(_))
    ));
}
