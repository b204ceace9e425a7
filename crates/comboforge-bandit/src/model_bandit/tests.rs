//! Tests for the model bandit.

use super::*;
use crate::posterior::NormalPosterior;
use comboforge_config::{BanditConfig, BinomialPriorConfig, ComboConfig, PosteriorConfig};
use comboforge_core::{ModelBuilder, Value};
use comboforge_test::{bool_nominal_model, demo_model, exclusive_booleans};

type NormalBandit = ModelBandit<ThompsonSampling<NormalPosterior>>;

fn thompson() -> ThompsonSampling<NormalPosterior> {
    ThompsonSampling::new(NormalPosterior::default())
}

fn bools(model: &Arc<Model>, values: &[bool]) -> Assignment {
    let values = values.iter().map(|&b| Some(Value::Bool(b))).collect();
    Assignment::new(Arc::clone(model), values).unwrap()
}

/// A bandit over one boolean with the arms `x0 = true` and `x0 = false`.
fn on_off(maximize: bool) -> (NormalBandit, Assignment, Assignment) {
    let model = exclusive_booleans(1, 1);
    let on = bools(&model, &[true]);
    let off = bools(&model, &[false]);
    let bandit = ModelBandit::builder(model, thompson())
        .assignments([on.clone(), off.clone()])
        .maximize(maximize)
        .seed(1)
        .build()
        .unwrap();
    (bandit, on, off)
}

fn train(bandit: &NormalBandit, on: &Assignment, off: &Assignment) {
    for _ in 0..50 {
        bandit.update(on, 10.0).unwrap();
        bandit.update(off, -10.0).unwrap();
    }
}

#[test]
fn test_rewarded_arm_wins() {
    let (bandit, on, off) = on_off(true);
    train(&bandit, &on, &off);

    let context = Context::new();
    let wins = (0..1000)
        .filter(|_| bandit.choose(&context).unwrap() == &on)
        .count();
    assert!(wins >= 950, "rewarded arm chosen {} of 1000 times", wins);
    assert_eq!(bandit.statistics().choices, 1000);
}

#[test]
fn test_minimize_prefers_low_rewards() {
    let (bandit, on, off) = on_off(false);
    train(&bandit, &on, &off);

    let context = Context::new();
    let wins = (0..1000)
        .filter(|_| bandit.choose(&context).unwrap() == &off)
        .count();
    assert!(wins >= 950, "low-reward arm chosen {} of 1000 times", wins);
    assert_eq!(bandit.optimal(&context).unwrap(), &off);
}

#[test]
fn test_optimal_uses_posterior_mean() {
    let (bandit, on, off) = on_off(true);
    bandit.update(&on, 1.0).unwrap();
    bandit.update(&off, 0.5).unwrap();
    let context = Context::new();
    for _ in 0..10 {
        assert_eq!(bandit.optimal(&context).unwrap(), &on);
    }
}

#[test]
fn test_concurrent_updates_are_not_lost() {
    let (bandit, on, off) = on_off(true);
    let threads = 8;

    std::thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                for _ in 0..1000 {
                    bandit.update(&on, 1.0).unwrap();
                }
            });
        }
        s.spawn(|| {
            let context = Context::new();
            for _ in 0..1000 {
                bandit.choose(&context).unwrap();
            }
        });
    });

    let on_index = bandit.index_of(&on).unwrap();
    let off_index = bandit.index_of(&off).unwrap();
    let stats = bandit.arm_stats(on_index).unwrap();
    assert_eq!(stats.count(), threads * 1000);
    assert!((stats.mean() - 1.0).abs() < 1e-3);
    assert_eq!(bandit.arm_stats(off_index).unwrap().count(), 0);

    let totals = bandit.statistics();
    assert_eq!(totals.updates, threads * 1000);
    assert_eq!(totals.reward_sum, (threads * 1000) as f64);
    assert_eq!(totals.choices, 1000);
}

#[test]
fn test_unknown_arm_changes_nothing() {
    let model = exclusive_booleans(2, 2);
    let known = bools(&model, &[true, false]);
    let stranger = bools(&model, &[false, true]);
    let bandit = ModelBandit::builder(Arc::clone(&model), thompson())
        .arm(known.clone())
        .seed(0)
        .build()
        .unwrap();
    let before = bandit.arm_stats(0).unwrap();

    assert!(matches!(
        bandit.update(&stranger, 5.0),
        Err(ComboError::UnknownArm)
    ));
    assert_eq!(bandit.arm_stats(0).unwrap(), before);
    assert_eq!(bandit.statistics().unknown_arms, 1);
    assert_eq!(bandit.statistics().updates, 0);

    // Equal values are enough; identity of the assignment does not matter.
    bandit.update(&bools(&model, &[true, false]), 5.0).unwrap();
    assert_eq!(bandit.arm_stats(0).unwrap().count(), 1);
}

#[test]
fn test_update_from_other_model_is_unknown_arm() {
    let (bandit, on, _) = on_off(true);
    let twin = exclusive_booleans(1, 1);
    let other = Arc::new(
        ModelBuilder::new("Other")
            .nominal("z", [true, false])
            .build()
            .unwrap(),
    );
    let before = bandit.arm_stats(0).unwrap();

    for stranger in [bools(&twin, &[true]), bools(&other, &[true])] {
        assert_eq!(stranger, on);
        assert!(matches!(
            bandit.update(&stranger, 5.0),
            Err(ComboError::UnknownArm)
        ));
    }
    assert_eq!(bandit.arm_stats(0).unwrap(), before);
    assert_eq!(bandit.statistics().unknown_arms, 2);
    assert_eq!(bandit.statistics().updates, 0);
}

#[test]
fn test_non_finite_rewards_are_rejected() {
    let (bandit, on, _) = on_off(true);
    for reward in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            bandit.update(&on, reward),
            Err(ComboError::InvalidValue { .. })
        ));
    }
    assert!(matches!(
        bandit.update_weighted(&on, 1.0, 0.0),
        Err(ComboError::InvalidValue { .. })
    ));
    assert_eq!(bandit.arm_stats(0).unwrap().count(), 0);
}

#[test]
fn test_weighted_update() {
    let (bandit, on, _) = on_off(true);
    bandit.update_weighted(&on, 2.0, 3.0).unwrap();
    let stats = bandit.arm_stats(0).unwrap();
    assert_eq!(stats.count(), 1);
    assert!((stats.weight() - 3.02).abs() < 1e-12);
}

#[test]
fn test_context_restricts_generated_arms() {
    let model = bool_nominal_model();
    let bandit = ModelBandit::builder(Arc::clone(&model), thompson())
        .arm_limit(20)
        .seed(3)
        .build()
        .unwrap();
    assert_eq!(bandit.len(), 5);
    for arm in bandit.arms() {
        assert!(arm.assignment().is_feasible());
        assert_eq!(arm.stats(), bandit.policy().prior());
    }

    let n = bandit.assignment(0).unwrap().get_int("n").unwrap();
    let context = Context::from(model.fixed("n", n).unwrap());
    for _ in 0..100 {
        let chosen = bandit.choose(&context).unwrap();
        assert_eq!(chosen.get_int("n").unwrap(), n);
    }

    // Every feasible arm has `b` switched off.
    let impossible = Context::from(model.fixed("b", true).unwrap());
    assert!(matches!(
        bandit.choose(&impossible),
        Err(ComboError::Unsatisfiable(_))
    ));
    assert_eq!(bandit.statistics().rejections, 1);
}

#[test]
fn test_small_model_arms_cover_every_solution() {
    let model = demo_model();
    let bandit = ModelBandit::builder(Arc::clone(&model), thompson())
        .arm_limit(500)
        .seed(8)
        .build()
        .unwrap();
    assert_eq!(bandit.len(), 90);

    let large = exclusive_booleans(24, 2);
    let sampled = ModelBandit::builder(Arc::clone(&large), thompson())
        .arm_limit(5)
        .seed(8)
        .build()
        .unwrap();
    assert!(!sampled.is_empty() && sampled.len() <= 5);
    for arm in sampled.arms() {
        assert!(arm.assignment().is_feasible());
    }
}

#[test]
fn test_context_from_other_model_is_rejected() {
    let (bandit, _, _) = on_off(true);
    let other = ModelBuilder::new("Other")
        .boolean("a")
        .boolean("b")
        .boolean("c")
        .build()
        .unwrap();
    let context = Context::from(other.fixed("c", true).unwrap());
    assert!(bandit.choose(&context).is_err());
}

#[test]
#[should_panic(expected = "Unsatisfiable")]
fn test_choose_or_panic_panics() {
    let model = exclusive_booleans(1, 1);
    let bandit = ModelBandit::builder(Arc::clone(&model), thompson())
        .arm(bools(&model, &[false]))
        .build()
        .unwrap();
    let context = Context::from(model.fixed("x0", true).unwrap());
    bandit.choose_or_panic(&context);
}

#[test]
fn test_same_seed_same_choices() {
    let choices = |seed: u64| -> Vec<usize> {
        let bandit = ModelBandit::builder(demo_model(), thompson())
            .arm_limit(8)
            .seed(seed)
            .build()
            .unwrap();
        let context = Context::new();
        let picked: Vec<usize> = (0..50)
            .map(|_| {
                let chosen = bandit.choose(&context).unwrap();
                bandit.index_of(chosen).unwrap()
            })
            .collect();
        picked
    };
    assert_eq!(choices(21), choices(21));
}

#[test]
fn test_duplicate_assignments_collapse() {
    let (_, on, off) = on_off(true);
    let model = Arc::clone(on.model());
    let bandit = ModelBandit::builder(model, thompson())
        .assignments([on.clone(), off.clone(), on.clone()])
        .build()
        .unwrap();
    assert_eq!(bandit.len(), 2);
    assert_eq!(bandit.index_of(&on), Some(0));
    assert_eq!(bandit.index_of(&off), Some(1));
}

#[test]
fn test_build_rejects_foreign_and_partial_arms() {
    let model = exclusive_booleans(1, 1);
    let twin = exclusive_booleans(1, 1);
    let foreign = bools(&twin, &[true]);
    assert!(matches!(
        ModelBandit::builder(Arc::clone(&model), thompson())
            .arm(foreign)
            .build(),
        Err(ComboError::InvalidValue { .. })
    ));

    let nested = Arc::new(
        ModelBuilder::new("R")
            .boolean("a")
            .child(ModelBuilder::new("C").boolean("b"))
            .build()
            .unwrap(),
    );
    let view = bools(&nested, &[true, false]).sub_assignment("C").unwrap();
    assert!(matches!(
        ModelBandit::builder(Arc::clone(&nested), thompson())
            .arm(view)
            .build(),
        Err(ComboError::InvalidValue { .. })
    ));

    assert!(matches!(
        ModelBandit::builder(model, thompson()).arm_limit(0).build(),
        Err(ComboError::InvalidModel(_))
    ));
}

#[test]
fn test_snapshot_round_trip() {
    let model = demo_model();
    let bandit = ModelBandit::builder(Arc::clone(&model), thompson())
        .arm_limit(6)
        .seed(5)
        .build()
        .unwrap();
    for (i, arm) in bandit.arms().iter().enumerate() {
        bandit.update(arm.assignment(), i as f64).unwrap();
    }

    let json = serde_json::to_string(&bandit.export()).unwrap();
    let snapshot: BanditSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot.model, "Demo");
    assert_eq!(snapshot.len(), bandit.len());
    assert_eq!(snapshot.observations(), bandit.len() as u64);

    let restored = ModelBandit::builder(Arc::clone(&model), thompson())
        .import(&snapshot)
        .unwrap()
        .seed(5)
        .build()
        .unwrap();
    assert_eq!(restored.len(), bandit.len());
    for (a, b) in bandit.arms().iter().zip(restored.arms()) {
        assert_eq!(a.assignment(), b.assignment());
        assert_eq!(a.stats(), b.stats());
    }
}

#[test]
fn test_import_merges_with_explicit_arms() {
    let (trained, on, off) = on_off(true);
    train(&trained, &on, &off);
    let snapshot = trained.export();

    let model = Arc::clone(on.model());
    let bandit = ModelBandit::builder(Arc::clone(&model), thompson())
        .arm(off.clone())
        .import(&snapshot)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(bandit.len(), 2);
    assert_eq!(bandit.index_of(&off), Some(0));
    assert_eq!(bandit.arm_stats(0).unwrap().count(), 50);
    assert_eq!(bandit.arm_stats(1).unwrap().mean(), trained.arm_stats(0).unwrap().mean());
}

#[test]
fn test_import_rejects_unknown_paths() {
    let (_, on, _) = on_off(true);
    let mut snapshot = BanditSnapshot::default();
    snapshot.arms.push(crate::snapshot::ArmSnapshot {
        values: [("missing".to_string(), Value::Bool(true))].into_iter().collect(),
        stats: RunningVariance::default(),
    });
    let builder = ModelBandit::builder(Arc::clone(on.model()), thompson());
    assert!(matches!(
        builder.import(&snapshot),
        Err(ComboError::NotFound(_))
    ));
}

#[test]
fn test_import_rejects_corrupt_statistics() {
    let (_, on, _) = on_off(true);
    let corrupt = [
        RunningVariance::new(f64::NAN, 0.0, 1.0),
        RunningVariance::new(0.0, f64::INFINITY, 1.0),
        RunningVariance::new(0.0, -1.0, 1.0),
        RunningVariance::new(0.0, 0.0, -1.0),
        RunningVariance::new(0.0, 0.0, f64::NAN),
    ];
    for stats in corrupt {
        let mut snapshot = BanditSnapshot::default();
        snapshot.arms.push(crate::snapshot::ArmSnapshot {
            values: on.to_map(),
            stats,
        });
        let builder = ModelBandit::builder(Arc::clone(on.model()), thompson());
        assert!(
            matches!(builder.import(&snapshot), Err(ComboError::InvalidValue { .. })),
            "accepted {:?}",
            stats
        );
    }

    let mut snapshot = BanditSnapshot::default();
    snapshot.arms.push(crate::snapshot::ArmSnapshot {
        values: on.to_map(),
        stats: RunningVariance::new(2.0, 0.5, 3.0),
    });
    let bandit = ModelBandit::builder(Arc::clone(on.model()), thompson())
        .import(&snapshot)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(bandit.arm_stats(0).unwrap().mean(), 2.0);
}

#[test]
fn test_from_config() {
    let config = ComboConfig::default()
        .with_random_seed(12)
        .with_bandit(
            BanditConfig::default()
                .with_arm_limit(3)
                .with_maximize(false)
                .with_posterior(PosteriorConfig::Binomial(BinomialPriorConfig::default())),
        );
    let bandit = ModelBanditBuilder::from_config(demo_model(), &config)
        .build()
        .unwrap();
    assert_eq!(bandit.seed(), 12);
    assert!(!bandit.maximize());
    assert_eq!(bandit.len(), 3);
    assert!(matches!(
        bandit.policy().posterior(),
        ConfiguredPosterior::Binomial(_)
    ));
    assert_eq!(bandit.arm_stats(0).unwrap().weight(), 2.0);
}
