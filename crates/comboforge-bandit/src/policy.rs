//! Arm selection policies.

use std::fmt::Debug;

use rand::Rng;

use crate::posterior::Posterior;
use crate::stats::RunningVariance;

/// A stateless strategy that scores arms and picks the best one.
///
/// The policy never stores per-arm state; one policy value can serve any
/// number of bandits and threads.
pub trait BanditPolicy: Send + Sync + Debug {
    /// Statistics a new arm starts from.
    fn prior(&self) -> RunningVariance;

    /// Folds one observed reward into an arm's statistics.
    fn update(&self, stats: &mut RunningVariance, reward: f64, weight: f64);

    /// Score of one arm for a single decision; higher is better.
    fn score<R: Rng + ?Sized>(&self, stats: &RunningVariance, rng: &mut R) -> f64;

    /// Expected reward of an arm.
    fn mean(&self, stats: &RunningVariance) -> f64;

    /// Index of the best-scoring arm, or `None` for no arms.
    fn choose<R: Rng + ?Sized>(&self, arms: &[RunningVariance], rng: &mut R) -> Option<usize> {
        argmax(arms.iter().map(|stats| self.score(stats, &mut *rng)))
    }
}

/// Position of the largest score, the first one on ties.
///
/// NaN scores never win over a number.
///
/// ```
/// use comboforge_bandit::argmax;
///
/// assert_eq!(argmax([1.0, 3.0, 3.0, f64::NAN]), Some(1));
/// assert_eq!(argmax(std::iter::empty()), None);
/// ```
pub fn argmax(scores: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.into_iter().enumerate() {
        let score = if score.is_nan() {
            f64::NEG_INFINITY
        } else {
            score
        };
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Thompson sampling: each arm is scored by one draw from its posterior.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThompsonSampling<P> {
    posterior: P,
}

impl<P: Posterior> ThompsonSampling<P> {
    pub fn new(posterior: P) -> Self {
        Self { posterior }
    }

    pub fn posterior(&self) -> &P {
        &self.posterior
    }
}

impl<P: Posterior> BanditPolicy for ThompsonSampling<P> {
    fn prior(&self) -> RunningVariance {
        self.posterior.prior()
    }

    fn update(&self, stats: &mut RunningVariance, reward: f64, weight: f64) {
        self.posterior.update(stats, reward, weight);
    }

    fn score<R: Rng + ?Sized>(&self, stats: &RunningVariance, rng: &mut R) -> f64 {
        self.posterior.sample(stats, rng)
    }

    fn mean(&self, stats: &RunningVariance) -> f64 {
        self.posterior.mean(stats)
    }
}

/// Pure exploitation: each arm is scored by its posterior mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Greedy<P> {
    posterior: P,
}

impl<P: Posterior> Greedy<P> {
    pub fn new(posterior: P) -> Self {
        Self { posterior }
    }

    pub fn posterior(&self) -> &P {
        &self.posterior
    }
}

impl<P: Posterior> BanditPolicy for Greedy<P> {
    fn prior(&self) -> RunningVariance {
        self.posterior.prior()
    }

    fn update(&self, stats: &mut RunningVariance, reward: f64, weight: f64) {
        self.posterior.update(stats, reward, weight);
    }

    fn score<R: Rng + ?Sized>(&self, stats: &RunningVariance, _rng: &mut R) -> f64 {
        self.posterior.mean(stats)
    }

    fn mean(&self, stats: &RunningVariance) -> f64 {
        self.posterior.mean(stats)
    }
}
