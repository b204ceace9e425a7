//! Posterior distributions over an arm's expected reward.
//!
//! A posterior is a stateless algorithm: all belief lives in the
//! [`RunningVariance`] it is handed, which starts from [`Posterior::prior`].

use std::fmt::Debug;

use rand::Rng;
use rand_distr::{Beta, Distribution, Gamma, Normal};

use comboforge_config::{BinomialPriorConfig, NormalPriorConfig, PosteriorConfig};

use crate::stats::RunningVariance;

/// Draws attempted before a sampler falls back to the posterior mean.
const MAX_SAMPLE_ATTEMPTS: usize = 16;

/// A conjugate posterior over the mean reward.
pub trait Posterior: Send + Sync + Debug {
    /// Statistics every new arm starts from.
    fn prior(&self) -> RunningVariance;

    /// Folds one observed reward into `stats`.
    fn update(&self, stats: &mut RunningVariance, reward: f64, weight: f64) {
        stats.accept(reward, weight);
    }

    /// Draws one plausible mean reward.
    fn sample<R: Rng + ?Sized>(&self, stats: &RunningVariance, rng: &mut R) -> f64;

    /// Expected mean reward.
    fn mean(&self, stats: &RunningVariance) -> f64 {
        stats.mean()
    }
}

/// Prior pseudo-observations of a [`NormalPosterior`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalPrior {
    pub mean: f64,
    pub squared_deviations: f64,
    pub weight: f64,
}

impl Default for NormalPrior {
    fn default() -> Self {
        Self {
            mean: 0.0,
            squared_deviations: 0.02,
            weight: 0.02,
        }
    }
}

impl From<&NormalPriorConfig> for NormalPrior {
    fn from(config: &NormalPriorConfig) -> Self {
        Self {
            mean: config.prior_mean,
            squared_deviations: config.prior_squared_deviations,
            weight: config.prior_weight,
        }
    }
}

/// Normal-Gamma posterior for rewards with unknown mean and precision.
///
/// Sampling draws a precision `tau ~ Gamma(weight / 2, rate = ssd / 2)` and
/// then a mean from `Normal(mean, 1 / sqrt(tau * weight))`.
///
/// # Example
///
/// ```
/// use comboforge_bandit::{NormalPosterior, Posterior};
/// use rand::SeedableRng;
///
/// let posterior = NormalPosterior::default();
/// let mut stats = posterior.prior();
/// for _ in 0..100 {
///     posterior.update(&mut stats, 5.0, 1.0);
/// }
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
/// let draw = posterior.sample(&stats, &mut rng);
/// assert!((draw - 5.0).abs() < 0.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalPosterior {
    pub prior: NormalPrior,
}

impl NormalPosterior {
    pub fn new(prior: NormalPrior) -> Self {
        Self { prior }
    }
}

impl Posterior for NormalPosterior {
    fn prior(&self) -> RunningVariance {
        RunningVariance::new(
            self.prior.mean,
            self.prior.squared_deviations,
            self.prior.weight,
        )
    }

    fn sample<R: Rng + ?Sized>(&self, stats: &RunningVariance, rng: &mut R) -> f64 {
        let shape = stats.weight() / 2.0;
        let rate = stats.squared_deviations() / 2.0;
        if !(rate > 0.0) {
            return stats.mean();
        }
        let Ok(gamma) = Gamma::new(shape, 1.0 / rate) else {
            return stats.mean();
        };
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let precision = gamma.sample(rng);
            let std_dev = (1.0 / (precision * stats.weight())).sqrt();
            if !std_dev.is_finite() {
                continue;
            }
            let Ok(normal) = Normal::new(stats.mean(), std_dev) else {
                continue;
            };
            let draw = normal.sample(rng);
            if draw.is_finite() {
                return draw;
            }
        }
        stats.mean()
    }
}

/// Beta posterior over a success rate, for rewards in `[0, 1]`.
///
/// The prior is `weight` pseudo-observations with mean `mean`; the default
/// of one half over two observations is the uniform `Beta(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinomialPosterior {
    pub prior_mean: f64,
    pub prior_weight: f64,
}

impl Default for BinomialPosterior {
    fn default() -> Self {
        Self {
            prior_mean: 0.5,
            prior_weight: 2.0,
        }
    }
}

impl From<&BinomialPriorConfig> for BinomialPosterior {
    fn from(config: &BinomialPriorConfig) -> Self {
        Self {
            prior_mean: config.prior_mean,
            prior_weight: config.prior_weight,
        }
    }
}

impl Posterior for BinomialPosterior {
    fn prior(&self) -> RunningVariance {
        RunningVariance::new(self.prior_mean, 0.0, self.prior_weight)
    }

    fn update(&self, stats: &mut RunningVariance, reward: f64, weight: f64) {
        stats.accept(reward.clamp(0.0, 1.0), weight);
    }

    fn sample<R: Rng + ?Sized>(&self, stats: &RunningVariance, rng: &mut R) -> f64 {
        let alpha = stats.sum();
        let beta = stats.weight() - alpha;
        match Beta::new(alpha, beta) {
            Ok(dist) => dist.sample(rng),
            Err(_) => stats.mean(),
        }
    }
}

/// A posterior chosen at runtime from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfiguredPosterior {
    Normal(NormalPosterior),
    Binomial(BinomialPosterior),
}

impl Default for ConfiguredPosterior {
    fn default() -> Self {
        ConfiguredPosterior::Normal(NormalPosterior::default())
    }
}

impl From<&PosteriorConfig> for ConfiguredPosterior {
    fn from(config: &PosteriorConfig) -> Self {
        match config {
            PosteriorConfig::Normal(prior) => {
                ConfiguredPosterior::Normal(NormalPosterior::new(prior.into()))
            }
            PosteriorConfig::Binomial(prior) => ConfiguredPosterior::Binomial(prior.into()),
        }
    }
}

impl Posterior for ConfiguredPosterior {
    fn prior(&self) -> RunningVariance {
        match self {
            ConfiguredPosterior::Normal(p) => p.prior(),
            ConfiguredPosterior::Binomial(p) => p.prior(),
        }
    }

    fn update(&self, stats: &mut RunningVariance, reward: f64, weight: f64) {
        match self {
            ConfiguredPosterior::Normal(p) => p.update(stats, reward, weight),
            ConfiguredPosterior::Binomial(p) => p.update(stats, reward, weight),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, stats: &RunningVariance, rng: &mut R) -> f64 {
        match self {
            ConfiguredPosterior::Normal(p) => p.sample(stats, rng),
            ConfiguredPosterior::Binomial(p) => p.sample(stats, rng),
        }
    }
}
