//! ComboForge Bandit - Online selection among model assignments
//!
//! This crate provides:
//! - Weighted running reward statistics
//! - Normal-Gamma and Beta posteriors
//! - Thompson sampling and greedy policies
//! - [`ModelBandit`], a thread-safe bandit whose arms are assignments
//! - Snapshots for carrying arm statistics across processes

pub mod arm;
pub mod model_bandit;
pub mod policy;
pub mod posterior;
pub mod snapshot;
pub mod statistics;
pub mod stats;

pub use arm::Arm;
pub use model_bandit::{ModelBandit, ModelBanditBuilder};
pub use policy::{argmax, BanditPolicy, Greedy, ThompsonSampling};
pub use posterior::{
    BinomialPosterior, ConfiguredPosterior, NormalPosterior, NormalPrior, Posterior,
};
pub use snapshot::{ArmSnapshot, BanditSnapshot};
pub use statistics::{BanditStatistics, BanditStatisticsCollector};
pub use stats::RunningVariance;
