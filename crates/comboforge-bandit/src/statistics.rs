//! Bandit statistics collection.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Fixed-point scale of the accumulated reward sum.
const REWARD_SCALE: f64 = 1_000_000.0;

/// Counters observed over the lifetime of a bandit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BanditStatistics {
    /// Successful `choose` calls.
    pub choices: u64,
    /// `choose` calls with no arm consistent with the context.
    pub rejections: u64,
    /// Rewards applied to an arm.
    pub updates: u64,
    /// Updates naming an assignment that is not an arm.
    pub unknown_arms: u64,
    /// Sum of applied rewards, to six decimal places.
    pub reward_sum: f64,
}

impl BanditStatistics {
    /// Returns the average applied reward.
    pub fn avg_reward(&self) -> f64 {
        if self.updates == 0 {
            0.0
        } else {
            self.reward_sum / self.updates as f64
        }
    }
}

/// Thread-safe collector for bandit statistics.
///
/// # Example
///
/// ```
/// use comboforge_bandit::BanditStatisticsCollector;
///
/// let collector = BanditStatisticsCollector::new();
/// collector.record_choice();
/// collector.record_update(2.5);
/// collector.record_update(-0.5);
///
/// let stats = collector.snapshot();
/// assert_eq!(stats.choices, 1);
/// assert_eq!(stats.avg_reward(), 1.0);
/// ```
#[derive(Debug, Default)]
pub struct BanditStatisticsCollector {
    choices: AtomicU64,
    rejections: AtomicU64,
    updates: AtomicU64,
    unknown_arms: AtomicU64,
    reward_sum: AtomicI64,
}

impl BanditStatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_choice(&self) {
        self.choices.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_update(&self, reward: f64) {
        self.updates.fetch_add(1, Ordering::Relaxed);
        let scaled = (reward * REWARD_SCALE).round() as i64;
        // The sum saturates at the i64 range instead of wrapping.
        let _ = self
            .reward_sum
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |sum| {
                Some(sum.saturating_add(scaled))
            });
    }

    pub fn record_unknown_arm(&self) {
        self.unknown_arms.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of the counters.
    pub fn snapshot(&self) -> BanditStatistics {
        BanditStatistics {
            choices: self.choices.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            unknown_arms: self.unknown_arms.load(Ordering::Relaxed),
            reward_sum: self.reward_sum.load(Ordering::Relaxed) as f64 / REWARD_SCALE,
        }
    }
}
