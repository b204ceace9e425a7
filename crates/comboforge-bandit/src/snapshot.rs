//! Serializable bandit state.
//!
//! A [`BanditSnapshot`] carries each arm's assignment as qualified paths
//! and its statistics, so belief can outlive the process. The model itself
//! is not part of the snapshot; it is restored against a model built by
//! the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use comboforge_core::Value;

use crate::stats::RunningVariance;

/// State of every arm of a bandit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BanditSnapshot {
    /// Name of the model the arms were drawn from.
    pub model: String,
    pub arms: Vec<ArmSnapshot>,
}

/// One arm: qualified path to value, plus statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmSnapshot {
    pub values: BTreeMap<String, Value>,
    pub stats: RunningVariance,
}

impl BanditSnapshot {
    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    /// Total observations across all arms.
    pub fn observations(&self) -> u64 {
        self.arms.iter().map(|arm| arm.stats.count()).sum()
    }
}
