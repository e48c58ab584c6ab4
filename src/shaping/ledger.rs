//! One-time achievement bonus tracking
//!
//! The ledger remembers which achievements have already been credited
//! this episode so each bonus is granted at most once, no matter how
//! often the environment re-reports the same identifier.

use std::collections::{BTreeMap, BTreeSet};

/// Per-episode record of credited achievements
#[derive(Debug, Clone, Default)]
pub struct AchievementLedger {
    credited: BTreeSet<String>,
}

impl AchievementLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all credited achievements (episode start)
    pub fn reset(&mut self) {
        self.credited.clear();
    }

    /// Credit this step's newly unlocked achievements
    ///
    /// Every identifier not already credited is marked credited, even
    /// when its weight is zero or unconfigured, so re-reporting it later
    /// in the episode never re-awards it. Duplicates within `unlocked`
    /// count once. Returns the total bonus and the identifiers credited
    /// this step.
    pub fn credit(
        &mut self,
        weights: &BTreeMap<String, f32>,
        unlocked: &[String],
    ) -> (f32, Vec<String>) {
        let mut bonus = 0.0_f32;
        let mut newly_credited = Vec::new();

        for id in unlocked {
            if !self.credited.insert(id.clone()) {
                continue;
            }
            newly_credited.push(id.clone());

            // Unknown identifiers are zero-weight by definition
            if let Some(&weight) = weights.get(id) {
                if weight > 0.0 {
                    bonus += weight;
                }
            }
        }

        (bonus, newly_credited)
    }

    /// Whether an achievement has been credited this episode
    pub fn is_credited(&self, id: &str) -> bool {
        self.credited.contains(id)
    }

    /// All achievements credited this episode
    pub fn credited(&self) -> &BTreeSet<String> {
        &self.credited
    }

    /// Number of achievements credited this episode
    pub fn len(&self) -> usize {
        self.credited.len()
    }

    /// Whether no achievements have been credited yet
    pub fn is_empty(&self) -> bool {
        self.credited.is_empty()
    }
}
