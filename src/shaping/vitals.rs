//! Survival vital tracking and delta bonuses
//!
//! Tracks the previous value of each vital statistic and rewards
//! step-to-step increases. Decreases never contribute a penalty; the
//! raw environment reward carries that burden.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A bounded survival statistic reported by the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vital {
    /// Hit points
    Health,
    /// Hunger level
    Food,
    /// Thirst level
    Drink,
    /// Sleep level
    Energy,
}

impl Vital {
    /// All vitals, in tracking order
    pub const ALL: [Vital; 4] = [Vital::Health, Vital::Food, Vital::Drink, Vital::Energy];

    /// Stable name, matching the environment's info keys
    pub fn name(self) -> &'static str {
        match self {
            Vital::Health => "health",
            Vital::Food => "food",
            Vital::Drink => "drink",
            Vital::Energy => "energy",
        }
    }
}

/// Previous-step baseline for each vital statistic
///
/// `observe` computes the bonus for one step and advances the baseline;
/// `reset` returns every vital to the episode-start value.
#[derive(Debug, Clone)]
pub struct SurvivalTracker {
    previous: BTreeMap<Vital, i32>,
    max_value: i32,
}

impl SurvivalTracker {
    /// Create a tracker with all vitals at `baseline`
    pub fn new(baseline: i32, max_value: i32) -> Self {
        let mut tracker = Self { previous: BTreeMap::new(), max_value };
        tracker.reset(baseline);
        tracker
    }

    /// Return every vital to the episode-start baseline
    pub fn reset(&mut self, baseline: i32) {
        let baseline = baseline.clamp(0, self.max_value);
        for vital in Vital::ALL {
            self.previous.insert(vital, baseline);
        }
    }

    /// Fold this step's vital observations into the bonus and advance
    /// the baseline
    ///
    /// Missing vitals are treated as unchanged. Observed values are
    /// clamped into `[0, max_value]` before both the delta computation
    /// and the baseline update, so a malformed observation cannot push
    /// the baseline out of range. Only increases contribute; the
    /// returned bonus is always >= 0.
    pub fn observe(
        &mut self,
        weights: &BTreeMap<Vital, f32>,
        observed: &BTreeMap<Vital, i32>,
    ) -> f32 {
        let mut bonus = 0.0_f32;
        for vital in Vital::ALL {
            let prev = self.previous.get(&vital).copied().unwrap_or(0);
            let current = match observed.get(&vital) {
                Some(&value) => {
                    if !(0..=self.max_value).contains(&value) {
                        tracing::warn!(
                            "Vital {} out of range ({}), clamping to [0, {}]",
                            vital.name(),
                            value,
                            self.max_value
                        );
                    }
                    value.clamp(0, self.max_value)
                }
                None => prev,
            };

            let delta = current - prev;
            if delta > 0 {
                bonus += weights.get(&vital).copied().unwrap_or(0.0) * delta as f32;
            }
            self.previous.insert(vital, current);
        }
        bonus
    }

    /// Baseline value for a vital, as of the previous step
    pub fn previous(&self, vital: Vital) -> i32 {
        self.previous.get(&vital).copied().unwrap_or(0)
    }
}
