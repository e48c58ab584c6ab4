//! Episodic reward shaping
//!
//! This module wraps a base environment and densifies its sparse reward
//! signal with three bonus terms: one-time achievement credits,
//! dependency-gated tech-tree milestones, and survival-stat improvement
//! deltas. The wrapped environment's observation and action types pass
//! through untouched; only the reward and info bundle are augmented.

use std::collections::BTreeSet;

use anyhow::{bail, Result};

use crate::env::{Environment, ResetOptions, SpaceInfo, StepResult};

pub mod config;
pub mod ledger;
pub mod milestone;
pub mod vitals;

pub use config::{Milestone, ShapingConfig};
pub use ledger::AchievementLedger;
pub use milestone::MilestoneDetector;
pub use vitals::{SurvivalTracker, Vital};

/// Lifecycle phase of the shaping wrapper
///
/// Stepping is only legal while an episode is active; anything else is
/// a usage error, not a recoverable condition, because it would shape
/// against stale episode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No episode has started yet
    Uninitialized,
    /// An episode is in progress
    EpisodeActive,
    /// The last step reported done; a reset must come next
    NeedsReset,
}

/// Reward-shaping environment wrapper
///
/// Per step, in fixed order: credit newly unlocked achievements,
/// re-evaluate milestones against the updated ledger, reward positive
/// vital deltas against the previous step's baseline, then emit
/// `raw + achievement + milestone + survival` as the reward. All
/// episode state is owned here and cleared on reset, so independent
/// wrapper instances never share anything.
#[derive(Debug)]
pub struct RewardShaper<E: Environment> {
    env: E,
    config: ShapingConfig,
    ledger: AchievementLedger,
    detector: MilestoneDetector,
    tracker: SurvivalTracker,
    phase: Phase,
}

impl<E: Environment> RewardShaper<E> {
    /// Wrap an environment with a validated shaping configuration
    pub fn new(env: E, config: ShapingConfig) -> Result<Self> {
        config.validate()?;
        let tracker = SurvivalTracker::new(config.vital_baseline, config.vital_max);
        Ok(Self {
            env,
            config,
            ledger: AchievementLedger::new(),
            detector: MilestoneDetector::new(),
            tracker,
            phase: Phase::Uninitialized,
        })
    }

    /// The active shaping configuration
    pub fn config(&self) -> &ShapingConfig {
        &self.config
    }

    /// Achievements credited so far this episode
    pub fn credited_achievements(&self) -> &BTreeSet<String> {
        self.ledger.credited()
    }

    /// Milestones completed so far this episode
    pub fn completed_milestones(&self) -> &BTreeSet<String> {
        self.detector.completed()
    }

    /// Borrow the wrapped environment
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Unwrap, discarding all shaping state
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: Environment> Environment for RewardShaper<E> {
    type Observation = E::Observation;
    type Action = E::Action;

    /// Reset the base environment and clear all episode state
    ///
    /// `options` pass through to the base environment unmodified. Safe
    /// to call mid-episode (external truncation); the next episode
    /// starts from a clean ledger and baseline either way.
    fn reset(&mut self, options: ResetOptions) -> Result<Self::Observation> {
        let observation = self.env.reset(options)?;
        self.ledger.reset();
        self.detector.reset();
        self.tracker.reset(self.config.vital_baseline);
        self.phase = Phase::EpisodeActive;
        Ok(observation)
    }

    /// Step the base environment and shape its reward
    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>> {
        match self.phase {
            Phase::Uninitialized => bail!("step called before the first reset"),
            Phase::NeedsReset => bail!("step called after episode end without a reset"),
            Phase::EpisodeActive => {}
        }

        let mut result = self.env.step(action)?;
        let raw_reward = result.reward;

        // Order matters: milestones must see this step's newly credited
        // achievements, and vital deltas use the pre-update baseline.
        let (achievement_bonus, credited) =
            self.ledger.credit(&self.config.achievement_weights, &result.info.achievements);
        let (milestone_bonus, _) =
            self.detector.evaluate(&self.config.milestones, self.ledger.credited());
        let survival_bonus =
            self.tracker.observe(&self.config.vital_weights, &result.info.vitals);

        let shaped_reward = raw_reward + achievement_bonus + milestone_bonus + survival_bonus;

        result.reward = shaped_reward;
        result.info.true_reward = Some(raw_reward);
        result.info.shaped_reward = Some(shaped_reward);
        result.info.credited = credited;

        if result.done() {
            self.phase = Phase::NeedsReset;
        }

        Ok(result)
    }

    fn observation_space(&self) -> SpaceInfo {
        self.env.observation_space()
    }

    fn action_space(&self) -> SpaceInfo {
        self.env.action_space()
    }
}
