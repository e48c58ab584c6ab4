//! # shaper-rl
//!
//! Episodic reward shaping for sparse-reward reinforcement learning.
//!
//! A [`RewardShaper`](shaping::RewardShaper) sits between a base
//! environment and the training loop, densifying long-horizon
//! objectives with three bonus terms on top of the raw reward:
//!
//! - one-time achievement bonuses, credited once per episode,
//! - tech-tree milestones gated on sets of prerequisite achievements,
//! - survival-stat improvement deltas.
//!
//! ## Quick Start
//!
//! ```rust
//! use shaper_rl::env::{Environment, ResetOptions};
//! use shaper_rl::env::scripted::{ScriptedEnv, ScriptedStep};
//! use shaper_rl::shaping::{RewardShaper, ShapingConfig};
//!
//! let script = vec![ScriptedStep {
//!     achievements: vec!["collect_wood".to_string()],
//!     ..Default::default()
//! }];
//! let mut env = RewardShaper::new(ScriptedEnv::new(script), ShapingConfig::default()).unwrap();
//!
//! env.reset(ResetOptions::default()).unwrap();
//! let result = env.step(0).unwrap();
//! assert!((result.reward - 0.1).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Environment traits and implementations
pub mod env;

/// Reward shaping: achievement ledger, milestone detector, survival
/// tracker, and the orchestrating wrapper
pub mod shaping;

/// Episode statistics recording and offline aggregation
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::env::{Environment, ResetOptions, SpaceInfo, SpaceType, StepInfo, StepResult};
    pub use crate::shaping::{Milestone, RewardShaper, ShapingConfig, Vital};
    pub use crate::stats::{load_records, windowed_means, EpisodeRecord, StatsRecorder};
}

/// Current version of shaper-rl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
