//! Environment traits and implementations
//!
//! This module defines the core environment interface shared by the base
//! simulators, the reward-shaping wrapper, and the statistics recorder.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::shaping::vitals::Vital;

/// Core trait for RL environments
pub trait Environment {
    /// Observation type
    type Observation;

    /// Action type
    type Action;

    /// Reset the environment and return initial observation
    fn reset(&mut self, options: ResetOptions) -> Result<Self::Observation>;

    /// Step the environment with an action
    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>>;

    /// Get the observation space dimensions
    fn observation_space(&self) -> SpaceInfo;

    /// Get the action space dimensions
    fn action_space(&self) -> SpaceInfo;
}

/// Options passed through to the environment on reset
///
/// Wrappers forward these unmodified; only the base environment
/// interprets them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetOptions {
    /// Optional RNG seed for the base environment
    pub seed: Option<u64>,
}

impl ResetOptions {
    /// Options with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

/// Result of an environment step
#[derive(Debug, Clone)]
pub struct StepResult<O> {
    /// Next observation
    pub observation: O,

    /// Reward received
    pub reward: f32,

    /// Whether the episode terminated
    pub terminated: bool,

    /// Whether the episode was truncated
    pub truncated: bool,

    /// Additional info
    pub info: StepInfo,
}

impl<O> StepResult<O> {
    /// Whether the episode ended this step, for either reason
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Space information for observations and actions
#[derive(Debug, Clone)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub dtype: SpaceType,
}

/// Space data types
#[derive(Debug, Clone, Copy)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),

    /// Continuous space (Box)
    Continuous,

    /// Multi-discrete space
    MultiDiscrete,
}

/// Per-step info bundle
///
/// The base environment fills `vitals` and `achievements`; the shaping
/// wrapper fills `true_reward`, `shaped_reward`, and `credited` without
/// touching anything already present. `extra` carries any additional
/// keys the base environment reports, so downstream consumers see the
/// full base schema plus the shaping fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepInfo {
    /// Current vital-statistic values reported by the environment
    #[serde(default)]
    pub vitals: BTreeMap<Vital, i32>,

    /// Achievement identifiers newly unlocked this step
    #[serde(default)]
    pub achievements: Vec<String>,

    /// Original unshaped reward, filled in by the shaping wrapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_reward: Option<f32>,

    /// Shaped reward, filled in by the shaping wrapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shaped_reward: Option<f32>,

    /// Achievement identifiers credited this step (first unlock this
    /// episode), filled in by the shaping wrapper
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credited: Vec<String>,

    /// Pass-through keys from the base environment
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

pub mod pool;
pub mod scripted;
