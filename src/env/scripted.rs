//! Scripted replay environment
//!
//! Replays a fixed list of recorded raw steps: reward, done flag, vital
//! observations, and newly unlocked achievements. Actions are accepted
//! and ignored. This is the deterministic stand-in for a real simulator
//! in tests and demos, and the replay vehicle for verifying that a
//! fresh shaper reproduces identical shaped rewards from an identical
//! raw sequence.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::{Environment, ResetOptions, SpaceInfo, SpaceType, StepInfo, StepResult};
use crate::shaping::vitals::Vital;

/// One recorded raw step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptedStep {
    /// Raw environment reward
    #[serde(default)]
    pub reward: f32,

    /// Whether the episode ends on this step
    #[serde(default)]
    pub done: bool,

    /// Vital values reported this step (absent vitals mean "unchanged")
    #[serde(default)]
    pub vitals: BTreeMap<Vital, i32>,

    /// Achievement identifiers newly unlocked this step
    #[serde(default)]
    pub achievements: Vec<String>,

    /// Additional info keys the simulated environment reports
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Environment that replays a recorded step sequence
///
/// Each episode replays the same script from the start. When the script
/// runs out before a scripted done flag, the episode is truncated.
#[derive(Debug, Clone)]
pub struct ScriptedEnv {
    script: Vec<ScriptedStep>,
    cursor: usize,
}

impl ScriptedEnv {
    /// Create an environment from a recorded script
    pub fn new(script: Vec<ScriptedStep>) -> Self {
        Self { script, cursor: 0 }
    }

    /// Load a script from a JSON array file
    pub fn from_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let script: Vec<ScriptedStep> = serde_json::from_str(&contents)?;
        Ok(Self::new(script))
    }

    /// Number of steps in the script
    pub fn len(&self) -> usize {
        self.script.len()
    }

    /// Whether the script is empty
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }
}

impl Environment for ScriptedEnv {
    type Observation = Vec<f32>;
    type Action = i64;

    fn reset(&mut self, _options: ResetOptions) -> Result<Self::Observation> {
        // The script is fixed, so the seed has nothing to influence
        self.cursor = 0;
        Ok(vec![0.0])
    }

    fn step(&mut self, _action: Self::Action) -> Result<StepResult<Self::Observation>> {
        let Some(scripted) = self.script.get(self.cursor).cloned() else {
            bail!("scripted sequence exhausted at step {}", self.cursor);
        };
        self.cursor += 1;

        // Truncate when the script ends without a terminal flag
        let truncated = !scripted.done && self.cursor >= self.script.len();

        Ok(StepResult {
            observation: vec![self.cursor as f32],
            reward: scripted.reward,
            terminated: scripted.done,
            truncated,
            info: StepInfo {
                vitals: scripted.vitals,
                achievements: scripted.achievements,
                extra: scripted.extra,
                ..Default::default()
            },
        })
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![1], dtype: SpaceType::Continuous }
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![], dtype: SpaceType::Discrete(1) }
    }
}
