//! Vectorized environment pool for parallel data collection
//!
//! Executes multiple independent environments in parallel with Rayon.
//! Each environment (including any shaping wrapper around it) owns its
//! own episode state, so no locking or cross-instance sharing is
//! involved; the pool just fans the calls out.

use anyhow::Result;
use rayon::prelude::*;

use crate::env::{Environment, ResetOptions, SpaceInfo, StepResult};

/// A pool of environments stepped in parallel
///
/// # Example
///
/// ```rust
/// use shaper_rl::env::{pool::EnvPool, scripted::{ScriptedEnv, ScriptedStep}, ResetOptions};
///
/// let script = vec![ScriptedStep { reward: 1.0, ..Default::default() }];
/// let mut pool = EnvPool::new(|| ScriptedEnv::new(script.clone()), 4);
///
/// let observations = pool.reset(ResetOptions::default()).unwrap();
/// assert_eq!(observations.len(), 4);
///
/// let results = pool.step(&[0, 0, 0, 0]).unwrap();
/// assert_eq!(results.len(), 4);
/// ```
pub struct EnvPool<E: Environment> {
    /// Vector of environment instances
    envs: Vec<E>,

    /// Number of environments
    num_envs: usize,
}

impl<E> EnvPool<E>
where
    E: Environment + Send,
    E::Observation: Send,
    E::Action: Copy + Sync,
{
    /// Create a new environment pool
    ///
    /// # Arguments
    ///
    /// * `env_fn` - Factory function to create environment instances
    /// * `num_envs` - Number of parallel environments
    pub fn new<F>(env_fn: F, num_envs: usize) -> Self
    where
        F: Fn() -> E,
    {
        let envs = (0..num_envs).map(|_| env_fn()).collect();
        Self { envs, num_envs }
    }

    /// Reset all environments in parallel
    ///
    /// Returns a vector of initial observations, one per environment.
    pub fn reset(&mut self, options: ResetOptions) -> Result<Vec<E::Observation>> {
        self.envs.par_iter_mut().map(|env| env.reset(options)).collect()
    }

    /// Step all environments in parallel with given actions
    ///
    /// # Panics
    ///
    /// Panics if the number of actions doesn't match the number of
    /// environments.
    pub fn step(&mut self, actions: &[E::Action]) -> Result<Vec<StepResult<E::Observation>>> {
        assert_eq!(
            actions.len(),
            self.num_envs,
            "Number of actions must match number of environments"
        );

        self.envs
            .par_iter_mut()
            .zip(actions.par_iter())
            .map(|(env, &action)| env.step(action))
            .collect()
    }

    /// Reset a specific environment by index
    pub fn reset_env(&mut self, env_id: usize, options: ResetOptions) -> Result<E::Observation> {
        self.envs[env_id].reset(options)
    }

    /// Get the number of environments in the pool
    pub fn num_envs(&self) -> usize {
        self.num_envs
    }

    /// Get observation space information from the first environment
    pub fn observation_space(&self) -> SpaceInfo {
        self.envs[0].observation_space()
    }

    /// Get action space information from the first environment
    pub fn action_space(&self) -> SpaceInfo {
        self.envs[0].action_space()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::scripted::{ScriptedEnv, ScriptedStep};
    use crate::shaping::{RewardShaper, ShapingConfig};

    fn achievement_script() -> Vec<ScriptedStep> {
        vec![
            ScriptedStep {
                achievements: vec!["collect_wood".to_string()],
                ..Default::default()
            },
            ScriptedStep::default(),
        ]
    }

    #[test]
    fn test_pool_creation() {
        let pool = EnvPool::new(|| ScriptedEnv::new(achievement_script()), 4);
        assert_eq!(pool.num_envs(), 4);
    }

    #[test]
    fn test_pool_reset_and_step() {
        let mut pool = EnvPool::new(|| ScriptedEnv::new(achievement_script()), 4);
        let observations = pool.reset(ResetOptions::default()).unwrap();
        assert_eq!(observations.len(), 4);

        let results = pool.step(&[0, 0, 0, 0]).unwrap();
        assert_eq!(results.len(), 4);
        for result in results {
            assert_eq!(result.info.achievements, vec!["collect_wood".to_string()]);
        }
    }

    #[test]
    #[should_panic(expected = "Number of actions must match number of environments")]
    fn test_pool_step_wrong_action_count() {
        let mut pool = EnvPool::new(|| ScriptedEnv::new(achievement_script()), 4);
        pool.reset(ResetOptions::default()).unwrap();
        let _ = pool.step(&[0, 0]);
    }

    #[test]
    fn test_pooled_shapers_are_independent() {
        // Each pooled shaper owns its own ledger; crediting in one must
        // not suppress the bonus in another.
        let mut pool = EnvPool::new(
            || {
                RewardShaper::new(ScriptedEnv::new(achievement_script()), ShapingConfig::default())
                    .expect("default config must validate")
            },
            3,
        );

        pool.reset(ResetOptions::default()).unwrap();
        let results = pool.step(&[0, 0, 0]).unwrap();
        for result in &results {
            assert!(
                (result.reward - 0.1).abs() < 1e-6,
                "Every instance should credit collect_wood independently, got {}",
                result.reward
            );
        }
    }

    #[test]
    fn test_pool_reset_single_env() {
        let mut pool = EnvPool::new(|| ScriptedEnv::new(achievement_script()), 2);
        pool.reset(ResetOptions::default()).unwrap();
        pool.step(&[0, 0]).unwrap();

        // Rewind just one environment; the other continues its episode
        pool.reset_env(1, ResetOptions::default()).unwrap();
        let results = pool.step(&[0, 0]).unwrap();
        assert!(results[0].info.achievements.is_empty());
        assert_eq!(results[1].info.achievements, vec!["collect_wood".to_string()]);
    }

    #[test]
    fn test_pool_spaces() {
        let pool = EnvPool::new(|| ScriptedEnv::new(achievement_script()), 2);
        assert_eq!(pool.observation_space().shape, vec![1]);
        assert_eq!(pool.action_space().shape, Vec::<usize>::new());
    }
}
