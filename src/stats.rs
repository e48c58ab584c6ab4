//! Episode statistics recording and offline aggregation
//!
//! [`StatsRecorder`] wraps an environment and appends one JSON line per
//! completed episode to a stats file: total reward, episode length, and
//! the achievements credited along the way. [`load_records`] and
//! [`windowed_means`] are the offline consumers, turning a stats file
//! into per-window mean curves for plotting.

use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::env::{Environment, ResetOptions, SpaceInfo, StepResult};

/// One completed episode, as written to the stats file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Total reward over the episode, as seen by this recorder
    pub reward: f32,

    /// Number of steps in the episode
    pub length: usize,

    /// Achievements credited during the episode
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// Environment wrapper that records completed episodes
///
/// Accumulates reward and length across steps and appends an
/// [`EpisodeRecord`] line when the episode ends. The recorder sums the
/// reward stream it is handed: wrapped outside a
/// [`RewardShaper`](crate::shaping::RewardShaper) it records shaped
/// returns (the original training pipeline's arrangement), wrapped
/// around a bare environment it records raw returns. Achievements are
/// taken from the `credited` info field the shaper fills in.
pub struct StatsRecorder<E: Environment> {
    env: E,
    writer: BufWriter<File>,
    path: PathBuf,
    episodes_written: usize,

    // Current-episode accumulators
    episode_reward: f32,
    episode_length: usize,
    episode_achievements: Vec<String>,
}

impl<E: Environment> StatsRecorder<E> {
    /// Wrap an environment, appending records to the file at `path`
    ///
    /// The file is created if missing and appended to otherwise, so
    /// interrupted runs can resume into the same stats file.
    pub fn new<P: AsRef<Path>>(env: E, path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            env,
            writer: BufWriter::new(file),
            path,
            episodes_written: 0,
            episode_reward: 0.0,
            episode_length: 0,
            episode_achievements: Vec::new(),
        })
    }

    /// Path of the stats file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of episode records written by this instance
    pub fn episodes_written(&self) -> usize {
        self.episodes_written
    }

    /// Borrow the wrapped environment
    pub fn env(&self) -> &E {
        &self.env
    }

    fn write_record(&mut self) -> Result<()> {
        let record = EpisodeRecord {
            reward: self.episode_reward,
            length: self.episode_length,
            achievements: std::mem::take(&mut self.episode_achievements),
        };
        let line = serde_json::to_string(&record)?;
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        self.episodes_written += 1;
        tracing::info!(
            "Episode {} recorded: reward {:.2}, length {}",
            self.episodes_written,
            record.reward,
            record.length
        );
        Ok(())
    }
}

impl<E: Environment> Environment for StatsRecorder<E> {
    type Observation = E::Observation;
    type Action = E::Action;

    fn reset(&mut self, options: ResetOptions) -> Result<Self::Observation> {
        let observation = self.env.reset(options)?;
        self.episode_reward = 0.0;
        self.episode_length = 0;
        self.episode_achievements.clear();
        Ok(observation)
    }

    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>> {
        let result = self.env.step(action)?;

        self.episode_reward += result.reward;
        self.episode_length += 1;
        self.episode_achievements.extend(result.info.credited.iter().cloned());

        if result.done() {
            self.write_record()?;
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

/// Load all episode records from a JSONL stats file
///
/// Blank lines are skipped, matching the offline plotting tools.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<EpisodeRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

/// Mean of each consecutive window of values
///
/// The final window may be partial; it is averaged over the values it
/// actually holds.
///
/// # Panics
///
/// Panics if `window` is zero.
pub fn windowed_means(values: &[f32], window: usize) -> Vec<f32> {
    assert!(window > 0, "Window size must be positive");
    values
        .chunks(window)
        .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32)
        .collect()
}
