//! Reward-shaping demo over scripted episodes
//!
//! Generates randomized raw episodes (sparse rewards, progressive
//! achievement unlocks, wandering vitals), runs them through the
//! shaping wrapper and the stats recorder, then prints windowed mean
//! curves from the recorded stats file.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin shape_demo -- [stats_path]
//! ```

use std::collections::BTreeMap;

use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use shaper_rl::env::scripted::{ScriptedEnv, ScriptedStep};
use shaper_rl::prelude::*;

const NUM_EPISODES: usize = 200;
const EPISODE_LENGTH: usize = 64;
const WINDOW: usize = 20;
const SEED: u64 = 42;

/// Achievements in rough unlock order; each becomes reachable only
/// after the previous one has appeared in the episode.
const PROGRESSION: &[&str] = &[
    "collect_wood",
    "place_table",
    "make_wood_pickaxe",
    "collect_stone",
    "make_stone_pickaxe",
    "collect_coal",
    "place_furnace",
    "collect_iron",
    "make_iron_ingot",
    "make_iron_pickaxe",
    "collect_diamond",
];

fn random_episode(rng: &mut StdRng) -> Vec<ScriptedStep> {
    let mut steps = Vec::with_capacity(EPISODE_LENGTH);
    let mut unlocked = 0;
    let mut vitals: BTreeMap<Vital, i32> =
        Vital::ALL.iter().map(|&v| (v, 9)).collect();

    for i in 0..EPISODE_LENGTH {
        // Vitals wander downward with occasional recovery
        for value in vitals.values_mut() {
            let delta = if rng.gen_bool(0.2) { 2 } else { -rng.gen_range(0..2) };
            *value = (*value + delta).clamp(0, 9);
        }

        // Unlock the next achievement in the chain now and then
        let mut achievements = Vec::new();
        if unlocked < PROGRESSION.len() && rng.gen_bool(0.15) {
            achievements.push(PROGRESSION[unlocked].to_string());
            unlocked += 1;
        }

        let raw_reward = if achievements.is_empty() { 0.0 } else { 1.0 };
        steps.push(ScriptedStep {
            reward: raw_reward,
            done: i + 1 == EPISODE_LENGTH,
            vitals: vitals.clone(),
            achievements,
            ..Default::default()
        });
    }
    steps
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let stats_path =
        std::env::args().nth(1).unwrap_or_else(|| "stats.jsonl".to_string());
    let mut rng = StdRng::seed_from_u64(SEED);
    let config = ShapingConfig::default();

    tracing::info!("Reward-shaping demo");
    tracing::info!("  Episodes: {}", NUM_EPISODES);
    tracing::info!("  Episode length: {}", EPISODE_LENGTH);
    tracing::info!("  Stats file: {}", stats_path);

    for _ in 0..NUM_EPISODES {
        let env = ScriptedEnv::new(random_episode(&mut rng));
        let shaper = RewardShaper::new(env, config.clone())?;
        let mut recorder = StatsRecorder::new(shaper, &stats_path)?;

        recorder.reset(ResetOptions::default())?;
        loop {
            let result = recorder.step(0)?;
            if result.done() {
                break;
            }
        }
    }

    // Offline pass: windowed means over the recorded episodes
    let records = load_records(&stats_path)?;
    let rewards: Vec<f32> = records.iter().map(|r| r.reward).collect();
    let lengths: Vec<f32> = records.iter().map(|r| r.length as f32).collect();

    tracing::info!("Loaded {} episode records", records.len());
    for (i, (reward, length)) in windowed_means(&rewards, WINDOW)
        .iter()
        .zip(windowed_means(&lengths, WINDOW))
        .enumerate()
    {
        tracing::info!(
            "Episodes {:>4}-{:<4} mean reward {:>7.2}  mean length {:>6.1}",
            i * WINDOW + 1,
            ((i + 1) * WINDOW).min(records.len()),
            reward,
            length
        );
    }

    Ok(())
}
