//! Shaping configuration tables
//!
//! This module defines the static, validated configuration for reward
//! shaping: one-time achievement weights, tech-tree milestones, and
//! per-vital delta weights. Defaults match the Crafter progression
//! tables.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{Read, Write},
    path::Path,
};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::shaping::vitals::Vital;

/// A composite progression event
///
/// Fires once per episode when every prerequisite achievement has been
/// credited. Prerequisites reference achievement identifiers; they need
/// not carry a positive weight of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Achievement identifiers that must all be credited first
    pub requires: BTreeSet<String>,

    /// Bonus granted when the prerequisite set is first satisfied
    pub bonus: f32,
}

impl Milestone {
    /// Create a milestone from its prerequisites and bonus
    pub fn new<I, S>(requires: I, bonus: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { requires: requires.into_iter().map(Into::into).collect(), bonus }
    }
}

/// Reward-shaping configuration
///
/// Immutable after validation; loaded once and shared by reference for
/// the lifetime of the shaper. Identifiers absent from
/// `achievement_weights` are defined to contribute zero, so the
/// environment may grow new achievements without a config change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapingConfig {
    /// One-time bonus per achievement identifier
    pub achievement_weights: BTreeMap<String, f32>,

    /// Milestone table, evaluated in map order
    pub milestones: BTreeMap<String, Milestone>,

    /// Weight applied to each vital's positive delta
    pub vital_weights: BTreeMap<Vital, f32>,

    /// Value every vital starts each episode at
    pub vital_baseline: i32,

    /// Upper bound of the vital value range
    pub vital_max: i32,
}

impl Default for ShapingConfig {
    /// Crafter progression tables: collecting, eating, crafting,
    /// building, smelting, and combat achievements, plus the four
    /// tech-tree milestones.
    fn default() -> Self {
        let achievement_weights = [
            // Collecting
            ("collect_wood", 0.1),
            ("collect_stone", 0.2),
            ("collect_coal", 0.2),
            ("collect_iron", 0.5),
            ("collect_diamond", 1.5),
            ("collect_sapling", 0.05),
            // Eating
            ("eat_plant", 0.4),
            ("eat_cow", 0.3),
            // Crafting tools
            ("make_wood_pickaxe", 0.2),
            ("make_wood_sword", 0.2),
            ("make_stone_pickaxe", 0.4),
            ("make_stone_sword", 0.4),
            ("make_iron_pickaxe", 0.8),
            ("make_iron_sword", 0.8),
            // Building
            ("place_table", 0.5),
            ("place_furnace", 0.6),
            ("place_stone", 0.5),
            ("place_plant", 0.1),
            // Smelting
            ("make_iron_ingot", 1.0),
            // Combat
            ("defeat_zombie", 1.2),
            ("defeat_skeleton", 1.2),
            // Misc
            ("wake_up", 0.5),
        ]
        .into_iter()
        .map(|(id, w)| (id.to_string(), w))
        .collect();

        let mut milestones = BTreeMap::new();
        milestones.insert("stone_age".to_string(), Milestone::new(["make_stone_pickaxe"], 2.0));
        milestones.insert(
            "iron_age".to_string(),
            Milestone::new(["place_furnace", "make_iron_ingot", "make_iron_pickaxe"], 6.0),
        );
        milestones.insert("combat_ready".to_string(), Milestone::new(["defeat_zombie"], 4.0));
        milestones.insert("diamond_hunter".to_string(), Milestone::new(["collect_diamond"], 12.0));

        let vital_weights = [
            (Vital::Health, 0.1),
            (Vital::Food, 0.05),
            (Vital::Drink, 0.05),
            (Vital::Energy, 0.05),
        ]
        .into_iter()
        .collect();

        Self { achievement_weights, milestones, vital_weights, vital_baseline: 9, vital_max: 9 }
    }
}

impl ShapingConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration tables
    ///
    /// Checked once at load time so per-step lookups never have to.
    pub fn validate(&self) -> Result<()> {
        for (id, &weight) in &self.achievement_weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(anyhow!(
                    "achievement weight for '{}' must be finite and non-negative, got {}",
                    id,
                    weight
                ));
            }
        }
        for (name, milestone) in &self.milestones {
            if !milestone.bonus.is_finite() || milestone.bonus < 0.0 {
                return Err(anyhow!(
                    "milestone bonus for '{}' must be finite and non-negative, got {}",
                    name,
                    milestone.bonus
                ));
            }
        }
        for (vital, &weight) in &self.vital_weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(anyhow!(
                    "vital weight for '{}' must be finite and non-negative, got {}",
                    vital.name(),
                    weight
                ));
            }
        }
        if self.vital_max < 0 {
            return Err(anyhow!("vital_max must be non-negative, got {}", self.vital_max));
        }
        if !(0..=self.vital_max).contains(&self.vital_baseline) {
            return Err(anyhow!(
                "vital_baseline must be in [0, {}], got {}",
                self.vital_max,
                self.vital_baseline
            ));
        }
        Ok(())
    }

    /// Set the weight for one achievement
    pub fn achievement_weight(mut self, id: impl Into<String>, weight: f32) -> Self {
        self.achievement_weights.insert(id.into(), weight);
        self
    }

    /// Add or replace a milestone
    pub fn milestone(mut self, name: impl Into<String>, milestone: Milestone) -> Self {
        self.milestones.insert(name.into(), milestone);
        self
    }

    /// Set the weight for one vital
    pub fn vital_weight(mut self, vital: Vital, weight: f32) -> Self {
        self.vital_weights.insert(vital, weight);
        self
    }

    /// Set the episode-start vital value
    pub fn vital_baseline(mut self, baseline: i32) -> Self {
        self.vital_baseline = baseline;
        self
    }

    /// Set the upper bound of the vital range
    pub fn vital_max(mut self, max: i32) -> Self {
        self.vital_max = max;
        self
    }

    /// Save configuration to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Load and validate configuration from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ShapingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.achievement_weights.len(), 22);
        assert_eq!(config.milestones.len(), 4);
        assert_eq!(config.vital_baseline, 9);
        assert_eq!(config.vital_max, 9);
    }

    #[test]
    fn test_milestone_prerequisites_reference_known_achievements() {
        // Not a validation rule (prerequisites may name zero-weight
        // ids), but the default tables should be internally consistent.
        let config = ShapingConfig::default();
        for milestone in config.milestones.values() {
            for id in &milestone.requires {
                assert!(
                    config.achievement_weights.contains_key(id),
                    "Default milestone prerequisite '{}' missing from weight table",
                    id
                );
            }
        }
    }

    #[test]
    fn test_config_validation() {
        let config = ShapingConfig::new();
        assert!(config.validate().is_ok());

        // Negative achievement weight
        let config = ShapingConfig::new().achievement_weight("collect_wood", -0.1);
        assert!(config.validate().is_err());

        // Non-finite milestone bonus
        let config =
            ShapingConfig::new().milestone("bad", Milestone::new(["collect_wood"], f32::NAN));
        assert!(config.validate().is_err());

        // Negative vital weight
        let config = ShapingConfig::new().vital_weight(Vital::Health, -1.0);
        assert!(config.validate().is_err());

        // Baseline outside the vital range
        let config = ShapingConfig::new().vital_baseline(10);
        assert!(config.validate().is_err());

        // Zero weights are allowed
        let config = ShapingConfig::new().achievement_weight("collect_wood", 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ShapingConfig::new()
            .achievement_weight("collect_wood", 0.25)
            .milestone("wood_age", Milestone::new(["collect_wood"], 1.0))
            .vital_weight(Vital::Energy, 0.2)
            .vital_baseline(5);

        assert_eq!(config.achievement_weights["collect_wood"], 0.25);
        assert_eq!(config.milestones["wood_age"].bonus, 1.0);
        assert_eq!(config.vital_weights[&Vital::Energy], 0.2);
        assert_eq!(config.vital_baseline, 5);

        // Untouched entries keep their defaults
        assert_eq!(config.achievement_weights["collect_diamond"], 1.5);
    }

    #[test]
    fn test_json_roundtrip() -> Result<()> {
        let config = ShapingConfig::default();
        let temp_file = NamedTempFile::new()?;

        config.save_json(temp_file.path())?;
        let loaded = ShapingConfig::load_json(temp_file.path())?;

        assert_eq!(config, loaded);
        Ok(())
    }

    #[test]
    fn test_load_rejects_invalid_config() -> Result<()> {
        let config = ShapingConfig::new().achievement_weight("collect_wood", -1.0);
        let temp_file = NamedTempFile::new()?;

        // save_json does not validate; load_json must
        config.save_json(temp_file.path())?;
        assert!(ShapingConfig::load_json(temp_file.path()).is_err());
        Ok(())
    }
}
