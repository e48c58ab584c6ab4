//! Tech-tree milestone detection
//!
//! A milestone fires on the exact step its full prerequisite set first
//! appears in the achievement ledger, and never again that episode.

use std::collections::{BTreeMap, BTreeSet};

use crate::shaping::config::Milestone;

/// Per-episode record of completed milestones
///
/// Milestone names live in their own namespace, disjoint from
/// achievement identifiers; completion reads the achievement ledger but
/// never feeds back into it.
#[derive(Debug, Clone, Default)]
pub struct MilestoneDetector {
    completed: BTreeSet<String>,
}

impl MilestoneDetector {
    /// Create a detector with no completed milestones
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all completed milestones (episode start)
    pub fn reset(&mut self) {
        self.completed.clear();
    }

    /// Fire every milestone whose prerequisites are now satisfied
    ///
    /// Milestones are evaluated in map order, so a step that satisfies
    /// several at once fires them all, deterministically. A milestone
    /// with an empty prerequisite set fires on the first evaluation of
    /// the episode. Returns the total bonus and the milestones fired
    /// this step.
    pub fn evaluate(
        &mut self,
        milestones: &BTreeMap<String, Milestone>,
        credited_achievements: &BTreeSet<String>,
    ) -> (f32, Vec<String>) {
        let mut bonus = 0.0_f32;
        let mut fired = Vec::new();

        for (name, milestone) in milestones {
            if self.completed.contains(name) {
                continue;
            }
            if milestone.requires.is_subset(credited_achievements) {
                self.completed.insert(name.clone());
                tracing::info!("Milestone reached: {} (+{})", name, milestone.bonus);
                bonus += milestone.bonus;
                fired.push(name.clone());
            }
        }

        (bonus, fired)
    }

    /// Whether a milestone has fired this episode
    pub fn is_completed(&self, name: &str) -> bool {
        self.completed.contains(name)
    }

    /// All milestones completed this episode
    pub fn completed(&self) -> &BTreeSet<String> {
        &self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestones() -> BTreeMap<String, Milestone> {
        let mut m = BTreeMap::new();
        m.insert(
            "stone_age".to_string(),
            Milestone::new(["make_stone_pickaxe"], 2.0),
        );
        m.insert(
            "iron_age".to_string(),
            Milestone::new(["place_furnace", "make_iron_ingot", "make_iron_pickaxe"], 6.0),
        );
        m
    }

    fn credited(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fires_when_prerequisites_met() {
        let mut detector = MilestoneDetector::new();

        let (bonus, fired) = detector.evaluate(&milestones(), &credited(&["make_stone_pickaxe"]));
        assert!((bonus - 2.0).abs() < 1e-6);
        assert_eq!(fired, vec!["stone_age".to_string()]);
        assert!(detector.is_completed("stone_age"));
    }

    #[test]
    fn test_does_not_fire_on_partial_prerequisites() {
        let mut detector = MilestoneDetector::new();

        let (bonus, fired) =
            detector.evaluate(&milestones(), &credited(&["place_furnace", "make_iron_ingot"]));
        assert_eq!(bonus, 0.0, "iron_age requires all three prerequisites");
        assert!(fired.is_empty());
    }

    #[test]
    fn test_fires_at_most_once() {
        let mut detector = MilestoneDetector::new();
        let achieved = credited(&["make_stone_pickaxe"]);

        detector.evaluate(&milestones(), &achieved);
        let (bonus, fired) = detector.evaluate(&milestones(), &achieved);
        assert_eq!(bonus, 0.0, "Milestone must not fire twice in one episode");
        assert!(fired.is_empty());
    }

    #[test]
    fn test_multiple_milestones_fire_in_one_step() {
        let mut detector = MilestoneDetector::new();
        let achieved = credited(&[
            "make_stone_pickaxe",
            "place_furnace",
            "make_iron_ingot",
            "make_iron_pickaxe",
        ]);

        let (bonus, fired) = detector.evaluate(&milestones(), &achieved);
        assert!((bonus - 8.0).abs() < 1e-6);
        // BTreeMap order: iron_age before stone_age
        assert_eq!(fired, vec!["iron_age".to_string(), "stone_age".to_string()]);
    }

    #[test]
    fn test_empty_prerequisites_fire_immediately() {
        let mut table = BTreeMap::new();
        table.insert("freebie".to_string(), Milestone { requires: BTreeSet::new(), bonus: 1.0 });

        let mut detector = MilestoneDetector::new();
        let (bonus, _) = detector.evaluate(&table, &BTreeSet::new());
        assert!((bonus - 1.0).abs() < 1e-6, "Empty prerequisite set is satisfied at once");

        let (bonus, _) = detector.evaluate(&table, &BTreeSet::new());
        assert_eq!(bonus, 0.0, "Still only fires once per episode");
    }

    #[test]
    fn test_reset_allows_refire() {
        let mut detector = MilestoneDetector::new();
        let achieved = credited(&["make_stone_pickaxe"]);

        detector.evaluate(&milestones(), &achieved);
        detector.reset();
        assert!(!detector.is_completed("stone_age"));

        let (bonus, _) = detector.evaluate(&milestones(), &achieved);
        assert!((bonus - 2.0).abs() < 1e-6);
    }
}
