//! Tunable balance values shared by live play and the simulators.
//!
//! Every number a designer might want to tweak lives in [`Balance`]. Values
//! can be overridden from a JSON file; missing fields keep their defaults.

use crate::core::constants::DEFAULT_MAX_LOG_ENTRIES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    // =========================================================================
    // LEVELING
    // =========================================================================
    /// Experience needed for the next level is `xp_per_level * level`.
    pub xp_per_level: u64,
    /// Max health gained per level.
    pub level_up_health_bonus: u32,

    // =========================================================================
    // REWARDS
    // =========================================================================
    /// Regular monster: experience = factor * dungeon difficulty.
    pub monster_xp_per_difficulty: u64,
    /// Final boss: experience = factor * dungeon difficulty.
    pub boss_xp_per_difficulty: u64,
    /// Final boss: gold = difficulty ^ exponent.
    pub boss_gold_exponent: u32,

    // =========================================================================
    // HEALING
    // =========================================================================
    /// Fraction of max health a potion restores when the catalog has no entry.
    pub potion_heal_fraction: f64,
    /// Health restored per monster part spent in town.
    pub part_heal_amount: u32,
    /// Health restored per tick without monster parts.
    pub natural_heal_amount: u32,

    // =========================================================================
    // DECISIONS
    // =========================================================================
    /// Minimum estimated success chance (percent) for a dungeon to count as safe.
    pub explore_threshold: u32,
    /// Monte-Carlo trials per success estimate.
    pub estimator_trials: u32,

    /// Event log capacity.
    pub max_log_entries: usize,
}

impl Default for Balance {
    fn default() -> Self {
        Self {
            xp_per_level: 100,
            level_up_health_bonus: 5,
            monster_xp_per_difficulty: 10,
            boss_xp_per_difficulty: 20,
            boss_gold_exponent: 2,
            potion_heal_fraction: 0.2,
            part_heal_amount: 5,
            natural_heal_amount: 1,
            explore_threshold: 50,
            estimator_trials: 1000,
            max_log_entries: DEFAULT_MAX_LOG_ENTRIES,
        }
    }
}

impl Balance {
    /// The earlier boss reward scheme: 50x difficulty experience, linear gold.
    pub fn legacy_rewards() -> Self {
        Self {
            boss_xp_per_difficulty: 50,
            boss_gold_exponent: 1,
            ..Default::default()
        }
    }

    /// Experience required to go from `level` to `level + 1`.
    pub fn xp_for_next_level(&self, level: u32) -> u64 {
        self.xp_per_level * level as u64
    }

    pub fn boss_gold(&self, difficulty: u32) -> u32 {
        difficulty.saturating_pow(self.boss_gold_exponent)
    }

    pub fn from_json_str(json: &str) -> io::Result<Self> {
        serde_json::from_str(json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Loads balance overrides from a JSON file.
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reward_scheme() {
        let balance = Balance::default();
        assert_eq!(balance.boss_xp_per_difficulty, 20);
        assert_eq!(balance.boss_gold(3), 9);
        assert_eq!(balance.xp_for_next_level(1), 100);
        assert_eq!(balance.xp_for_next_level(4), 400);
    }

    #[test]
    fn test_legacy_reward_scheme() {
        let balance = Balance::legacy_rewards();
        assert_eq!(balance.boss_xp_per_difficulty, 50);
        assert_eq!(balance.boss_gold(3), 3);
        assert_eq!(balance.monster_xp_per_difficulty, 10);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let balance = Balance::from_json_str(r#"{ "estimator_trials": 200 }"#).unwrap();
        assert_eq!(balance.estimator_trials, 200);
        assert_eq!(balance.part_heal_amount, 5);
        assert_eq!(balance.explore_threshold, 50);
    }

    #[test]
    fn test_invalid_json_is_invalid_data() {
        let err = Balance::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
