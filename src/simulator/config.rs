//! Simulation configuration.

use crate::core::balance::Balance;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random). Run `i` uses `seed + i`.
    pub seed: Option<u64>,

    /// Ticks simulated per run
    pub ticks_per_run: u64,

    /// Heroes present at the start of each run
    pub starting_heroes: u32,

    /// Automated town management stops upgrading buildings past this level
    pub max_building_level: u32,

    /// Balance values every run plays with
    pub balance: Balance,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            ticks_per_run: 3_600,
            starting_heroes: 1,
            max_building_level: 5,
            balance: Balance::default(),
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for comparing the two reward schemes
    pub fn legacy_rewards(num_runs: u32) -> Self {
        Self {
            num_runs,
            balance: Balance::legacy_rewards(),
            ..Default::default()
        }
    }
}
