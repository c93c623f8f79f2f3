//! Simulation report generation.

use super::runner::RunStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub ticks_per_run: u64,

    // Aggregated stats
    pub avg_clears: f64,
    pub avg_defeats: f64,
    pub avg_levels_gained: f64,
    pub avg_monsters_defeated: f64,
    pub avg_weapons_broken: f64,
    pub avg_final_heroes: f64,
    pub avg_max_hero_level: f64,
    pub avg_hero_gold: f64,
    pub avg_town_gold: f64,
    pub avg_dungeons_discovered: f64,

    /// Fraction of runs that cleared each dungeon at least once
    pub clear_rate_by_dungeon: BTreeMap<String, f64>,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn average(runs: &[RunStats], value: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(value).sum::<f64>() / runs.len() as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, ticks_per_run: u64) -> Self {
        let num_runs = runs.len() as u32;

        let mut clear_rate_by_dungeon = BTreeMap::new();
        for run in &runs {
            for (dungeon_id, &clears) in &run.clears_by_dungeon {
                if clears > 0 {
                    *clear_rate_by_dungeon.entry(dungeon_id.clone()).or_insert(0.0) += 1.0;
                }
            }
        }
        for rate in clear_rate_by_dungeon.values_mut() {
            *rate /= num_runs.max(1) as f64;
        }

        Self {
            num_runs,
            ticks_per_run,
            avg_clears: average(&runs, |r| r.clears as f64),
            avg_defeats: average(&runs, |r| r.defeats as f64),
            avg_levels_gained: average(&runs, |r| r.levels_gained as f64),
            avg_monsters_defeated: average(&runs, |r| r.monsters_defeated as f64),
            avg_weapons_broken: average(&runs, |r| r.weapons_broken as f64),
            avg_final_heroes: average(&runs, |r| r.final_heroes as f64),
            avg_max_hero_level: average(&runs, |r| r.max_hero_level as f64),
            avg_hero_gold: average(&runs, |r| r.hero_gold as f64),
            avg_town_gold: average(&runs, |r| r.town_gold as f64),
            avg_dungeons_discovered: average(&runs, |r| r.dungeons_discovered as f64),
            clear_rate_by_dungeon,
            run_stats: runs,
        }
    }

    /// Defeats per successful clear; 0 when nothing was cleared.
    pub fn defeats_per_clear(&self) -> f64 {
        if self.avg_clears > 0.0 {
            self.avg_defeats / self.avg_clears
        } else {
            0.0
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} x {} ticks\n\n",
            self.num_runs, self.ticks_per_run
        ));

        report.push_str("── HEROES ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Heroes:          {:.1}\n", self.avg_final_heroes));
        report.push_str(&format!("  Avg Max Level:       {:.1}\n", self.avg_max_hero_level));
        report.push_str(&format!("  Avg Levels Gained:   {:.1}\n", self.avg_levels_gained));
        report.push_str(&format!("  Avg Monsters Slain:  {:.0}\n", self.avg_monsters_defeated));
        report.push_str(&format!("  Avg Weapons Broken:  {:.1}\n\n", self.avg_weapons_broken));

        report.push_str("── DUNGEONS ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Clears:          {:.1}\n", self.avg_clears));
        report.push_str(&format!("  Avg Defeats:         {:.1}\n", self.avg_defeats));
        report.push_str(&format!("  Avg Discovered:      {:.1}\n", self.avg_dungeons_discovered));
        for (dungeon_id, rate) in &self.clear_rate_by_dungeon {
            let pct = rate * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  {:<8} {:>5.1}% {}\n", dungeon_id, pct, bar));
        }
        report.push('\n');

        report.push_str("── ECONOMY ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Hero Gold:       {:.0}\n", self.avg_hero_gold));
        report.push_str(&format!("  Avg Town Gold:       {:.0}\n\n", self.avg_town_gold));

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let ratio = self.defeats_per_clear();
        let rating = if self.avg_clears == 0.0 {
            "STUCK - No dungeon was ever cleared"
        } else if ratio < 0.2 {
            "TOO EASY - Heroes rarely fall"
        } else if ratio < 1.0 {
            "GOOD - Challenging but fair"
        } else {
            "TOO HARD - More defeats than clears"
        };
        report.push_str(&format!("  Defeats per Clear: {:.2}\n", ratio));
        report.push_str(&format!("  Rating:            {}\n", rating));

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
