//! Main simulation runner.
//!
//! Each run drives a fresh [`Game`] through the real tick function, with a
//! simple automated town manager standing in for the player. Statistics
//! are tracked externally from `TickResult` events.

use super::config::SimConfig;
use super::report::SimReport;
use crate::core::balance::Balance;
use crate::core::game_loop::{Game, GameLoop};
use crate::core::game_state::GameState;
use crate::core::tick::{TickEvent, TickResult};
use crate::town::{BuildingKind, StandardCatalog, TownCatalog};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Outcome of one simulated session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub seed: Option<u64>,
    pub total_ticks: u64,
    pub clears: u64,
    pub defeats: u64,
    pub levels_gained: u64,
    pub monsters_defeated: u64,
    pub weapons_broken: u64,
    /// Victories per dungeon id
    pub clears_by_dungeon: BTreeMap<String, u64>,
    pub final_heroes: u32,
    pub max_hero_level: u32,
    pub avg_hero_level: f64,
    pub hero_gold: u64,
    pub town_gold: u64,
    pub dungeons_discovered: u32,
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let seed = config.seed.map(|seed| seed.wrapping_add(run_idx as u64));
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut run_stats = simulate_single_run(config, &mut rng);
        run_stats.seed = seed;

        if config.verbosity >= 2 {
            info!(
                run = run_idx + 1,
                of = config.num_runs,
                clears = run_stats.clears,
                defeats = run_stats.defeats,
                max_level = run_stats.max_hero_level,
                heroes = run_stats.final_heroes,
                "run finished"
            );
        }
        all_runs.push(run_stats);
    }

    let report = SimReport::from_runs(all_runs, config.ticks_per_run);
    if config.verbosity >= 1 {
        info!(
            runs = report.num_runs,
            avg_clears = report.avg_clears,
            avg_defeats = report.avg_defeats,
            "simulation finished"
        );
    }
    report
}

/// Accumulates data from `TickResult` events.
#[derive(Default)]
struct SimStats {
    clears: u64,
    defeats: u64,
    levels_gained: u64,
    monsters_defeated: u64,
    weapons_broken: u64,
    clears_by_dungeon: BTreeMap<String, u64>,
}

impl SimStats {
    fn process_tick(&mut self, result: &TickResult) {
        for event in &result.events {
            match event {
                TickEvent::ReturnedToTown {
                    dungeon_id,
                    victory: true,
                    ..
                } => {
                    self.clears += 1;
                    *self.clears_by_dungeon.entry(dungeon_id.clone()).or_insert(0) += 1;
                }
                TickEvent::ReturnedToTown { victory: false, .. } => self.defeats += 1,
                TickEvent::LeveledUp { .. } => self.levels_gained += 1,
                TickEvent::MonsterDefeated { .. } => self.monsters_defeated += 1,
                TickEvent::WeaponBroke { .. } => self.weapons_broken += 1,
                _ => {}
            }
        }
    }
}

/// A fresh game with the free dungeon discovered and the starting heroes
/// in town.
pub fn bootstrap_state(balance: Balance, starting_heroes: u32, rng: &mut impl Rng) -> GameState {
    let mut state = GameState::new(balance);
    if let Some(first) = state.dungeons.iter().find(|d| d.discovery_cost == 0) {
        let id = first.id.clone();
        let _ = state.discover_dungeon(&id);
    }
    for _ in 0..starting_heroes {
        state.spawn_hero(rng);
    }
    state
}

/// One tick of automated town management: gather, build, scout, craft.
/// Only issues commands that are affordable, so nothing gets rejected.
pub fn manage_town(
    state: &mut GameState,
    catalog: &dyn TownCatalog,
    max_building_level: u32,
    rng: &mut impl Rng,
) {
    state.gather_materials();

    // Cheapest affordable upgrade first.
    let upgrade = state
        .town
        .buildings
        .iter()
        .filter(|b| b.level < max_building_level)
        .map(|b| (b.kind, b.upgrade_cost()))
        .filter(|&(_, cost)| cost <= state.town.resources.materials)
        .min_by_key(|&(_, cost)| cost);
    if let Some((kind, _)) = upgrade {
        let _ = state.upgrade_building(kind, rng);
    }

    let next_dungeon = state
        .dungeons
        .iter()
        .filter(|d| !d.discovered)
        .min_by_key(|d| d.discovery_cost)
        .filter(|d| d.discovery_cost <= state.town.resources.gold)
        .map(|d| d.id.clone());
    if let Some(id) = next_dungeon {
        let _ = state.discover_dungeon(&id);
    }

    craft_for_heroes(state, catalog);
}

fn craft_for_heroes(state: &mut GameState, catalog: &dyn TownCatalog) {
    let wanted_potions = state.heroes.len() as u32;
    let apothecary = state.town.building_level(BuildingKind::Apothecary);
    let potion = catalog
        .consumables_for_level(apothecary)
        .into_iter()
        .find(|c| {
            state.town.potion_stock(c.id) < wanted_potions
                && c.cost_parts <= state.town.resources.monster_parts
        })
        .map(|c| c.id);
    if let Some(id) = potion {
        let _ = state.craft_potion(catalog, id);
    }

    let blacksmith = state.town.building_level(BuildingKind::Blacksmith);
    let weapon = catalog
        .weapons_for_level(blacksmith)
        .into_iter()
        .filter(|w| {
            state.town.weapon_stock(w.id) == 0 && w.cost_parts <= state.town.resources.monster_parts
        })
        .max_by(|a, b| a.average_damage().total_cmp(&b.average_damage()))
        .map(|w| w.id);
    if let Some(id) = weapon {
        let _ = state.craft_weapon(catalog, id);
    }
}

/// Simulate a single run from a fresh town.
fn simulate_single_run(config: &SimConfig, rng: &mut ChaCha8Rng) -> RunStats {
    let catalog = StandardCatalog;
    let state = bootstrap_state(config.balance.clone(), config.starting_heroes, rng);
    let mut game = Game::with_catalog(state, catalog);
    let mut stats = SimStats::default();

    for _ in 0..config.ticks_per_run {
        manage_town(game.state_mut(), &catalog, config.max_building_level, rng);
        let result = game.tick(rng);
        stats.process_tick(&result);
    }

    let state = game.state();
    let hero_count = state.heroes.len() as u32;
    let level_sum: u64 = state.heroes.iter().map(|h| h.level as u64).sum();

    RunStats {
        seed: None,
        total_ticks: state.tick,
        clears: stats.clears,
        defeats: stats.defeats,
        levels_gained: stats.levels_gained,
        monsters_defeated: stats.monsters_defeated,
        weapons_broken: stats.weapons_broken,
        clears_by_dungeon: stats.clears_by_dungeon,
        final_heroes: hero_count,
        max_hero_level: state.heroes.iter().map(|h| h.level).max().unwrap_or(0),
        avg_hero_level: if hero_count > 0 {
            level_sum as f64 / hero_count as f64
        } else {
            0.0
        },
        hero_gold: state.heroes.iter().map(|h| h.inventory.gold as u64).sum(),
        town_gold: state.town.resources.gold as u64,
        dungeons_discovered: state.dungeons.iter().filter(|d| d.discovered).count() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(runs: u32, ticks: u64) -> SimConfig {
        SimConfig {
            num_runs: runs,
            seed: Some(12345),
            ticks_per_run: ticks,
            verbosity: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_bootstrap_discovers_cave() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = bootstrap_state(Balance::default(), 1, &mut rng);
        assert!(state.dungeon("cave").unwrap().discovered);
        assert_eq!(state.heroes.len(), 1);
    }

    #[test]
    fn test_manage_town_upgrades_tent() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut state = bootstrap_state(Balance::default(), 0, &mut rng);

        for _ in 0..5 {
            manage_town(&mut state, &StandardCatalog, 5, &mut rng);
        }

        assert_eq!(state.town.building_level(BuildingKind::Tent), 1);
        assert_eq!(state.heroes.len(), 1);
    }

    #[test]
    fn test_single_run() {
        let config = quick_config(1, 2_000);
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let stats = simulate_single_run(&config, &mut rng);

        assert_eq!(stats.total_ticks, 2_000);
        assert!(stats.monsters_defeated > 0);
        assert!(stats.max_hero_level >= 1);
    }

    #[test]
    fn test_runs_are_reproducible() {
        let config = quick_config(2, 500);
        let a = run_simulation(&config);
        let b = run_simulation(&config);
        assert_eq!(a.num_runs, 2);
        assert_eq!(a.avg_clears, b.avg_clears);
        assert_eq!(a.avg_defeats, b.avg_defeats);
        assert_eq!(a.run_stats[1].seed, Some(12346));
    }
}
