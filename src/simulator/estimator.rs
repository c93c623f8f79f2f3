//! Monte-Carlo estimate of a hero's chance to clear a dungeon.

use crate::combat::fight_to_completion;
use crate::core::balance::Balance;
use crate::dungeon::Dungeon;
use crate::hero::Hero;
use crate::town::TownCatalog;
use rand::Rng;

/// Runs `trials` independent simulated runs and returns the percentage
/// (0-100, rounded) the hero survived. Each run starts from a copy of the
/// hero at full health; potions and durability spent in one run do not
/// carry into the next.
pub fn estimate_success_chance(
    hero: &Hero,
    dungeon: &Dungeon,
    catalog: &dyn TownCatalog,
    balance: &Balance,
    trials: u32,
    rng: &mut impl Rng,
) -> u32 {
    if trials == 0 {
        return 0;
    }
    let mut successes = 0u32;
    for _ in 0..trials {
        if simulate_run(hero, dungeon, catalog, balance, rng) {
            successes += 1;
        }
    }
    (successes as f64 * 100.0 / trials as f64).round() as u32
}

/// One full run: every step may bring a regular fight, then the boss.
pub fn simulate_run(
    hero: &Hero,
    dungeon: &Dungeon,
    catalog: &dyn TownCatalog,
    balance: &Balance,
    rng: &mut impl Rng,
) -> bool {
    let mut sim = hero.clone();
    sim.health = sim.max_health;

    for _ in 0..dungeon.length {
        if rng.gen::<f64>() < dungeon.encounter_rate
            && !fight_to_completion(&mut sim, dungeon.spawn_monster(), catalog, balance, rng)
        {
            return false;
        }
    }

    let boss = dungeon.spawn_boss(rng);
    fight_to_completion(&mut sim, boss, catalog, balance, rng)
}
