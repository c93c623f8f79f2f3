//! What an idle hero does next.

use super::types::{Hero, HeroStatus};
use crate::core::balance::Balance;
use crate::core::game_state::GameState;
use crate::core::tick::TickEvent;
use crate::dungeon::Dungeon;
use crate::exploration::assign_hero_to_dungeon;
use crate::simulator::estimator::estimate_success_chance;
use crate::town::TownCatalog;
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonChoice {
    pub dungeon_id: String,
    pub success_chance: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroDecision {
    /// The hero is not idle; nothing to decide.
    Busy,
    Heal,
    /// Visit the shop first; `best` sizes weapon repairs.
    Shop { best: Option<DungeonChoice> },
    Explore(DungeonChoice),
    StayIdle,
}

/// Picks a dungeon from `(dungeon, estimated chance)` pairs.
///
/// Among dungeons at or above `threshold`, the hardest wins. If none is
/// that safe, the single highest chance wins, provided it is above zero.
/// Ties go to the earlier entry.
pub fn choose_best_dungeon(candidates: &[(&Dungeon, u32)], threshold: u32) -> Option<DungeonChoice> {
    let mut safest: Option<(&Dungeon, u32)> = None;
    let mut fallback: Option<(&Dungeon, u32)> = None;

    for &(dungeon, chance) in candidates {
        if chance >= threshold && safest.map_or(true, |(best, _)| dungeon.difficulty > best.difficulty) {
            safest = Some((dungeon, chance));
        }
        if chance > 0 && fallback.map_or(true, |(_, best)| chance > best) {
            fallback = Some((dungeon, chance));
        }
    }

    safest.or(fallback).map(|(dungeon, chance)| DungeonChoice {
        dungeon_id: dungeon.id.clone(),
        success_chance: chance,
    })
}

/// The idle decision procedure. Does not mutate anything; see
/// [`process_hero_decisions`] for how each decision is applied.
pub fn decide_next_action(
    hero: &Hero,
    dungeons: &[Dungeon],
    catalog: &dyn TownCatalog,
    balance: &Balance,
    rng: &mut impl Rng,
) -> HeroDecision {
    if hero.status != HeroStatus::Idle {
        return HeroDecision::Busy;
    }
    if !hero.is_full_health() {
        return HeroDecision::Heal;
    }

    let mut candidates = Vec::new();
    for dungeon in dungeons.iter().filter(|d| d.discovered) {
        let chance =
            estimate_success_chance(hero, dungeon, catalog, balance, balance.estimator_trials, rng);
        debug!(hero = %hero.name, dungeon = %dungeon.id, chance, "success estimate");
        candidates.push((dungeon, chance));
    }
    let best = choose_best_dungeon(&candidates, balance.explore_threshold);

    if !hero.has_shopped {
        return HeroDecision::Shop { best };
    }
    match best {
        Some(choice) => HeroDecision::Explore(choice),
        None => HeroDecision::StayIdle,
    }
}

/// Idle-decision phase.
pub fn process_hero_decisions(
    state: &mut GameState,
    catalog: &dyn TownCatalog,
    rng: &mut impl Rng,
) -> Vec<TickEvent> {
    let mut events = Vec::new();
    let idle = state.heroes_with_status(HeroStatus::Idle);

    for hero_id in idle {
        let GameState {
            heroes,
            dungeons,
            balance,
            ..
        } = &mut *state;
        let Some(hero) = heroes.iter_mut().find(|h| h.id == hero_id) else {
            continue;
        };

        match decide_next_action(hero, dungeons, catalog, balance, rng) {
            HeroDecision::Busy => {}
            HeroDecision::Heal => {
                hero.set_status(HeroStatus::Healing, None);
                hero.next_shopping_dungeon = None;
                events.push(TickEvent::DecidedToHeal {
                    hero_id: hero.id.clone(),
                    message: format!("{} decided to rest and heal.", hero.name),
                });
            }
            HeroDecision::Shop { best } => {
                hero.set_status(HeroStatus::Shopping, None);
                hero.has_shopped = true;
                hero.success_chance = None;
                hero.next_shopping_dungeon = best.map(|choice| choice.dungeon_id);
                events.push(TickEvent::DecidedToShop {
                    hero_id: hero.id.clone(),
                    message: format!("{} decided to go shopping.", hero.name),
                });
            }
            HeroDecision::Explore(choice) => {
                let Some(dungeon) = dungeons.iter_mut().find(|d| d.id == choice.dungeon_id) else {
                    continue;
                };
                events.push(assign_hero_to_dungeon(
                    hero,
                    dungeon,
                    Some(choice.success_chance),
                ));
            }
            HeroDecision::StayIdle => {
                hero.success_chance = None;
                hero.next_shopping_dungeon = None;
            }
        }
    }

    events
}
