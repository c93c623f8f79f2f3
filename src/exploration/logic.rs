//! Exploration and healing phases, plus dungeon assignment.

use crate::core::game_state::GameState;
use crate::core::tick::TickEvent;
use crate::dungeon::{AdvanceResult, Dungeon};
use crate::hero::{Hero, HeroStatus, ResetReason};
use rand::Rng;
use tracing::{debug, warn};

/// Puts a hero into a dungeon and registers it as an explorer, reusing an
/// existing record if the dungeon still has one. The hero must not be
/// tracked by any other dungeon.
///
/// The combat flag starts cleared; a pending encounter in a reused record
/// is picked up again by the next exploration step.
pub fn assign_hero_to_dungeon(
    hero: &mut Hero,
    dungeon: &mut Dungeon,
    success_chance: Option<u32>,
) -> TickEvent {
    hero.set_status(HeroStatus::Exploring, Some(dungeon.id.clone()));
    dungeon.add_explorer(&hero.id, 0);
    hero.dungeon_progress = dungeon
        .explorer_progress(&hero.id)
        .map_or(0, |explorer| explorer.progress);
    hero.in_combat = false;
    hero.success_chance = success_chance;
    hero.next_shopping_dungeon = None;

    TickEvent::ExplorationStarted {
        hero_id: hero.id.clone(),
        dungeon_id: dungeon.id.clone(),
        message: format!("{} is now exploring the {}.", hero.name, dungeon.name),
    }
}

/// Exploration phase: every exploring hero not already fighting takes one
/// step, enters a pending fight, or leaves after a beaten boss.
pub fn process_exploration(state: &mut GameState, rng: &mut impl Rng) -> Vec<TickEvent> {
    let mut events = Vec::new();
    let explorers = state.hero_ids_where(|h| h.status == HeroStatus::Exploring && !h.in_combat);

    for hero_id in explorers {
        let GameState {
            heroes, dungeons, ..
        } = &mut *state;

        let Some(hero) = heroes.iter_mut().find(|h| h.id == hero_id) else {
            continue;
        };
        let Some(dungeon) = hero
            .dungeon_id
            .as_deref()
            .and_then(|id| dungeons.iter_mut().find(|d| d.id == id))
        else {
            warn!(hero = %hero.name, "exploring a missing dungeon, returning to town");
            hero.reset_dungeon_progress(ResetReason::Withdrawal);
            continue;
        };

        explore_step(hero, dungeon, rng, &mut events);
    }

    events
}

fn explore_step(hero: &mut Hero, dungeon: &mut Dungeon, rng: &mut impl Rng, events: &mut Vec<TickEvent>) {
    if dungeon.explorer_progress(&hero.id).is_none() {
        dungeon.add_explorer(&hero.id, hero.dungeon_progress);
    }
    let Some(explorer) = dungeon.explorer_progress(&hero.id) else {
        return;
    };

    if let Some(encounter) = &explorer.current_encounter {
        hero.in_combat = true;
        let message = if encounter.is_boss() {
            format!(
                "{} prepares to fight the final boss in the {}!",
                hero.name, dungeon.name
            )
        } else {
            format!("{} faces a {}!", hero.name, encounter.monster.name)
        };
        events.push(TickEvent::EncounterStarted {
            hero_id: hero.id.clone(),
            monster_name: encounter.monster.name.clone(),
            is_final: encounter.is_boss(),
            message,
        });
        return;
    }

    if explorer.final_monster_defeated {
        dungeon.remove_explorer(&hero.id);
        dungeon.completed = true;
        hero.reset_dungeon_progress(ResetReason::Victory);
        events.push(TickEvent::ReturnedToTown {
            hero_id: hero.id.clone(),
            dungeon_id: dungeon.id.clone(),
            victory: true,
            message: format!(
                "{} was victorious in the {} and returns to town.",
                hero.name, dungeon.name
            ),
        });
        return;
    }

    match dungeon.advance_explorer(&hero.id, rng) {
        AdvanceResult::Encounter {
            progress,
            monster_name,
            is_final,
        } => {
            hero.in_combat = true;
            hero.dungeon_progress = progress;
            let message = if is_final {
                format!(
                    "{} has reached the end of the {} and encounters the {}!",
                    hero.name, dungeon.name, monster_name
                )
            } else {
                format!(
                    "{} encounters a {} in the {}!",
                    hero.name, monster_name, dungeon.name
                )
            };
            events.push(TickEvent::EncounterStarted {
                hero_id: hero.id.clone(),
                monster_name,
                is_final,
                message,
            });
        }
        AdvanceResult::Advanced { progress } => {
            hero.dungeon_progress = progress;
            events.push(TickEvent::Advanced {
                hero_id: hero.id.clone(),
                progress,
                message: format!(
                    "{} advances through the {} ({}/{}).",
                    hero.name, dungeon.name, progress, dungeon.length
                ),
            });
        }
        AdvanceResult::AlreadyAtEnd => {
            debug!(hero = %hero.name, "boss already pending");
        }
        AdvanceResult::NotExploring => {
            warn!(hero = %hero.name, dungeon = %dungeon.id, "explorer record vanished mid-step");
        }
    }
}

/// Healing phase: one part-heal or natural heal per healing hero. Spent
/// parts go to the town pool.
pub fn process_healing(state: &mut GameState) -> Vec<TickEvent> {
    let mut events = Vec::new();
    let healers = state.heroes_with_status(HeroStatus::Healing);

    for hero_id in healers {
        let GameState {
            heroes,
            town,
            balance,
            ..
        } = &mut *state;
        let Some(hero) = heroes.iter_mut().find(|h| h.id == hero_id) else {
            continue;
        };

        if hero.inventory.monster_parts > 0 {
            let spent = hero.fast_heal(1, balance);
            town.resources.monster_parts += spent;
            events.push(TickEvent::HealedWithPart {
                hero_id: hero.id.clone(),
                message: format!("{} spends 1 monster part to heal quickly.", hero.name),
            });
        } else {
            hero.heal(balance.natural_heal_amount);
        }

        if hero.is_full_health() {
            hero.set_status(HeroStatus::Idle, None);
            events.push(TickEvent::FullyHealed {
                hero_id: hero.id.clone(),
                message: format!(
                    "{} has fully recovered and is ready for adventure!",
                    hero.name
                ),
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::starting_dungeon;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state_with_hero() -> (GameState, String) {
        let mut state = GameState::default();
        let hero = Hero::new("Test Hero");
        let id = hero.id.clone();
        state.heroes.push(hero);
        (state, id)
    }

    #[test]
    fn test_assign_creates_explorer_once() {
        let mut hero = Hero::new("Test");
        let mut cave = starting_dungeon("cave").unwrap();
        hero.has_shopped = true;

        assign_hero_to_dungeon(&mut hero, &mut cave, Some(90));
        assert_eq!(hero.status, HeroStatus::Exploring);
        assert_eq!(hero.dungeon_id.as_deref(), Some("cave"));
        assert_eq!(hero.success_chance, Some(90));
        assert!(!hero.has_shopped);
        assert_eq!(cave.explorer_count(), 1);

        assign_hero_to_dungeon(&mut hero, &mut cave, Some(90));
        assert_eq!(cave.explorer_count(), 1);
    }

    #[test]
    fn test_reused_record_sets_progress_and_clears_combat() {
        let mut hero = Hero::new("Test");
        let mut cave = starting_dungeon("cave").unwrap();
        cave.add_explorer(&hero.id, 4);
        hero.in_combat = true;

        assign_hero_to_dungeon(&mut hero, &mut cave, None);

        assert_eq!(hero.dungeon_progress, 4);
        assert!(!hero.in_combat);
        assert_eq!(cave.explorer_progress(&hero.id).unwrap().progress, 4);
    }

    #[test]
    fn test_healing_with_part_feeds_town() {
        let (mut state, id) = state_with_hero();
        let hero = state.hero_mut(&id).unwrap();
        hero.status = HeroStatus::Healing;
        hero.health = 40;
        hero.inventory.monster_parts = 2;

        let events = process_healing(&mut state);

        let hero = state.hero(&id).unwrap();
        assert_eq!(hero.health, 45);
        assert_eq!(hero.inventory.monster_parts, 1);
        assert_eq!(state.town.resources.monster_parts, 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_natural_healing_until_full() {
        let (mut state, id) = state_with_hero();
        let hero = state.hero_mut(&id).unwrap();
        hero.status = HeroStatus::Healing;
        hero.health = 48;

        assert!(process_healing(&mut state).is_empty());
        assert_eq!(state.hero(&id).unwrap().health, 49);

        let events = process_healing(&mut state);
        assert!(matches!(events[0], TickEvent::FullyHealed { .. }));
        assert_eq!(state.hero(&id).unwrap().status, HeroStatus::Idle);
    }

    #[test]
    fn test_exploration_registers_missing_explorer() {
        let (mut state, id) = state_with_hero();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let hero = state.hero_mut(&id).unwrap();
        hero.set_status(HeroStatus::Exploring, Some("cave".to_string()));
        hero.dungeon_progress = 3;

        process_exploration(&mut state, &mut rng);

        let explorer = state.dungeon("cave").unwrap().explorer_progress(&id).unwrap();
        assert_eq!(explorer.progress, 4);
        assert_eq!(state.hero(&id).unwrap().dungeon_progress, 4);
    }

    #[test]
    fn test_exploration_missing_dungeon_returns_hero() {
        let (mut state, id) = state_with_hero();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        state
            .hero_mut(&id)
            .unwrap()
            .set_status(HeroStatus::Exploring, Some("atlantis".to_string()));

        process_exploration(&mut state, &mut rng);

        let hero = state.hero(&id).unwrap();
        assert_eq!(hero.status, HeroStatus::Idle);
        assert!(hero.dungeon_id.is_none());
    }

    #[test]
    fn test_beaten_boss_record_sends_hero_home() {
        let (mut state, id) = state_with_hero();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        state
            .hero_mut(&id)
            .unwrap()
            .set_status(HeroStatus::Exploring, Some("cave".to_string()));
        let cave = state.dungeon_mut("cave").unwrap();
        cave.add_explorer(&id, 10);
        cave.explorer_progress_mut(&id).unwrap().final_monster_defeated = true;

        let events = process_exploration(&mut state, &mut rng);

        assert!(matches!(
            events[0],
            TickEvent::ReturnedToTown { victory: true, .. }
        ));
        let cave = state.dungeon("cave").unwrap();
        assert_eq!(cave.explorer_count(), 0);
        assert!(cave.completed);
        assert_eq!(state.hero(&id).unwrap().status, HeroStatus::Idle);
    }
}
