//! Dungeon progress tracking through the public API and through full ticks.

use heroville::core::tick::{game_tick, TickEvent};
use heroville::dungeon::{starting_dungeon, AdvanceResult, Dungeon};
use heroville::hero::{Hero, HeroStatus};
use heroville::GameState;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn quiet_dungeon(length: u32) -> Dungeon {
    let mut dungeon = starting_dungeon("cave").unwrap();
    dungeon.length = length;
    dungeon.encounter_rate = 0.0;
    dungeon
}

#[test]
fn test_quiet_dungeon_only_spawns_the_boss() {
    let mut dungeon = quiet_dungeon(5);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    dungeon.add_explorer("hero_a", 0);

    let mut results = Vec::new();
    for _ in 0..6 {
        results.push(dungeon.advance_explorer("hero_a", &mut rng));
    }

    let regular = results
        .iter()
        .filter(|r| matches!(r, AdvanceResult::Encounter { is_final: false, .. }))
        .count();
    let bosses = results
        .iter()
        .filter(|r| matches!(r, AdvanceResult::Encounter { is_final: true, .. }))
        .count();
    assert_eq!(regular, 0);
    assert_eq!(bosses, 1);
    assert_eq!(results[5], AdvanceResult::AlreadyAtEnd);

    let explorer = dungeon.explorer_progress("hero_a").unwrap();
    assert_eq!(explorer.progress, 5);
    assert!(explorer.current_encounter.as_ref().unwrap().is_boss());
}

#[test]
fn test_boss_stays_the_same_across_polls() {
    let mut dungeon = quiet_dungeon(3);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    dungeon.add_explorer("hero_a", 3);

    dungeon.advance_explorer("hero_a", &mut rng);
    let before = dungeon.explorer_progress("hero_a").unwrap().clone();
    for _ in 0..10 {
        assert_eq!(
            dungeon.advance_explorer("hero_a", &mut rng),
            AdvanceResult::AlreadyAtEnd
        );
    }
    assert_eq!(dungeon.explorer_progress("hero_a").unwrap(), &before);
}

#[test]
fn test_two_explorers_do_not_share_state() {
    let mut dungeon = starting_dungeon("crypt").unwrap();
    dungeon.encounter_rate = 1.0;
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    dungeon.add_explorer("hero_a", 0);
    dungeon.add_explorer("hero_b", 10);

    let b_before = dungeon.explorer_progress("hero_b").unwrap().clone();
    assert!(matches!(
        dungeon.advance_explorer("hero_a", &mut rng),
        AdvanceResult::Encounter { is_final: false, .. }
    ));
    assert!(!dungeon.complete_encounter("hero_a"));

    assert_eq!(dungeon.explorer_progress("hero_b").unwrap(), &b_before);
    assert_eq!(dungeon.explorer_progress("hero_a").unwrap().progress, 1);
    assert_eq!(dungeon.explorer_count(), 2);
}

#[test]
fn test_hero_clears_quiet_dungeon_through_ticks() {
    let mut state = GameState::default();
    let mut hero = Hero::new("Test Hero");
    hero.min_damage = 100;
    hero.max_damage = 100;
    hero.has_shopped = true;
    let id = hero.id.clone();
    state.heroes.push(hero);
    {
        let cave = state.dungeon_mut("cave").unwrap();
        cave.discovered = true;
        cave.length = 3;
        cave.encounter_rate = 0.0;
    }
    state.assign_hero(&id, "cave").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let mut events = Vec::new();
    for _ in 0..6 {
        events.extend(game_tick(&mut state, &mut rng).events);
        if state.hero(&id).unwrap().status != HeroStatus::Exploring {
            break;
        }
    }

    assert!(events
        .iter()
        .any(|e| matches!(e, TickEvent::EncounterStarted { is_final: true, .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, TickEvent::ReturnedToTown { victory: true, .. })));
    let cave = state.dungeon("cave").unwrap();
    assert!(cave.completed);
    assert_eq!(cave.explorer_count(), 0);
    let hero = state.hero(&id).unwrap();
    assert!(hero.dungeon_id.is_none());
    assert!(!hero.in_combat);
}

#[test]
fn test_exploring_heroes_each_get_a_record() {
    let mut state = GameState::default();
    state.dungeon_mut("cave").unwrap().discovered = true;
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let a = state.spawn_hero(&mut rng);
    let b = state.spawn_hero(&mut rng);
    state.assign_hero(&a, "cave").unwrap();
    state.assign_hero(&b, "cave").unwrap();

    let cave = state.dungeon("cave").unwrap();
    assert_eq!(cave.explorer_count(), 2);
    assert!(cave.explorer_progress(&a).is_some());
    assert!(cave.explorer_progress(&b).is_some());
}

#[test]
fn test_reassigned_hero_is_tracked_by_one_dungeon() {
    let mut state = GameState::default();
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    for dungeon in &mut state.dungeons {
        dungeon.discovered = true;
        dungeon.encounter_rate = 0.0;
    }
    let mut hero = Hero::new("Wanderer");
    hero.has_shopped = true;
    let id = hero.id.clone();
    state.heroes.push(hero);
    state.assign_hero(&id, "cave").unwrap();
    for _ in 0..3 {
        game_tick(&mut state, &mut rng);
    }
    assert_eq!(state.dungeon("cave").unwrap().explorer_progress(&id).unwrap().progress, 3);

    state.assign_hero(&id, "forest").unwrap();

    assert!(state.dungeon("cave").unwrap().explorer_progress(&id).is_none());
    assert_eq!(state.dungeon("forest").unwrap().explorer_progress(&id).unwrap().progress, 0);

    state.assign_hero(&id, "cave").unwrap();

    let tracking = state
        .dungeons
        .iter()
        .filter(|d| d.explorer_progress(&id).is_some())
        .count();
    assert_eq!(tracking, 1);
    let hero = state.hero(&id).unwrap();
    assert_eq!(hero.dungeon_id.as_deref(), Some("cave"));
    assert_eq!(hero.dungeon_progress, 0);
    assert_eq!(state.dungeon("cave").unwrap().explorer_progress(&id).unwrap().progress, 0);
    assert_eq!(hero.status, HeroStatus::Exploring);
}

#[test]
fn test_reassigning_mid_fight_drops_the_fight() {
    let mut state = GameState::default();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    for dungeon in &mut state.dungeons {
        dungeon.discovered = true;
    }
    state.dungeon_mut("cave").unwrap().encounter_rate = 1.0;
    state.dungeon_mut("forest").unwrap().encounter_rate = 0.0;
    let mut hero = Hero::new("Wanderer");
    hero.has_shopped = true;
    hero.inventory.gold = 9;
    let id = hero.id.clone();
    state.heroes.push(hero);
    state.assign_hero(&id, "cave").unwrap();
    game_tick(&mut state, &mut rng);
    assert!(state.hero(&id).unwrap().in_combat);

    state.assign_hero(&id, "forest").unwrap();

    let hero = state.hero(&id).unwrap();
    assert!(!hero.in_combat);
    assert_eq!(hero.inventory.gold, 9);
    let result = game_tick(&mut state, &mut rng);
    assert!(!result
        .events
        .iter()
        .any(|e| matches!(e, TickEvent::HeroAttack { .. })));
    assert_eq!(state.hero(&id).unwrap().dungeon_progress, 1);
}
