//! Phase ordering inside a single tick.

use heroville::combat::Encounter;
use heroville::core::tick::{game_tick, TickEvent};
use heroville::hero::{Hero, HeroStatus};
use heroville::monster::create_monster;
use heroville::GameState;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn position(events: &[TickEvent], pred: impl Fn(&TickEvent) -> bool) -> usize {
    events
        .iter()
        .position(pred)
        .unwrap_or_else(|| panic!("event not found in {:?}", events))
}

#[test]
fn test_healed_hero_decides_and_shops_in_same_tick() {
    let mut state = GameState::default();
    let mut hero = Hero::new("Test Hero");
    hero.status = HeroStatus::Healing;
    hero.health = 49;
    let id = hero.id.clone();
    state.heroes.push(hero);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let result = game_tick(&mut state, &mut rng);

    let healed = position(&result.events, |e| matches!(e, TickEvent::FullyHealed { .. }));
    let decided = position(&result.events, |e| matches!(e, TickEvent::DecidedToShop { .. }));
    let shopped = position(&result.events, |e| matches!(e, TickEvent::FinishedShopping { .. }));
    assert!(healed < decided && decided < shopped);

    let hero = state.hero(&id).unwrap();
    assert_eq!(hero.status, HeroStatus::Idle);
    assert!(hero.has_shopped);
}

#[test]
fn test_combat_runs_before_exploration() {
    let mut state = GameState::default();
    let mut hero = Hero::new("Test Hero");
    hero.min_damage = 50;
    hero.max_damage = 50;
    let id = hero.id.clone();
    state.heroes.push(hero);
    state.dungeon_mut("cave").unwrap().discovered = true;
    state.assign_hero(&id, "cave").unwrap();
    {
        let cave = state.dungeon_mut("cave").unwrap();
        cave.encounter_rate = 0.0;
        cave.explorer_progress_mut(&id).unwrap().current_encounter =
            Some(Encounter::new(create_monster("Bat", 1)));
    }
    state.hero_mut(&id).unwrap().in_combat = true;
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let result = game_tick(&mut state, &mut rng);

    let defeated = position(&result.events, |e| matches!(e, TickEvent::MonsterDefeated { .. }));
    let advanced = position(&result.events, |e| matches!(e, TickEvent::Advanced { .. }));
    assert!(defeated < advanced);
    assert_eq!(state.hero(&id).unwrap().dungeon_progress, 1);
}

#[test]
fn test_defeated_hero_decides_to_heal_same_tick() {
    let mut state = GameState::default();
    let mut hero = Hero::new("Test Hero");
    hero.health = 1;
    let id = hero.id.clone();
    state.heroes.push(hero);
    state.dungeon_mut("cave").unwrap().discovered = true;
    state.assign_hero(&id, "cave").unwrap();
    let mut ogre = create_monster("Ogre", 9);
    ogre.min_damage = ogre.max_damage;
    state
        .dungeon_mut("cave")
        .unwrap()
        .explorer_progress_mut(&id)
        .unwrap()
        .current_encounter = Some(Encounter::new(ogre));
    state.hero_mut(&id).unwrap().in_combat = true;
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let result = game_tick(&mut state, &mut rng);

    let defeat = position(&result.events, |e| {
        matches!(e, TickEvent::ReturnedToTown { victory: false, .. })
    });
    let heal = position(&result.events, |e| matches!(e, TickEvent::DecidedToHeal { .. }));
    assert!(defeat < heal);
    // Healing ran before the decision, so no health came back yet.
    assert_eq!(state.hero(&id).unwrap().health, 0);
    assert_eq!(state.hero(&id).unwrap().status, HeroStatus::Healing);
}

#[test]
fn test_heroes_processed_in_roster_order() {
    let mut state = GameState::default();
    let mut ids = Vec::new();
    for name in ["First", "Second", "Third"] {
        let mut hero = Hero::new(name);
        hero.status = HeroStatus::Healing;
        hero.health = 49;
        ids.push(hero.id.clone());
        state.heroes.push(hero);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let result = game_tick(&mut state, &mut rng);

    let healed: Vec<&str> = result
        .events
        .iter()
        .filter_map(|e| match e {
            TickEvent::FullyHealed { hero_id, .. } => Some(hero_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(healed, ids.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_tick_events_reach_the_log() {
    let mut state = GameState::default();
    let mut hero = Hero::new("Test Hero");
    hero.status = HeroStatus::Healing;
    hero.health = 49;
    state.heroes.push(hero);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let result = game_tick(&mut state, &mut rng);

    assert_eq!(state.log.len(), result.events.len());
    let newest = state.log.latest().unwrap();
    assert_eq!(newest.tick, 1);
    assert_eq!(newest.message, result.events.last().unwrap().message());
}
