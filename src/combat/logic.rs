//! Turn-based combat resolution.
//!
//! The same hero and monster turns drive both live play (one
//! [`Encounter::resolve_round`] per tick) and Monte-Carlo estimation
//! ([`fight_to_completion`]).

use super::rewards::{apply_rewards, reward_for};
use super::types::{Encounter, HeroAction, RoundOutcome, RoundReport};
use crate::core::balance::Balance;
use crate::core::constants::{BLACKSMITH_UNLOCK_LEVEL, HEALTH_POTION_ID};
use crate::core::game_state::GameState;
use crate::core::tick::TickEvent;
use crate::dungeon::Dungeon;
use crate::hero::{Hero, ResetReason};
use crate::monster::Monster;
use crate::town::logic::unlock_building;
use crate::town::{BuildingKind, Town, TownCatalog};
use rand::Rng;
use tracing::warn;

/// Health a potion restores for this hero: the catalog effect amount (or
/// the balance fallback) times max health, rounded down.
pub fn potion_heal_amount(hero: &Hero, catalog: &dyn TownCatalog, balance: &Balance) -> u32 {
    let fraction = catalog
        .consumable(HEALTH_POTION_ID)
        .map_or(balance.potion_heal_fraction, |c| c.effect_amount);
    (hero.max_health as f64 * fraction).floor() as u32
}

/// The hero's half of a round. Drinks a potion when the monster's best hit
/// could finish it off and one is available; otherwise attacks.
pub fn hero_turn(
    hero: &mut Hero,
    monster: &mut Monster,
    catalog: &dyn TownCatalog,
    balance: &Balance,
    rng: &mut impl Rng,
) -> HeroAction {
    let in_danger = monster.max_damage >= hero.health;
    if in_danger && hero.inventory.potion_count(HEALTH_POTION_ID) > 0 {
        let amount = potion_heal_amount(hero, catalog, balance);
        hero.inventory.take_potion(HEALTH_POTION_ID);
        let healed = hero.heal(amount);
        return HeroAction::DrinkPotion { healed };
    }

    let damage = hero.roll_damage(rng);
    monster.take_damage(damage);
    HeroAction::Attack { damage }
}

/// The monster's half of a round. Returns the damage dealt.
pub fn monster_turn(hero: &mut Hero, monster: &Monster, rng: &mut impl Rng) -> u32 {
    let damage = rng.gen_range(monster.min_damage..=monster.max_damage.max(monster.min_damage));
    hero.take_damage(damage);
    damage
}

impl Encounter {
    /// Resolves one exchange. A monster killed on the hero's turn does not
    /// strike back.
    pub fn resolve_round(
        &mut self,
        hero: &mut Hero,
        catalog: &dyn TownCatalog,
        balance: &Balance,
        rng: &mut impl Rng,
    ) -> RoundReport {
        self.round += 1;
        let hero_action = hero_turn(hero, &mut self.monster, catalog, balance, rng);

        if self.monster.is_defeated() {
            return RoundReport {
                round: self.round,
                hero_action,
                monster_damage: None,
                outcome: RoundOutcome::MonsterDefeated,
            };
        }

        let damage = monster_turn(hero, &self.monster, rng);
        let outcome = if hero.is_alive() {
            RoundOutcome::Continue
        } else {
            RoundOutcome::HeroDefeated
        };
        RoundReport {
            round: self.round,
            hero_action,
            monster_damage: Some(damage),
            outcome,
        }
    }
}

/// Fights until one side falls. On a win the weapon wears by one point,
/// exactly as in live play. Returns true if the hero survived.
pub fn fight_to_completion(
    hero: &mut Hero,
    monster: Monster,
    catalog: &dyn TownCatalog,
    balance: &Balance,
    rng: &mut impl Rng,
) -> bool {
    let mut encounter = Encounter::new(monster);
    loop {
        match encounter.resolve_round(hero, catalog, balance, rng).outcome {
            RoundOutcome::Continue => {}
            RoundOutcome::MonsterDefeated => {
                hero.wear_weapon();
                return true;
            }
            RoundOutcome::HeroDefeated => return false,
        }
    }
}

/// Combat phase: one round for every hero flagged as in combat.
pub fn process_combat_rounds(
    state: &mut GameState,
    catalog: &dyn TownCatalog,
    rng: &mut impl Rng,
) -> Vec<TickEvent> {
    let mut events = Vec::new();
    let fighters = state.hero_ids_where(|h| h.in_combat);

    for hero_id in fighters {
        let GameState {
            heroes,
            dungeons,
            town,
            balance,
            ..
        } = &mut *state;

        let Some(hero) = heroes.iter_mut().find(|h| h.id == hero_id) else {
            continue;
        };
        let Some(dungeon) = hero
            .dungeon_id
            .as_deref()
            .and_then(|id| dungeons.iter_mut().find(|d| d.id == id))
        else {
            warn!(hero = %hero.name, "in combat outside a known dungeon, returning to town");
            hero.reset_dungeon_progress(ResetReason::Withdrawal);
            continue;
        };

        resolve_hero_round(hero, dungeon, town, catalog, balance, rng, &mut events);
    }

    events
}

fn resolve_hero_round(
    hero: &mut Hero,
    dungeon: &mut Dungeon,
    town: &mut Town,
    catalog: &dyn TownCatalog,
    balance: &Balance,
    rng: &mut impl Rng,
    events: &mut Vec<TickEvent>,
) {
    let Some(encounter) = dungeon
        .explorer_progress_mut(&hero.id)
        .and_then(|p| p.current_encounter.as_mut())
    else {
        warn!(hero = %hero.name, dungeon = %dungeon.id, "in combat without a monster, clearing flag");
        hero.in_combat = false;
        return;
    };

    if encounter.is_first_round() {
        events.push(TickEvent::CombatStarted {
            hero_id: hero.id.clone(),
            monster_name: encounter.monster.name.clone(),
            is_boss: encounter.is_boss(),
            message: format!(
                "{} engages in combat with a {}!",
                hero.name, encounter.monster.name
            ),
        });
    }

    let report = encounter.resolve_round(hero, catalog, balance, rng);
    let monster = encounter.monster.clone();

    match report.hero_action {
        HeroAction::DrinkPotion { healed } => events.push(TickEvent::PotionUsed {
            hero_id: hero.id.clone(),
            healed,
            message: format!("{} uses a potion to heal for {} health!", hero.name, healed),
        }),
        HeroAction::Attack { damage } => events.push(TickEvent::HeroAttack {
            hero_id: hero.id.clone(),
            damage,
            message: format!(
                "Round {}: {} hits the {} for {} damage.",
                report.round, hero.name, monster.name, damage
            ),
        }),
    }
    if let Some(damage) = report.monster_damage {
        events.push(TickEvent::MonsterAttack {
            hero_id: hero.id.clone(),
            damage,
            message: format!(
                "Round {}: The {} hits {} for {} damage.",
                report.round, monster.name, hero.name, damage
            ),
        });
    }

    match report.outcome {
        RoundOutcome::Continue => {}
        RoundOutcome::MonsterDefeated => {
            on_monster_defeated(hero, dungeon, town, &monster, balance, events)
        }
        RoundOutcome::HeroDefeated => on_hero_defeated(hero, dungeon, events),
    }
}

fn on_monster_defeated(
    hero: &mut Hero,
    dungeon: &mut Dungeon,
    town: &mut Town,
    monster: &Monster,
    balance: &Balance,
    events: &mut Vec<TickEvent>,
) {
    hero.in_combat = false;
    let was_boss = dungeon.complete_encounter(&hero.id);

    if let Some(weapon_name) = hero.wear_weapon() {
        events.push(TickEvent::WeaponBroke {
            hero_id: hero.id.clone(),
            weapon_name: weapon_name.clone(),
            message: format!("{}'s {} broke!", hero.name, weapon_name),
        });
    }

    let reward = reward_for(monster, dungeon.difficulty, balance);
    let outcome = apply_rewards(hero, &reward, balance);

    events.push(TickEvent::MonsterDefeated {
        hero_id: hero.id.clone(),
        monster_name: monster.name.clone(),
        experience: reward.experience,
        gold: reward.gold,
        monster_parts: reward.monster_parts,
        message: format!(
            "{} defeats the {}! Gained: {} experience, {} gold, and {} monster parts.",
            hero.name, monster.name, reward.experience, reward.gold, reward.monster_parts
        ),
    });
    for level in (outcome.level_up.old_level + 1)..=outcome.level_up.new_level {
        events.push(TickEvent::LeveledUp {
            hero_id: hero.id.clone(),
            new_level: level,
            message: format!("{} has leveled up to level {}!", hero.name, level),
        });
    }

    if outcome.first_monster_parts && unlock_building(town, BuildingKind::Apothecary) {
        events.push(building_unlocked(BuildingKind::Apothecary));
    }
    if outcome.level_up.old_level < BLACKSMITH_UNLOCK_LEVEL
        && outcome.level_up.new_level >= BLACKSMITH_UNLOCK_LEVEL
        && unlock_building(town, BuildingKind::Blacksmith)
    {
        events.push(building_unlocked(BuildingKind::Blacksmith));
    }

    if was_boss {
        dungeon.completed = true;
        dungeon.remove_explorer(&hero.id);
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
    }
}

fn on_hero_defeated(hero: &mut Hero, dungeon: &mut Dungeon, events: &mut Vec<TickEvent>) {
    dungeon.remove_explorer(&hero.id);
    hero.reset_dungeon_progress(ResetReason::Defeat);
    events.push(TickEvent::ReturnedToTown {
        hero_id: hero.id.clone(),
        dungeon_id: dungeon.id.clone(),
        victory: false,
        message: format!(
            "{} was defeated in the {} and returns to town.",
            hero.name, dungeon.name
        ),
    });
}

fn building_unlocked(kind: BuildingKind) -> TickEvent {
    TickEvent::BuildingUnlocked {
        kind,
        message: format!("The {} is now available for construction!", kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::Weapon;
    use crate::monster::create_monster;
    use crate::town::StandardCatalog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn monster(health: u32, min_damage: u32, max_damage: u32) -> Monster {
        Monster {
            name: "Dummy".to_string(),
            health,
            max_health: health,
            min_damage,
            max_damage,
            level: 1,
            is_variant: false,
        }
    }

    #[test]
    fn test_hero_attacks_when_safe() {
        let mut hero = Hero::new("Test");
        hero.inventory.potions.insert(HEALTH_POTION_ID.to_string(), 3);
        let mut target = monster(10, 1, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let action = hero_turn(&mut hero, &mut target, &StandardCatalog, &Balance::default(), &mut rng);

        assert_eq!(action, HeroAction::Attack { damage: 1 });
        assert_eq!(target.health, 9);
        assert_eq!(hero.inventory.potion_count(HEALTH_POTION_ID), 3);
    }

    #[test]
    fn test_hero_drinks_when_max_hit_meets_health() {
        let mut hero = Hero::new("Test");
        hero.health = 5;
        hero.inventory.potions.insert(HEALTH_POTION_ID.to_string(), 1);
        let mut target = monster(10, 1, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let action = hero_turn(&mut hero, &mut target, &StandardCatalog, &Balance::default(), &mut rng);

        // 20% of 50
        assert_eq!(action, HeroAction::DrinkPotion { healed: 10 });
        assert_eq!(hero.health, 15);
        assert_eq!(target.health, 10);
        assert_eq!(hero.inventory.potion_count(HEALTH_POTION_ID), 0);
    }

    #[test]
    fn test_no_potions_forces_attack() {
        let mut hero = Hero::new("Test");
        hero.health = 2;
        let mut target = monster(10, 5, 9);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let action = hero_turn(&mut hero, &mut target, &StandardCatalog, &Balance::default(), &mut rng);

        assert!(matches!(action, HeroAction::Attack { .. }));
        assert_eq!(target.health, 9);
    }

    #[test]
    fn test_killing_blow_skips_counterattack() {
        let mut hero = Hero::new("Test");
        let mut encounter = Encounter::new(monster(1, 3, 3));
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = encounter.resolve_round(&mut hero, &StandardCatalog, &Balance::default(), &mut rng);

        assert_eq!(report.outcome, RoundOutcome::MonsterDefeated);
        assert_eq!(report.monster_damage, None);
        assert_eq!(hero.health, 50);
        assert_eq!(encounter.round, 1);
    }

    #[test]
    fn test_round_counts_and_damage() {
        let mut hero = Hero::new("Test");
        let mut encounter = Encounter::new(monster(10, 2, 2));
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = encounter.resolve_round(&mut hero, &StandardCatalog, &Balance::default(), &mut rng);
        assert_eq!(report.outcome, RoundOutcome::Continue);
        assert_eq!(report.monster_damage, Some(2));
        assert_eq!(hero.health, 48);

        let report = encounter.resolve_round(&mut hero, &StandardCatalog, &Balance::default(), &mut rng);
        assert_eq!(report.round, 2);
    }

    #[test]
    fn test_hero_can_be_defeated() {
        let mut hero = Hero::new("Test");
        hero.health = 3;
        let mut encounter = Encounter::new(monster(100, 5, 5));
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = encounter.resolve_round(&mut hero, &StandardCatalog, &Balance::default(), &mut rng);

        assert_eq!(report.outcome, RoundOutcome::HeroDefeated);
        assert_eq!(hero.health, 0);
    }

    #[test]
    fn test_fight_to_completion_wears_weapon_once() {
        let mut hero = Hero::new("Test");
        hero.weapon = Some(Weapon::from_template(StandardCatalog.weapon("dagger").unwrap()));
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let survived = fight_to_completion(
            &mut hero,
            create_monster("Bat", 1),
            &StandardCatalog,
            &Balance::default(),
            &mut rng,
        );

        assert!(survived);
        assert_eq!(hero.weapon.as_ref().unwrap().durability, 19);
    }

    #[test]
    fn test_fight_to_completion_loss() {
        let mut hero = Hero::new("Test");
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let survived = fight_to_completion(
            &mut hero,
            create_monster("Dragon", 30),
            &StandardCatalog,
            &Balance::default(),
            &mut rng,
        );
        assert!(!survived);
        assert_eq!(hero.health, 0);
    }
}
