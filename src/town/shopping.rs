//! The shopping phase. Weapon purchase, repair and potion purchase all
//! settle within the same tick before the hero goes back to idle.

use super::catalog::{TownCatalog, WeaponTemplate};
use super::types::{BuildingKind, Town};
use crate::core::game_state::GameState;
use crate::core::tick::TickEvent;
use crate::dungeon::Dungeon;
use crate::hero::{Hero, HeroStatus, Weapon};

/// Buys the strongest affordable weapon the town has in stock, if it beats
/// what the hero already carries. Returns true on a purchase.
pub fn buy_weapon(
    hero: &mut Hero,
    town: &mut Town,
    catalog: &dyn TownCatalog,
    events: &mut Vec<TickEvent>,
) -> bool {
    let blacksmith_level = town.building_level(BuildingKind::Blacksmith);
    if blacksmith_level == 0 {
        return false;
    }

    let mut best: Option<&WeaponTemplate> = None;
    for template in catalog.weapons_for_level(blacksmith_level) {
        let in_stock = town.weapon_stock(template.id) > 0;
        let affordable = hero.inventory.gold >= template.sale_price;
        let beats_best = best.map_or(true, |b| template.average_damage() > b.average_damage());
        if in_stock && affordable && beats_best {
            best = Some(template);
        }
    }

    let Some(template) = best else {
        return false;
    };
    let upgrade = hero
        .weapon
        .as_ref()
        .map_or(true, |current| template.average_damage() > current.average_damage());
    if !upgrade {
        return false;
    }

    hero.inventory.gold -= template.sale_price;
    town.resources.gold += template.sale_price;
    if let Some(stock) = town.weapons.get_mut(template.id) {
        *stock -= 1;
    }
    hero.weapon = Some(Weapon::from_template(template));

    events.push(TickEvent::Purchased {
        hero_id: hero.id.clone(),
        item_id: template.id.to_string(),
        price: template.sale_price,
        message: format!(
            "{} bought a {} for {} gold.",
            hero.name, template.name, template.sale_price
        ),
    });
    true
}

/// Tops up weapon durability so it lasts the planned dungeon, for a flat
/// fee of half the sale price. Returns true if a repair was paid for.
pub fn repair_weapon(
    hero: &mut Hero,
    town: &mut Town,
    target: Option<&Dungeon>,
    events: &mut Vec<TickEvent>,
) -> bool {
    let (Some(weapon), Some(dungeon)) = (hero.weapon.as_mut(), target) else {
        return false;
    };

    let desired = dungeon.length;
    let cost = weapon.repair_cost();
    if weapon.durability >= desired || hero.inventory.gold < cost {
        return false;
    }
    let points = (desired - weapon.durability).min(weapon.max_durability.saturating_sub(weapon.durability));
    if points == 0 {
        return false;
    }

    weapon.durability += points;
    let weapon_name = weapon.name.clone();
    hero.inventory.gold -= cost;
    town.resources.gold += cost;

    events.push(TickEvent::WeaponRepaired {
        hero_id: hero.id.clone(),
        points,
        cost,
        message: format!(
            "{} repaired their {} for {} gold.",
            hero.name, weapon_name, cost
        ),
    });
    true
}

/// Buys potions one at a time until the stack is full, the town runs out,
/// or the hero runs out of gold. Returns the number bought.
pub fn buy_potions(
    hero: &mut Hero,
    town: &mut Town,
    catalog: &dyn TownCatalog,
    events: &mut Vec<TickEvent>,
) -> u32 {
    let stocked: Vec<String> = town.potions.keys().cloned().collect();
    let mut bought = 0;

    for id in stocked {
        let Some(potion) = catalog.consumable(&id) else {
            continue;
        };
        while hero.inventory.potion_count(potion.id) < potion.max_stack
            && town.potion_stock(potion.id) > 0
            && hero.inventory.gold >= potion.sale_price
        {
            hero.inventory.gold -= potion.sale_price;
            town.resources.gold += potion.sale_price;
            if let Some(stock) = town.potions.get_mut(potion.id) {
                *stock -= 1;
            }
            hero.inventory.add_potion(potion.id, potion.max_stack);
            bought += 1;

            events.push(TickEvent::Purchased {
                hero_id: hero.id.clone(),
                item_id: potion.id.to_string(),
                price: potion.sale_price,
                message: format!(
                    "{} bought a {} for {} gold.",
                    hero.name, potion.name, potion.sale_price
                ),
            });
        }
    }
    bought
}

/// Shopping phase: every shopping hero buys what it can, then goes idle
/// with `has_shopped` set.
pub fn process_hero_shopping(state: &mut GameState, catalog: &dyn TownCatalog) -> Vec<TickEvent> {
    let mut events = Vec::new();
    let shoppers = state.heroes_with_status(HeroStatus::Shopping);

    for hero_id in shoppers {
        let GameState {
            heroes,
            dungeons,
            town,
            ..
        } = &mut *state;
        let Some(hero) = heroes.iter_mut().find(|h| h.id == hero_id) else {
            continue;
        };

        let target = hero
            .next_shopping_dungeon
            .as_deref()
            .and_then(|id| dungeons.iter().find(|d| d.id == id));

        let mut any = buy_weapon(hero, town, catalog, &mut events);
        any |= repair_weapon(hero, town, target, &mut events);
        any |= buy_potions(hero, town, catalog, &mut events) > 0;

        hero.set_status(HeroStatus::Idle, None);
        hero.has_shopped = true;
        hero.next_shopping_dungeon = None;

        let message = if any {
            format!("{} finished shopping and is now idle.", hero.name)
        } else {
            format!("{} couldn't find anything to buy and is now idle.", hero.name)
        };
        events.push(TickEvent::FinishedShopping {
            hero_id: hero.id.clone(),
            message,
        });
    }

    events
}
