//! Town commands. Each either applies fully or returns a [`TownError`]
//! with the town left untouched.

use super::catalog::TownCatalog;
use super::types::{Building, BuildingKind, ResourceKind, Town, TownError};
use crate::dungeon::Dungeon;
use tracing::debug;

pub fn gather_materials(town: &mut Town) -> u32 {
    town.resources.materials += 1;
    town.resources.materials
}

/// Spends materials to raise a building one level. Returns the new level.
pub fn upgrade_building(town: &mut Town, kind: BuildingKind) -> Result<u32, TownError> {
    let available = town.resources.materials;
    let building = town
        .building_mut(kind)
        .ok_or(TownError::BuildingNotFound(kind))?;

    let cost = building.upgrade_cost();
    if available < cost {
        return Err(TownError::Insufficient {
            resource: ResourceKind::Materials,
            needed: cost,
            available,
        });
    }

    building.level += 1;
    let level = building.level;
    town.resources.materials -= cost;
    debug!(building = kind.id(), level, cost, "building upgraded");
    Ok(level)
}

/// One-shot unlock. Returns false if the building already exists.
pub fn unlock_building(town: &mut Town, kind: BuildingKind) -> bool {
    if town.has_building(kind) {
        return false;
    }
    town.buildings.push(Building::new(kind));
    true
}

/// Pays the discovery cost from town gold and reveals the dungeon.
pub fn discover_dungeon(
    town: &mut Town,
    dungeons: &mut [Dungeon],
    dungeon_id: &str,
) -> Result<(), TownError> {
    let dungeon = dungeons
        .iter_mut()
        .find(|d| d.id == dungeon_id)
        .ok_or_else(|| TownError::DungeonNotFound(dungeon_id.to_string()))?;

    if dungeon.discovered {
        return Err(TownError::AlreadyDiscovered(dungeon.name.clone()));
    }
    if town.resources.gold < dungeon.discovery_cost {
        return Err(TownError::Insufficient {
            resource: ResourceKind::Gold,
            needed: dungeon.discovery_cost,
            available: town.resources.gold,
        });
    }

    town.resources.gold -= dungeon.discovery_cost;
    dungeon.discovered = true;
    Ok(())
}

fn require_level(town: &Town, kind: BuildingKind, required: u32) -> Result<(), TownError> {
    let building = town
        .building(kind)
        .ok_or(TownError::BuildingNotFound(kind))?;
    if building.level < required {
        return Err(TownError::BuildingLevelTooLow {
            kind,
            required,
            current: building.level,
        });
    }
    Ok(())
}

fn spend_parts(town: &mut Town, cost: u32) -> Result<(), TownError> {
    if town.resources.monster_parts < cost {
        return Err(TownError::Insufficient {
            resource: ResourceKind::MonsterParts,
            needed: cost,
            available: town.resources.monster_parts,
        });
    }
    town.resources.monster_parts -= cost;
    Ok(())
}

/// Forges one weapon into town stock. Returns the new stock count.
pub fn craft_weapon(
    town: &mut Town,
    catalog: &dyn TownCatalog,
    weapon_id: &str,
) -> Result<u32, TownError> {
    let template = catalog
        .weapon(weapon_id)
        .ok_or_else(|| TownError::ItemNotFound(weapon_id.to_string()))?;
    require_level(
        town,
        BuildingKind::Blacksmith,
        template.required_blacksmith_level,
    )?;
    spend_parts(town, template.cost_parts)?;

    let stock = town.weapons.entry(template.id.to_string()).or_insert(0);
    *stock += 1;
    Ok(*stock)
}

/// Brews one consumable into town stock. Returns the new stock count.
pub fn craft_potion(
    town: &mut Town,
    catalog: &dyn TownCatalog,
    consumable_id: &str,
) -> Result<u32, TownError> {
    let consumable = catalog
        .consumable(consumable_id)
        .ok_or_else(|| TownError::ItemNotFound(consumable_id.to_string()))?;
    require_level(
        town,
        BuildingKind::Apothecary,
        consumable.required_apothecary_level,
    )?;
    spend_parts(town, consumable.cost_parts)?;

    let stock = town.potions.entry(consumable.id.to_string()).or_insert(0);
    *stock += 1;
    Ok(*stock)
}
