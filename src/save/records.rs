//! On-disk representation of a game.
//!
//! Records are flat, serde-friendly copies of the runtime types. Live
//! encounters are not stored: a pending boss fight is rebuilt on load and
//! a half-finished regular fight is dropped.

use crate::core::balance::Balance;
use crate::core::constants::{HEALTH_POTION_ID, SAVE_DATA_VERSION};
use crate::core::game_state::{EventLog, GameState};
use crate::combat::types::Encounter;
use crate::dungeon::{Dungeon, ExplorerProgress};
use crate::hero::{Hero, HeroStatus, Inventory, Weapon};
use crate::monster::MonsterVariant;
use crate::town::Town;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroRecord {
    pub id: String,
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub min_damage: u32,
    pub max_damage: u32,
    pub level: u32,
    pub experience: u64,
    pub weapon: Option<Weapon>,
    pub gold: u32,
    pub monster_parts: u32,
    pub potions: BTreeMap<String, u32>,
    pub status: HeroStatus,
    pub dungeon_id: Option<String>,
    pub in_combat: bool,
    pub dungeon_progress: u32,
    pub success_chance: Option<u32>,
    pub has_shopped: bool,
    pub next_shopping_dungeon: Option<String>,
}

impl From<&Hero> for HeroRecord {
    fn from(hero: &Hero) -> Self {
        Self {
            id: hero.id.clone(),
            name: hero.name.clone(),
            health: hero.health,
            max_health: hero.max_health,
            min_damage: hero.min_damage,
            max_damage: hero.max_damage,
            level: hero.level,
            experience: hero.experience,
            weapon: hero.weapon.clone(),
            gold: hero.inventory.gold,
            monster_parts: hero.inventory.monster_parts,
            potions: hero.inventory.potions.clone(),
            status: hero.status,
            dungeon_id: hero.dungeon_id.clone(),
            in_combat: hero.in_combat,
            dungeon_progress: hero.dungeon_progress,
            success_chance: hero.success_chance,
            has_shopped: hero.has_shopped,
            next_shopping_dungeon: hero.next_shopping_dungeon.clone(),
        }
    }
}

impl From<HeroRecord> for Hero {
    fn from(record: HeroRecord) -> Self {
        let mut potions = record.potions;
        potions.retain(|_, count| *count > 0);
        Self {
            id: record.id,
            name: record.name,
            health: record.health.min(record.max_health),
            max_health: record.max_health,
            min_damage: record.min_damage,
            max_damage: record.max_damage,
            level: record.level.max(1),
            experience: record.experience,
            weapon: record.weapon,
            inventory: Inventory {
                gold: record.gold,
                monster_parts: record.monster_parts,
                potions,
            },
            status: record.status,
            dungeon_id: record.dungeon_id,
            in_combat: record.in_combat,
            dungeon_progress: record.dungeon_progress,
            success_chance: record.success_chance,
            has_shopped: record.has_shopped,
            next_shopping_dungeon: record.next_shopping_dungeon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerRecord {
    pub hero_id: String,
    pub progress: u32,
    pub encountered_final_monster: bool,
    pub final_monster_defeated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub discovered: bool,
    pub discovery_cost: u32,
    pub difficulty: u32,
    pub length: u32,
    pub encounter_rate: f64,
    pub monster_type: String,
    pub variant: Option<MonsterVariant>,
    pub completed: bool,
    pub explorers: Vec<ExplorerRecord>,
}

impl From<&Dungeon> for DungeonRecord {
    fn from(dungeon: &Dungeon) -> Self {
        let explorers = dungeon
            .explorers
            .iter()
            .map(|(hero_id, progress)| ExplorerRecord {
                hero_id: hero_id.clone(),
                progress: progress.progress,
                encountered_final_monster: progress.encountered_final_monster,
                final_monster_defeated: progress.final_monster_defeated,
            })
            .collect();

        Self {
            id: dungeon.id.clone(),
            name: dungeon.name.clone(),
            description: dungeon.description.clone(),
            discovered: dungeon.discovered,
            discovery_cost: dungeon.discovery_cost,
            difficulty: dungeon.difficulty,
            length: dungeon.length,
            encounter_rate: dungeon.encounter_rate,
            monster_type: dungeon.monster_type.clone(),
            variant: dungeon.variant.clone(),
            completed: dungeon.completed,
            explorers,
        }
    }
}

impl DungeonRecord {
    /// Rebuilds the dungeon. A hero that reached the boss but has not beaten
    /// it faces a freshly spawned boss. A missing variant is rolled once here.
    pub fn into_dungeon(self, rng: &mut impl Rng) -> Dungeon {
        let mut dungeon = Dungeon {
            id: self.id,
            name: self.name,
            description: self.description,
            discovered: self.discovered,
            discovery_cost: self.discovery_cost,
            difficulty: self.difficulty,
            length: self.length,
            encounter_rate: self.encounter_rate.clamp(0.0, 1.0),
            monster_type: self.monster_type,
            variant: self.variant,
            completed: self.completed,
            explorers: BTreeMap::new(),
        };
        dungeon.ensure_variant(rng);

        for record in self.explorers {
            let pending_boss = record.encountered_final_monster && !record.final_monster_defeated;
            let current_encounter = pending_boss.then(|| Encounter::new(dungeon.spawn_boss(rng)));
            let progress = ExplorerProgress {
                progress: record.progress.min(dungeon.length),
                encountered_final_monster: record.encountered_final_monster,
                current_encounter,
                final_monster_defeated: record.final_monster_defeated,
            };
            dungeon.explorers.insert(record.hero_id, progress);
        }
        dungeon
    }
}

/// The town already has a flat, serde-ready shape and is stored as is.
pub type TownRecord = Town;

/// Everything persisted about a game. The event log is not saved.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub tick: u64,
    pub heroes: Vec<HeroRecord>,
    pub dungeons: Vec<DungeonRecord>,
    pub town: TownRecord,
    pub balance: Balance,
}

impl SaveData {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            version: SAVE_DATA_VERSION,
            saved_at: Utc::now(),
            tick: state.tick,
            heroes: state.heroes.iter().map(HeroRecord::from).collect(),
            dungeons: state.dungeons.iter().map(DungeonRecord::from).collect(),
            town: state.town.clone(),
            balance: state.balance.clone(),
        }
    }

    /// Rebuilds a live game. Heroes left flagged as fighting without a
    /// restored encounter are taken out of combat.
    pub fn into_state(self, rng: &mut impl Rng) -> GameState {
        let mut heroes: Vec<Hero> = self.heroes.into_iter().map(Hero::from).collect();
        let dungeons: Vec<Dungeon> = self
            .dungeons
            .into_iter()
            .map(|record| record.into_dungeon(rng))
            .collect();

        for hero in &mut heroes {
            if hero.status != HeroStatus::Exploring {
                hero.in_combat = false;
                continue;
            }
            let in_encounter = hero
                .dungeon_id
                .as_deref()
                .and_then(|id| dungeons.iter().find(|d| d.id == id))
                .and_then(|d| d.explorer_progress(&hero.id))
                .is_some_and(|p| p.in_encounter());
            if hero.in_combat && !in_encounter {
                debug!(hero = %hero.name, "dropping unsaved encounter");
                hero.in_combat = false;
            }
        }

        GameState {
            tick: self.tick,
            heroes,
            dungeons,
            town: self.town,
            log: EventLog::new(self.balance.max_log_entries),
            balance: self.balance,
            last_save_time: self.saved_at.timestamp(),
        }
    }
}

/// Upgrades old JSON saves in place: numeric `potions` counts (heroes or
/// town) become `{"health_potion": n}`. Returns true if anything changed.
pub fn migrate_legacy_json(save: &mut Value) -> bool {
    let mut migrated = false;

    if let Some(heroes) = save.get_mut("heroes").and_then(Value::as_array_mut) {
        for hero in heroes {
            migrated |= migrate_potion_field(hero);
        }
    }
    if let Some(town) = save.get_mut("town") {
        migrated |= migrate_potion_field(town);
    }
    migrated
}

fn migrate_potion_field(holder: &mut Value) -> bool {
    let Some(potions) = holder.get_mut("potions") else {
        return false;
    };
    let Some(count) = potions.as_u64() else {
        return false;
    };

    let mut map = serde_json::Map::new();
    if count > 0 {
        map.insert(HEALTH_POTION_ID.to_string(), Value::from(count));
    }
    *potions = Value::Object(map);
    true
}
