//! The per-tick orchestration function.
//!
//! [`game_tick`] runs the five phases in a fixed order: combat,
//! exploration, healing, idle decisions, then shopping. Each phase
//! snapshots the ids of the heroes it applies to when it starts and
//! processes them in roster order, so a hero moved into a new status by an
//! earlier phase is only picked up by later phases of the same tick.

use crate::combat::process_combat_rounds;
use crate::core::game_state::GameState;
use crate::exploration::{process_exploration, process_healing};
use crate::hero::decision::process_hero_decisions;
use crate::hero::HeroId;
use crate::town::shopping::process_hero_shopping;
use crate::town::{BuildingKind, StandardCatalog, TownCatalog};
use rand::Rng;
use tracing::debug;

/// A single event produced by a game tick or a player command.
///
/// Every variant carries the narrative line that ends up in the event log.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    // ── Combat ──────────────────────────────────────────────────
    /// First round against a monster.
    CombatStarted {
        hero_id: HeroId,
        monster_name: String,
        is_boss: bool,
        message: String,
    },

    HeroAttack {
        hero_id: HeroId,
        damage: u32,
        message: String,
    },

    /// The hero drank a potion instead of attacking.
    PotionUsed {
        hero_id: HeroId,
        healed: u32,
        message: String,
    },

    MonsterAttack {
        hero_id: HeroId,
        damage: u32,
        message: String,
    },

    MonsterDefeated {
        hero_id: HeroId,
        monster_name: String,
        experience: u64,
        gold: u32,
        monster_parts: u32,
        message: String,
    },

    /// One event per level gained.
    LeveledUp {
        hero_id: HeroId,
        new_level: u32,
        message: String,
    },

    WeaponBroke {
        hero_id: HeroId,
        weapon_name: String,
        message: String,
    },

    // ── Exploration ─────────────────────────────────────────────
    ExplorationStarted {
        hero_id: HeroId,
        dungeon_id: String,
        message: String,
    },

    /// A quiet step forward.
    Advanced {
        hero_id: HeroId,
        progress: u32,
        message: String,
    },

    EncounterStarted {
        hero_id: HeroId,
        monster_name: String,
        is_final: bool,
        message: String,
    },

    /// The hero left a dungeon, either after beating the boss or after
    /// being defeated.
    ReturnedToTown {
        hero_id: HeroId,
        dungeon_id: String,
        victory: bool,
        message: String,
    },

    // ── Town visits ─────────────────────────────────────────────
    DecidedToHeal { hero_id: HeroId, message: String },

    /// Healing with a monster part; natural healing is silent.
    HealedWithPart { hero_id: HeroId, message: String },

    FullyHealed { hero_id: HeroId, message: String },

    DecidedToShop { hero_id: HeroId, message: String },

    Purchased {
        hero_id: HeroId,
        item_id: String,
        price: u32,
        message: String,
    },

    WeaponRepaired {
        hero_id: HeroId,
        points: u32,
        cost: u32,
        message: String,
    },

    FinishedShopping { hero_id: HeroId, message: String },

    // ── Town ────────────────────────────────────────────────────
    HeroSpawned { hero_id: HeroId, message: String },

    BuildingUnlocked { kind: BuildingKind, message: String },

    BuildingUpgraded {
        kind: BuildingKind,
        level: u32,
        message: String,
    },

    DungeonDiscovered { dungeon_id: String, message: String },
}

impl TickEvent {
    /// The human-readable log line for this event.
    pub fn message(&self) -> &str {
        match self {
            TickEvent::CombatStarted { message, .. }
            | TickEvent::HeroAttack { message, .. }
            | TickEvent::PotionUsed { message, .. }
            | TickEvent::MonsterAttack { message, .. }
            | TickEvent::MonsterDefeated { message, .. }
            | TickEvent::LeveledUp { message, .. }
            | TickEvent::WeaponBroke { message, .. }
            | TickEvent::ExplorationStarted { message, .. }
            | TickEvent::Advanced { message, .. }
            | TickEvent::EncounterStarted { message, .. }
            | TickEvent::ReturnedToTown { message, .. }
            | TickEvent::DecidedToHeal { message, .. }
            | TickEvent::HealedWithPart { message, .. }
            | TickEvent::FullyHealed { message, .. }
            | TickEvent::DecidedToShop { message, .. }
            | TickEvent::Purchased { message, .. }
            | TickEvent::WeaponRepaired { message, .. }
            | TickEvent::FinishedShopping { message, .. }
            | TickEvent::HeroSpawned { message, .. }
            | TickEvent::BuildingUnlocked { message, .. }
            | TickEvent::BuildingUpgraded { message, .. }
            | TickEvent::DungeonDiscovered { message, .. } => message,
        }
    }
}

/// Result of processing a single game tick.
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    /// The tick number just processed (1-based).
    pub tick: u64,
    /// Events produced during this tick, in chronological order.
    pub events: Vec<TickEvent>,
}

impl TickResult {
    pub fn count(&self, filter: impl Fn(&TickEvent) -> bool) -> usize {
        self.events.iter().filter(|e| filter(e)).count()
    }

    pub fn victories(&self) -> usize {
        self.count(|e| matches!(e, TickEvent::ReturnedToTown { victory: true, .. }))
    }

    pub fn defeats(&self) -> usize {
        self.count(|e| matches!(e, TickEvent::ReturnedToTown { victory: false, .. }))
    }

    pub fn levels_gained(&self) -> usize {
        self.count(|e| matches!(e, TickEvent::LeveledUp { .. }))
    }
}

/// Processes one tick with the built-in catalog.
pub fn game_tick(state: &mut GameState, rng: &mut impl Rng) -> TickResult {
    game_tick_with_catalog(state, &StandardCatalog, rng)
}

/// Processes one tick.
///
/// All events are appended to `state.log` and returned. Pass a seeded
/// `rand_chacha::ChaCha8Rng` in tests for deterministic behavior.
pub fn game_tick_with_catalog(
    state: &mut GameState,
    catalog: &dyn TownCatalog,
    rng: &mut impl Rng,
) -> TickResult {
    state.tick += 1;
    let mut events = Vec::new();
    for dungeon in &mut state.dungeons {
        dungeon.ensure_variant(rng);
    }

    // ── 1. Combat rounds ────────────────────────────────────────
    events.extend(process_combat_rounds(state, catalog, rng));

    // ── 2. Exploration steps ────────────────────────────────────
    events.extend(process_exploration(state, rng));

    // ── 3. Healing ──────────────────────────────────────────────
    events.extend(process_healing(state));

    // ── 4. Idle decisions ───────────────────────────────────────
    events.extend(process_hero_decisions(state, catalog, rng));

    // ── 5. Shopping ─────────────────────────────────────────────
    events.extend(process_hero_shopping(state, catalog));

    state.record_all(&events);
    debug!(tick = state.tick, events = events.len(), "tick processed");

    TickResult {
        tick: state.tick,
        events,
    }
}
