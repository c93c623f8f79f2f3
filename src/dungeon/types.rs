//! Dungeon definitions and per-hero exploration records.

use crate::combat::types::Encounter;
use crate::core::constants::BOSS_LEVEL_MULTIPLIER;
use crate::hero::HeroId;
use crate::monster::MonsterVariant;
use std::collections::BTreeMap;

/// One hero's position inside one dungeon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplorerProgress {
    /// Steps taken, never above the dungeon length.
    pub progress: u32,
    pub encountered_final_monster: bool,
    pub current_encounter: Option<Encounter>,
    pub final_monster_defeated: bool,
}

impl ExplorerProgress {
    pub fn new(progress: u32) -> Self {
        Self {
            progress,
            ..Default::default()
        }
    }

    pub fn in_encounter(&self) -> bool {
        self.current_encounter.is_some()
    }
}

/// Outcome of a single exploration step.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult {
    /// The hero has no progress record here.
    NotExploring,
    /// The boss is already waiting; nothing changed.
    AlreadyAtEnd,
    Advanced {
        progress: u32,
    },
    Encounter {
        progress: u32,
        monster_name: String,
        is_final: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dungeon {
    pub id: String,
    pub name: String,
    pub description: String,
    pub discovered: bool,
    /// Town gold needed to discover it.
    pub discovery_cost: u32,
    pub difficulty: u32,
    /// Steps before the boss.
    pub length: u32,
    /// Chance per step of a regular encounter, in [0, 1].
    pub encounter_rate: f64,
    pub monster_type: String,
    /// Boss variant. Rolled once by [`Dungeon::ensure_variant`] when unset.
    pub variant: Option<MonsterVariant>,
    pub completed: bool,
    pub explorers: BTreeMap<HeroId, ExplorerProgress>,
}

impl Dungeon {
    /// Fractional level used for this dungeon's boss.
    pub fn boss_level(&self) -> f64 {
        self.difficulty as f64 * BOSS_LEVEL_MULTIPLIER
    }
}
