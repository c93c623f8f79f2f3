//! Explorer tracking and the step algorithm.
//!
//! Every operation is keyed by hero id and only touches that hero's
//! record, so heroes sharing a dungeon can be processed in any order.

use super::types::{AdvanceResult, Dungeon, ExplorerProgress};
use crate::combat::types::Encounter;
use crate::monster::{create_monster, create_variant_monster, random_variant, Monster, MonsterVariant};
use rand::Rng;
use tracing::debug;

impl Dungeon {
    /// Registers a hero at `start_progress`. Returns false, leaving the
    /// existing record untouched, if the hero is already tracked.
    pub fn add_explorer(&mut self, hero_id: &str, start_progress: u32) -> bool {
        if self.explorers.contains_key(hero_id) {
            return false;
        }
        let progress = ExplorerProgress::new(start_progress.min(self.length));
        self.explorers.insert(hero_id.to_string(), progress);
        true
    }

    pub fn explorer_progress(&self, hero_id: &str) -> Option<&ExplorerProgress> {
        self.explorers.get(hero_id)
    }

    pub fn explorer_progress_mut(&mut self, hero_id: &str) -> Option<&mut ExplorerProgress> {
        self.explorers.get_mut(hero_id)
    }

    pub fn remove_explorer(&mut self, hero_id: &str) -> Option<ExplorerProgress> {
        self.explorers.remove(hero_id)
    }

    pub fn explorer_count(&self) -> usize {
        self.explorers.len()
    }

    /// A regular monster at this dungeon's difficulty.
    pub fn spawn_monster(&self) -> Monster {
        create_monster(&self.monster_type, self.difficulty)
    }

    /// Fixes the boss variant, rolling one if none is set yet. Every later
    /// boss of this dungeon uses it.
    pub fn ensure_variant(&mut self, rng: &mut impl Rng) -> &MonsterVariant {
        self.variant.get_or_insert_with(|| random_variant(rng))
    }

    /// This dungeon's boss. Uses the configured variant; a dungeon that was
    /// never given one rolls a throwaway variant per call.
    pub fn spawn_boss(&self, rng: &mut impl Rng) -> Monster {
        let variant = match &self.variant {
            Some(variant) => variant.clone(),
            None => random_variant(rng),
        };
        create_variant_monster(&self.monster_type, self.boss_level(), &variant)
    }

    /// Moves a hero one step. At the end of the dungeon this spawns the
    /// boss instead; polling again while the boss is pending changes nothing.
    pub fn advance_explorer(&mut self, hero_id: &str, rng: &mut impl Rng) -> AdvanceResult {
        let length = self.length;
        let encounter_rate = self.encounter_rate;
        self.ensure_variant(rng);

        let Some(explorer) = self.explorers.get(hero_id) else {
            return AdvanceResult::NotExploring;
        };

        if explorer.progress >= length {
            if explorer.in_encounter() {
                return AdvanceResult::AlreadyAtEnd;
            }
            let boss = self.spawn_boss(rng);
            return self.begin_boss_encounter(hero_id, boss);
        }

        let progress = explorer.progress + 1;
        if progress >= length {
            let boss = self.spawn_boss(rng);
            if let Some(explorer) = self.explorers.get_mut(hero_id) {
                explorer.progress = length;
            }
            return self.begin_boss_encounter(hero_id, boss);
        }

        let monster = (rng.gen::<f64>() < encounter_rate).then(|| self.spawn_monster());
        let Some(explorer) = self.explorers.get_mut(hero_id) else {
            return AdvanceResult::NotExploring;
        };
        explorer.progress = progress;

        match monster {
            Some(monster) => {
                let monster_name = monster.name.clone();
                explorer.current_encounter = Some(Encounter::new(monster));
                AdvanceResult::Encounter {
                    progress,
                    monster_name,
                    is_final: false,
                }
            }
            None => {
                explorer.current_encounter = None;
                AdvanceResult::Advanced { progress }
            }
        }
    }

    fn begin_boss_encounter(&mut self, hero_id: &str, boss: Monster) -> AdvanceResult {
        let Some(explorer) = self.explorers.get_mut(hero_id) else {
            return AdvanceResult::NotExploring;
        };
        debug!(dungeon = %self.id, hero = hero_id, boss = %boss.name, "boss spawned");
        let monster_name = boss.name.clone();
        explorer.encountered_final_monster = true;
        explorer.current_encounter = Some(Encounter::new(boss));
        AdvanceResult::Encounter {
            progress: explorer.progress,
            monster_name,
            is_final: true,
        }
    }

    /// Ends the hero's current encounter. Returns true if it was the boss,
    /// in which case the record is marked as having beaten it.
    pub fn complete_encounter(&mut self, hero_id: &str) -> bool {
        let Some(explorer) = self.explorers.get_mut(hero_id) else {
            return false;
        };
        let was_boss = explorer
            .current_encounter
            .take()
            .is_some_and(|encounter| encounter.is_boss());
        if was_boss {
            explorer.final_monster_defeated = true;
        }
        was_boss
    }
}
