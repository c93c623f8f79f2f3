//! State transitions on a single hero. Nothing here touches dungeons or the
//! town; callers move explorer entries and resource pools themselves.

use super::types::{Hero, HeroStatus, ResetReason};
use crate::core::balance::Balance;

/// Result of [`Hero::add_experience`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelUpResult {
    pub levels_gained: u32,
    pub old_level: u32,
    pub new_level: u32,
}

impl Hero {
    /// Applies damage, flooring health at zero. Returns true if still alive.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.is_alive()
    }

    /// Heals up to max health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    /// Spends up to `parts` monster parts, each healing
    /// `balance.part_heal_amount`. Returns the number of parts spent so the
    /// caller can hand them to the town.
    pub fn fast_heal(&mut self, parts: u32, balance: &Balance) -> u32 {
        let spent = parts.min(self.inventory.monster_parts);
        if spent == 0 {
            return 0;
        }
        self.inventory.monster_parts -= spent;
        self.heal(spent.saturating_mul(balance.part_heal_amount));
        spent
    }

    /// Adds experience and levels up as many times as it covers. Each level
    /// raises max health, fully heals, and re-enables shopping. Leftover
    /// experience carries over.
    pub fn add_experience(&mut self, amount: u64, balance: &Balance) -> LevelUpResult {
        let old_level = self.level;
        self.experience = self.experience.saturating_add(amount);

        loop {
            let needed = balance.xp_for_next_level(self.level);
            if needed == 0 || self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.level += 1;
            self.max_health += balance.level_up_health_bonus;
            self.health = self.max_health;
            self.has_shopped = false;
        }

        LevelUpResult {
            levels_gained: self.level - old_level,
            old_level,
            new_level: self.level,
        }
    }

    /// Changes status. Leaving `Exploring` drops the combat flag; entering
    /// it clears `has_shopped`. The dungeon id is only kept while exploring.
    pub fn set_status(&mut self, status: HeroStatus, dungeon_id: Option<String>) {
        if status == HeroStatus::Exploring {
            self.has_shopped = false;
            self.dungeon_id = dungeon_id;
        } else {
            self.in_combat = false;
            self.dungeon_id = None;
        }
        self.status = status;
    }

    /// Sends the hero back to town. A defeat also costs all gold, monster
    /// parts, and experience toward the next level. Returns the dungeon the
    /// hero was in, whose explorer entry the caller must remove.
    pub fn reset_dungeon_progress(&mut self, reason: ResetReason) -> Option<String> {
        let previous = self.dungeon_id.take();
        self.status = HeroStatus::Idle;
        self.in_combat = false;
        self.dungeon_progress = 0;
        self.success_chance = None;

        if reason == ResetReason::Defeat {
            self.inventory.gold = 0;
            self.inventory.monster_parts = 0;
            self.experience = 0;
        }
        previous
    }

    /// Wears the equipped weapon by one point. Returns the weapon's name if
    /// it broke and was unequipped.
    pub fn wear_weapon(&mut self) -> Option<String> {
        let weapon = self.weapon.as_mut()?;
        weapon.durability = weapon.durability.saturating_sub(1);
        if weapon.durability == 0 {
            return self.weapon.take().map(|w| w.name);
        }
        None
    }
}
