//! Loot and experience for a defeated monster.

use crate::core::balance::Balance;
use crate::hero::{Hero, LevelUpResult};
use crate::monster::Monster;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncounterReward {
    pub experience: u64,
    pub gold: u32,
    pub monster_parts: u32,
}

/// What applying a reward changed on the hero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardOutcome {
    pub level_up: LevelUpResult,
    /// The hero had no monster parts before this reward and has some now.
    pub first_monster_parts: bool,
}

/// Bosses pay experience and gold; regular monsters pay less experience
/// and one monster part per monster level.
pub fn reward_for(monster: &Monster, difficulty: u32, balance: &Balance) -> EncounterReward {
    if monster.is_variant {
        EncounterReward {
            experience: balance.boss_xp_per_difficulty * difficulty as u64,
            gold: balance.boss_gold(difficulty),
            monster_parts: 0,
        }
    } else {
        EncounterReward {
            experience: balance.monster_xp_per_difficulty * difficulty as u64,
            gold: 0,
            monster_parts: monster.level,
        }
    }
}

pub fn apply_rewards(hero: &mut Hero, reward: &EncounterReward, balance: &Balance) -> RewardOutcome {
    let parts_before = hero.inventory.monster_parts;
    hero.inventory.gold = hero.inventory.gold.saturating_add(reward.gold);
    hero.inventory.monster_parts = hero.inventory.monster_parts.saturating_add(reward.monster_parts);
    let level_up = hero.add_experience(reward.experience, balance);

    RewardOutcome {
        level_up,
        first_monster_parts: parts_before == 0 && reward.monster_parts > 0,
    }
}
