//! Turn-based combat between a hero and a monster.

pub mod logic;
pub mod rewards;
pub mod types;

pub use logic::{fight_to_completion, hero_turn, monster_turn, process_combat_rounds};
pub use rewards::{apply_rewards, reward_for, EncounterReward, RewardOutcome};
pub use types::{Encounter, HeroAction, RoundOutcome, RoundReport};
