//! Heroes: stats, inventory, and the idle decision procedure.

pub mod decision;
pub mod logic;
pub mod types;

pub use decision::{choose_best_dungeon, decide_next_action, DungeonChoice, HeroDecision};
pub use logic::LevelUpResult;
pub use types::{random_hero_name, Hero, HeroId, HeroStatus, Inventory, ResetReason, Weapon};
