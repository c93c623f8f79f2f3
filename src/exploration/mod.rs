//! Per-tick movement through dungeons and recovery in town.

pub mod logic;

pub use logic::{assign_hero_to_dungeon, process_exploration, process_healing};
