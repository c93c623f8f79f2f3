//! Dungeons and the per-hero progress tracker.

pub mod data;
pub mod logic;
pub mod types;

pub use data::{starting_dungeon, starting_dungeons};
pub use types::{AdvanceResult, Dungeon, ExplorerProgress};
