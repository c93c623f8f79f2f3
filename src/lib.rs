//! Heroville - Idle Dungeon-Crawler Simulation Core
//!
//! Heroes pick dungeons, explore them step by step, fight turn-based
//! encounters and come back to town to heal and shop. Everything is driven
//! by [`core::tick::game_tick`], one fixed-order tick at a time.

pub mod combat;
pub mod core;
pub mod dungeon;
pub mod exploration;
pub mod hero;
pub mod monster;
pub mod save;
pub mod simulator;
pub mod town;

pub use crate::core::balance::Balance;
pub use crate::core::game_state::GameState;
pub use crate::core::tick::{game_tick, TickEvent, TickResult};
