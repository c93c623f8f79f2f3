//! Core game state, balance configuration and tick orchestration.

pub mod balance;
pub mod constants;
pub mod error;
pub mod game_loop;
pub mod game_state;
pub mod tick;

pub use balance::Balance;
pub use error::GameError;
pub use game_state::{EventLog, GameState, LogEntry};
pub use tick::{game_tick, TickEvent, TickResult};
