//! Monte Carlo tools.
//!
//! [`estimator`] is part of the live game: idle heroes consult it before
//! picking a dungeon. The rest is an offline balance simulator that runs
//! whole sessions through the real tick function and aggregates what
//! happened:
//! - dungeon clears and defeats
//! - hero levels and roster growth
//! - gold flowing between heroes and the town

mod config;
pub mod estimator;
mod report;
mod runner;

pub use config::SimConfig;
pub use estimator::{estimate_success_chance, simulate_run};
pub use report::SimReport;
pub use runner::{bootstrap_state, manage_town, run_simulation, RunStats};
