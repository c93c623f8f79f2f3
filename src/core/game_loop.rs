//! Shared game loop trait for the headless runner and the simulator.
//!
//! Both drive a [`GameState`] through the same tick function; the only
//! difference is how often they call it.

use crate::core::constants::TICK_INTERVAL_MS;
use crate::core::game_state::GameState;
use crate::core::tick::{game_tick_with_catalog, TickResult};
use crate::town::{StandardCatalog, TownCatalog};
use rand::Rng;

/// Core game loop trait - implemented by [`Game`].
///
/// This trait abstracts tick execution, allowing:
/// - the headless runner to tick on wall-clock time and autosave
/// - the simulator to run thousands of ticks back to back
pub trait GameLoop {
    /// Execute one game tick. Returns what happened.
    fn tick(&mut self, rng: &mut impl Rng) -> TickResult;

    /// Get current game state (read-only).
    fn state(&self) -> &GameState;

    /// Get current game state (mutable).
    fn state_mut(&mut self) -> &mut GameState;

    /// Execute `count` ticks and return every result, oldest first.
    fn run_ticks(&mut self, count: u64, rng: &mut impl Rng) -> Vec<TickResult> {
        let mut results = Vec::with_capacity(count as usize);
        for _ in 0..count {
            results.push(self.tick(rng));
        }
        results
    }
}

/// A game state paired with the catalog its town trades from.
#[derive(Debug, Clone)]
pub struct Game<C: TownCatalog = StandardCatalog> {
    state: GameState,
    catalog: C,
}

impl Game<StandardCatalog> {
    pub fn new(state: GameState) -> Self {
        Self::with_catalog(state, StandardCatalog)
    }
}

impl<C: TownCatalog> Game<C> {
    pub fn with_catalog(state: GameState, catalog: C) -> Self {
        Self { state, catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn into_state(self) -> GameState {
        self.state
    }
}

impl<C: TownCatalog> GameLoop for Game<C> {
    fn tick(&mut self, rng: &mut impl Rng) -> TickResult {
        game_tick_with_catalog(&mut self.state, &self.catalog, rng)
    }

    fn state(&self) -> &GameState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

/// Turns elapsed wall-clock time into whole ticks. The leftover
/// milliseconds carry into the next call, so no time is lost to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    interval_ms: u64,
    remainder_ms: u64,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(TICK_INTERVAL_MS)
    }
}

impl TickClock {
    /// A zero interval is treated as 1 ms.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            remainder_ms: 0,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Milliseconds accumulated toward the next tick.
    pub fn remainder_ms(&self) -> u64 {
        self.remainder_ms
    }

    /// Adds `elapsed_ms` and returns how many ticks are now due.
    pub fn advance(&mut self, elapsed_ms: u64) -> u64 {
        let total = self.remainder_ms.saturating_add(elapsed_ms);
        self.remainder_ms = total % self.interval_ms;
        total / self.interval_ms
    }

    pub fn reset(&mut self) {
        self.remainder_ms = 0;
    }
}
