use crate::monster::Monster;
use serde::{Deserialize, Serialize};

/// A live fight between one hero and one monster. Stored in the hero's
/// explorer progress and advanced one round per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub monster: Monster,
    /// Rounds resolved so far; 0 until the first exchange.
    pub round: u32,
}

impl Encounter {
    pub fn new(monster: Monster) -> Self {
        Self { monster, round: 0 }
    }

    pub fn is_boss(&self) -> bool {
        self.monster.is_variant
    }

    pub fn is_first_round(&self) -> bool {
        self.round == 0
    }
}

/// What the hero did on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroAction {
    Attack { damage: u32 },
    DrinkPotion { healed: u32 },
}

/// How a single round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Both sides are still standing.
    Continue,
    MonsterDefeated,
    HeroDefeated,
}

/// Everything that happened in one round, for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub round: u32,
    pub hero_action: HeroAction,
    /// `None` when the monster died before it could strike back.
    pub monster_damage: Option<u32>,
    pub outcome: RoundOutcome,
}
