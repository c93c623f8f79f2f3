//! Errors for player commands issued against a [`GameState`](super::GameState).

use crate::town::TownError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Hero {0} not found")]
    HeroNotFound(String),
    #[error("Dungeon {0} not found")]
    DungeonNotFound(String),
    /// The dungeon exists but has not been discovered yet.
    #[error("The {0} has not been discovered yet.")]
    DungeonUndiscovered(String),
    #[error("{0}")]
    Town(#[from] TownError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::town::BuildingKind;

    #[test]
    fn test_town_error_passthrough() {
        let err: GameError = TownError::BuildingNotFound(BuildingKind::Blacksmith).into();
        assert_eq!(err.to_string(), "Building Blacksmith not found");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            GameError::HeroNotFound("hero_x".to_string()).to_string(),
            "Hero hero_x not found"
        );
        assert!(std::error::Error::source(&GameError::DungeonNotFound("x".into())).is_none());
    }
}
