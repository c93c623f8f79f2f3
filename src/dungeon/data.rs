//! The dungeons available in a new game.

use super::types::Dungeon;
use crate::monster::MonsterVariant;
use std::collections::BTreeMap;

struct DungeonDef {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    discovery_cost: u32,
    difficulty: u32,
    length: u32,
    encounter_rate: f64,
    monster_type: &'static str,
    /// (name, is_prefix, health multiplier, damage multiplier)
    variant: (&'static str, bool, f64, f64),
}

const STARTING_DUNGEONS: [DungeonDef; 5] = [
    DungeonDef {
        id: "cave",
        name: "Mysterious Cave",
        description: "A dark cave with unknown mysteries inside.",
        discovery_cost: 0,
        difficulty: 1,
        length: 10,
        encounter_rate: 0.3,
        monster_type: "Bat",
        variant: ("Giant", true, 1.5, 1.3),
    },
    DungeonDef {
        id: "forest",
        name: "Enchanted Forest",
        description: "A forest filled with magical creatures.",
        discovery_cost: 20,
        difficulty: 2,
        length: 15,
        encounter_rate: 0.4,
        monster_type: "Wolf",
        variant: ("Alpha", false, 2.0, 1.6),
    },
    DungeonDef {
        id: "crypt",
        name: "Ancient Crypt",
        description: "A crypt filled with the undead and forgotten treasures.",
        discovery_cost: 50,
        difficulty: 3,
        length: 20,
        encounter_rate: 0.5,
        monster_type: "Skeleton",
        variant: ("King", true, 2.5, 2.0),
    },
    DungeonDef {
        id: "sewer",
        name: "Forgotten Sewers",
        description: "Dark, damp tunnels running beneath the city, infested with vermin.",
        discovery_cost: 75,
        difficulty: 4,
        length: 25,
        encounter_rate: 0.6,
        monster_type: "Rat",
        variant: ("King", true, 3.0, 2.2),
    },
    DungeonDef {
        id: "mine",
        name: "Abandoned Mine",
        description: "A long-forgotten mine with unstable passages and strange creatures.",
        discovery_cost: 100,
        difficulty: 5,
        length: 30,
        encounter_rate: 0.5,
        monster_type: "Spider",
        variant: ("Matriarch", false, 3.2, 2.5),
    },
];

/// All starting dungeons, undiscovered.
pub fn starting_dungeons() -> Vec<Dungeon> {
    STARTING_DUNGEONS
        .iter()
        .map(|def| {
            let (name, is_prefix, hp, dmg) = def.variant;
            Dungeon {
                id: def.id.to_string(),
                name: def.name.to_string(),
                description: def.description.to_string(),
                discovered: false,
                discovery_cost: def.discovery_cost,
                difficulty: def.difficulty,
                length: def.length,
                encounter_rate: def.encounter_rate,
                monster_type: def.monster_type.to_string(),
                variant: Some(MonsterVariant::new(name, is_prefix, hp, dmg)),
                completed: false,
                explorers: BTreeMap::new(),
            }
        })
        .collect()
}

/// A single starting dungeon by id.
pub fn starting_dungeon(id: &str) -> Option<Dungeon> {
    starting_dungeons().into_iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_dungeons_ordered_by_difficulty() {
        let dungeons = starting_dungeons();
        assert_eq!(dungeons.len(), 5);
        for (i, dungeon) in dungeons.iter().enumerate() {
            assert_eq!(dungeon.difficulty, i as u32 + 1);
            assert!(!dungeon.discovered);
            assert!(dungeon.explorers.is_empty());
        }
    }

    #[test]
    fn test_cave_is_free() {
        let cave = starting_dungeon("cave").unwrap();
        assert_eq!(cave.discovery_cost, 0);
        assert_eq!(cave.length, 10);
        assert!(starting_dungeon("volcano").is_none());
    }
}
