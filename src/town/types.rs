use crate::core::constants::{
    APOTHECARY_BASE_COST, BLACKSMITH_BASE_COST, TENT_BASE_COST, TENT_COST_GROWTH,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Shared town pools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub materials: u32,
    pub monster_parts: u32,
    pub gold: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Materials,
    MonsterParts,
    Gold,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Materials => write!(f, "materials"),
            ResourceKind::MonsterParts => write!(f, "monster parts"),
            ResourceKind::Gold => write!(f, "gold"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Every upgrade houses a new hero.
    Tent,
    /// Brews potions. Unlocked by the first monster parts.
    Apothecary,
    /// Forges weapons. Unlocked when a hero reaches level 2.
    Blacksmith,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 3] = [
        BuildingKind::Tent,
        BuildingKind::Apothecary,
        BuildingKind::Blacksmith,
    ];

    pub fn id(self) -> &'static str {
        match self {
            BuildingKind::Tent => "tent",
            BuildingKind::Apothecary => "apothecary",
            BuildingKind::Blacksmith => "blacksmith",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::Tent => "Tent",
            BuildingKind::Apothecary => "Apothecary",
            BuildingKind::Blacksmith => "Blacksmith",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BuildingKind::Tent => "A simple shelter for heroes to rest in.",
            BuildingKind::Apothecary => "A place to craft potions and remedies.",
            BuildingKind::Blacksmith => "A forge where weapons can be crafted and repaired.",
        }
    }

    pub fn base_cost(self) -> u32 {
        match self {
            BuildingKind::Tent => TENT_BASE_COST,
            BuildingKind::Apothecary => APOTHECARY_BASE_COST,
            BuildingKind::Blacksmith => BLACKSMITH_BASE_COST,
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    pub level: u32,
    /// Materials for the first upgrade.
    pub base_cost: u32,
    /// Growth per level for non-tent buildings; flat cost when unset.
    pub cost_multiplier: Option<f64>,
}

impl Building {
    pub fn new(kind: BuildingKind) -> Self {
        Self {
            kind,
            level: 0,
            base_cost: kind.base_cost(),
            cost_multiplier: None,
        }
    }

    /// Materials needed for the next level. The tent grows tenfold per
    /// level (5, 50, 500, ...).
    pub fn upgrade_cost(&self) -> u32 {
        let cost = match (self.kind, self.cost_multiplier) {
            (BuildingKind::Tent, _) => {
                self.base_cost as f64 * (TENT_COST_GROWTH as f64).powi(self.level as i32)
            }
            (_, Some(multiplier)) => self.base_cost as f64 * multiplier.powi(self.level as i32),
            (_, None) => self.base_cost as f64,
        };
        cost.floor().min(u32::MAX as f64) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Town {
    pub resources: Resources,
    pub buildings: Vec<Building>,
    /// Crafted weapons waiting to be bought, by catalog id.
    pub weapons: BTreeMap<String, u32>,
    /// Crafted potions waiting to be bought, by catalog id.
    pub potions: BTreeMap<String, u32>,
}

impl Default for Town {
    fn default() -> Self {
        Self::new()
    }
}

impl Town {
    /// A fresh town: a level 0 tent and nothing else.
    pub fn new() -> Self {
        Self {
            resources: Resources::default(),
            buildings: vec![Building::new(BuildingKind::Tent)],
            weapons: BTreeMap::new(),
            potions: BTreeMap::new(),
        }
    }

    pub fn building(&self, kind: BuildingKind) -> Option<&Building> {
        self.buildings.iter().find(|b| b.kind == kind)
    }

    pub fn building_mut(&mut self, kind: BuildingKind) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.kind == kind)
    }

    pub fn has_building(&self, kind: BuildingKind) -> bool {
        self.building(kind).is_some()
    }

    /// Level of a building, 0 if it has not been unlocked.
    pub fn building_level(&self, kind: BuildingKind) -> u32 {
        self.building(kind).map_or(0, |b| b.level)
    }

    pub fn weapon_stock(&self, id: &str) -> u32 {
        self.weapons.get(id).copied().unwrap_or(0)
    }

    pub fn potion_stock(&self, id: &str) -> u32 {
        self.potions.get(id).copied().unwrap_or(0)
    }
}

/// A town command that could not be carried out. No state was changed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TownError {
    #[error("Building {0} not found")]
    BuildingNotFound(BuildingKind),
    #[error("Dungeon {0} not found")]
    DungeonNotFound(String),
    #[error("Item {0} not found")]
    ItemNotFound(String),
    #[error("The {0} has already been discovered.")]
    AlreadyDiscovered(String),
    #[error("Not enough {resource}. Need {needed} {resource}, have {available}.")]
    Insufficient {
        resource: ResourceKind,
        needed: u32,
        available: u32,
    },
    #[error("{kind} must be level {required} (currently {current}).")]
    BuildingLevelTooLow {
        kind: BuildingKind,
        required: u32,
        current: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_town_has_only_tent() {
        let town = Town::new();
        assert_eq!(town.buildings.len(), 1);
        assert_eq!(town.building_level(BuildingKind::Tent), 0);
        assert!(!town.has_building(BuildingKind::Blacksmith));
        assert_eq!(town.building_level(BuildingKind::Blacksmith), 0);
    }

    #[test]
    fn test_tent_cost_grows_tenfold() {
        let mut tent = Building::new(BuildingKind::Tent);
        assert_eq!(tent.upgrade_cost(), 5);
        tent.level = 1;
        assert_eq!(tent.upgrade_cost(), 50);
        tent.level = 2;
        assert_eq!(tent.upgrade_cost(), 500);
    }

    #[test]
    fn test_other_building_costs() {
        let mut smith = Building::new(BuildingKind::Blacksmith);
        smith.level = 3;
        assert_eq!(smith.upgrade_cost(), 15);

        smith.cost_multiplier = Some(1.5);
        // 15 * 1.5^3 = 50.625
        assert_eq!(smith.upgrade_cost(), 50);
    }

    #[test]
    fn test_building_ids_round_trip() {
        for kind in BuildingKind::ALL {
            assert_eq!(BuildingKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(BuildingKind::from_id("castle"), None);
    }

    #[test]
    fn test_error_messages() {
        let err = TownError::Insufficient {
            resource: ResourceKind::Materials,
            needed: 50,
            available: 3,
        };
        assert_eq!(err.to_string(), "Not enough materials. Need 50 materials, have 3.");
        assert_eq!(
            TownError::BuildingNotFound(BuildingKind::Apothecary).to_string(),
            "Building Apothecary not found"
        );
    }
}
