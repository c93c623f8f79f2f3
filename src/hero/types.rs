use crate::core::constants::{
    HERO_BASE_HEALTH, HERO_BASE_MAX_DAMAGE, HERO_BASE_MIN_DAMAGE, HERO_ID_PREFIX,
};
use crate::town::catalog::WeaponTemplate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type HeroId = String;

const FIRST_NAMES: [&str; 7] = ["Brave", "Mighty", "Swift", "Wise", "Noble", "Bold", "Valiant"];
const LAST_NAMES: [&str; 7] = [
    "Warrior",
    "Knight",
    "Guardian",
    "Protector",
    "Defender",
    "Champion",
    "Sentinel",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeroStatus {
    #[default]
    Idle,
    Healing,
    Shopping,
    Exploring,
}

impl fmt::Display for HeroStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HeroStatus::Idle => "idle",
            HeroStatus::Healing => "healing",
            HeroStatus::Shopping => "shopping",
            HeroStatus::Exploring => "exploring",
        };
        f.write_str(label)
    }
}

/// Why a hero left a dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    Victory,
    Defeat,
    Withdrawal,
}

/// An equipped weapon instance. Durability is per instance, the rest is
/// copied from the catalog template it was crafted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub min_damage: u32,
    pub max_damage: u32,
    pub durability: u32,
    pub max_durability: u32,
    pub sale_price: u32,
}

impl Weapon {
    /// A fresh weapon at full durability.
    pub fn from_template(template: &WeaponTemplate) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name.to_string(),
            min_damage: template.min_damage,
            max_damage: template.max_damage,
            durability: template.max_durability,
            max_durability: template.max_durability,
            sale_price: template.sale_price,
        }
    }

    pub fn average_damage(&self) -> f64 {
        (self.min_damage + self.max_damage) as f64 / 2.0
    }

    pub fn repair_cost(&self) -> u32 {
        self.sale_price.div_ceil(2)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub gold: u32,
    pub monster_parts: u32,
    /// Potion kind id -> count.
    pub potions: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn potion_count(&self, id: &str) -> u32 {
        self.potions.get(id).copied().unwrap_or(0)
    }

    pub fn total_potions(&self) -> u32 {
        self.potions.values().sum()
    }

    /// Adds one potion unless the stack is full.
    pub fn add_potion(&mut self, id: &str, max_stack: u32) -> bool {
        let count = self.potions.entry(id.to_string()).or_insert(0);
        if *count >= max_stack {
            return false;
        }
        *count += 1;
        true
    }

    /// Removes one potion. Empty stacks are dropped from the map.
    pub fn take_potion(&mut self, id: &str) -> bool {
        match self.potions.get_mut(id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.potions.remove(id);
                }
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub min_damage: u32,
    pub max_damage: u32,
    pub level: u32,
    pub experience: u64,
    pub weapon: Option<Weapon>,
    pub inventory: Inventory,
    pub status: HeroStatus,
    /// Set exactly when `status` is [`HeroStatus::Exploring`].
    pub dungeon_id: Option<String>,
    pub in_combat: bool,
    pub dungeon_progress: u32,
    /// Cached estimate for the dungeon being explored.
    pub success_chance: Option<u32>,
    pub has_shopped: bool,
    /// Dungeon the hero intends to run after shopping; sizes weapon repairs.
    pub next_shopping_dungeon: Option<String>,
}

impl Hero {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: format!("{}{}", HERO_ID_PREFIX, uuid::Uuid::new_v4()),
            name: name.into(),
            health: HERO_BASE_HEALTH,
            max_health: HERO_BASE_HEALTH,
            min_damage: HERO_BASE_MIN_DAMAGE,
            max_damage: HERO_BASE_MAX_DAMAGE,
            level: 1,
            experience: 0,
            weapon: None,
            inventory: Inventory::default(),
            status: HeroStatus::Idle,
            dungeon_id: None,
            in_combat: false,
            dungeon_progress: 0,
            success_chance: None,
            has_shopped: false,
            next_shopping_dungeon: None,
        }
    }

    /// A new hero with a name like "Swift Guardian".
    pub fn with_random_name(rng: &mut impl Rng) -> Self {
        Self::new(random_hero_name(rng))
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_full_health(&self) -> bool {
        self.health >= self.max_health
    }

    /// Inclusive attack range. A weapon adds its range on top of the base
    /// range, minus one at each end.
    pub fn damage_range(&self) -> (u32, u32) {
        match &self.weapon {
            Some(weapon) => (
                (weapon.min_damage + self.min_damage).saturating_sub(1),
                (weapon.max_damage + self.max_damage).saturating_sub(1),
            ),
            None => (self.min_damage, self.max_damage),
        }
    }

    pub fn roll_damage(&self, rng: &mut impl Rng) -> u32 {
        let (min, max) = self.damage_range();
        rng.gen_range(min..=max.max(min))
    }
}

pub fn random_hero_name(rng: &mut impl Rng) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{} {}", first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::town::catalog::{StandardCatalog, TownCatalog};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_hero_starting_values() {
        let hero = Hero::new("Test");
        assert!(hero.id.starts_with(HERO_ID_PREFIX));
        assert_eq!(hero.health, 50);
        assert_eq!(hero.max_health, 50);
        assert_eq!(hero.damage_range(), (1, 1));
        assert_eq!(hero.level, 1);
        assert_eq!(hero.status, HeroStatus::Idle);
        assert!(hero.weapon.is_none());
        assert_eq!(hero.inventory.total_potions(), 0);
    }

    #[test]
    fn test_hero_ids_are_unique() {
        assert_ne!(Hero::new("A").id, Hero::new("A").id);
    }

    #[test]
    fn test_damage_range_with_weapon() {
        let mut hero = Hero::new("Test");
        let longsword = StandardCatalog.weapon("longsword").unwrap();
        hero.weapon = Some(Weapon::from_template(longsword));
        assert_eq!(hero.damage_range(), (3, 6));

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let dmg = hero.roll_damage(&mut rng);
            assert!((3..=6).contains(&dmg));
        }
    }

    #[test]
    fn test_potion_stack_limits() {
        let mut inventory = Inventory::default();
        for _ in 0..5 {
            assert!(inventory.add_potion("health_potion", 5));
        }
        assert!(!inventory.add_potion("health_potion", 5));
        assert_eq!(inventory.potion_count("health_potion"), 5);

        for _ in 0..5 {
            assert!(inventory.take_potion("health_potion"));
        }
        assert!(!inventory.take_potion("health_potion"));
        assert!(inventory.potions.is_empty());
    }

    #[test]
    fn test_random_name_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let hero = Hero::with_random_name(&mut rng);
        let parts: Vec<&str> = hero.name.split(' ').collect();
        assert_eq!(parts.len(), 2);
        assert!(FIRST_NAMES.contains(&parts[0]));
        assert!(LAST_NAMES.contains(&parts[1]));
    }
}
