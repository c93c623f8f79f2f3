//! Read-only tables of craftable weapons and consumables.
//!
//! The core only reaches these through [`TownCatalog`], so a different
//! economy can be plugged in without touching combat or shopping.

use crate::core::constants::{DEFAULT_MAX_POTIONS, HEALTH_POTION_ID};

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub min_damage: u32,
    pub max_damage: u32,
    /// Monster parts the town spends to craft one.
    pub cost_parts: u32,
    /// Gold a hero pays the town for one.
    pub sale_price: u32,
    pub max_durability: u32,
    pub required_blacksmith_level: u32,
}

impl WeaponTemplate {
    pub fn average_damage(&self) -> f64 {
        (self.min_damage + self.max_damage) as f64 / 2.0
    }

    /// Gold to repair: half the sale price, rounded up.
    pub fn repair_cost(&self) -> u32 {
        self.sale_price.div_ceil(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumableEffect {
    /// Restores `effect_amount` x max health.
    Healing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Consumable {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub effect: ConsumableEffect,
    pub effect_amount: f64,
    pub cost_parts: u32,
    pub sale_price: u32,
    pub max_stack: u32,
    pub required_apothecary_level: u32,
}

pub const WEAPONS: [WeaponTemplate; 5] = [
    WeaponTemplate {
        id: "dagger",
        name: "Dagger",
        description: "A small but sharp dagger.",
        min_damage: 1,
        max_damage: 3,
        cost_parts: 8,
        sale_price: 3,
        max_durability: 20,
        required_blacksmith_level: 1,
    },
    WeaponTemplate {
        id: "shortsword",
        name: "Short Sword",
        description: "A basic short sword, effective in combat.",
        min_damage: 2,
        max_damage: 4,
        cost_parts: 12,
        sale_price: 5,
        max_durability: 25,
        required_blacksmith_level: 2,
    },
    WeaponTemplate {
        id: "longsword",
        name: "Long Sword",
        description: "A heavier sword with better reach.",
        min_damage: 3,
        max_damage: 6,
        cost_parts: 20,
        sale_price: 10,
        max_durability: 30,
        required_blacksmith_level: 3,
    },
    WeaponTemplate {
        id: "battleaxe",
        name: "Battle Axe",
        description: "A powerful but unwieldy weapon.",
        min_damage: 4,
        max_damage: 8,
        cost_parts: 30,
        sale_price: 15,
        max_durability: 20,
        required_blacksmith_level: 4,
    },
    WeaponTemplate {
        id: "greatsword",
        name: "Great Sword",
        description: "A massive two-handed sword.",
        min_damage: 5,
        max_damage: 10,
        cost_parts: 45,
        sale_price: 25,
        max_durability: 35,
        required_blacksmith_level: 5,
    },
];

pub const CONSUMABLES: [Consumable; 1] = [Consumable {
    id: HEALTH_POTION_ID,
    name: "Health Potion",
    description: "Restores a fifth of a hero's health.",
    effect: ConsumableEffect::Healing,
    effect_amount: 0.2,
    cost_parts: 5,
    sale_price: 1,
    max_stack: DEFAULT_MAX_POTIONS,
    required_apothecary_level: 1,
}];

/// Lookup interface for purchasable goods.
pub trait TownCatalog {
    fn weapon(&self, id: &str) -> Option<&WeaponTemplate>;

    /// Weapons craftable at the given blacksmith level.
    fn weapons_for_level(&self, blacksmith_level: u32) -> Vec<&WeaponTemplate>;

    fn consumable(&self, id: &str) -> Option<&Consumable>;

    /// Consumables craftable at the given apothecary level.
    fn consumables_for_level(&self, apothecary_level: u32) -> Vec<&Consumable>;

    /// Max stack for a consumable, falling back to [`DEFAULT_MAX_POTIONS`].
    fn max_stack(&self, id: &str) -> u32 {
        self.consumable(id)
            .map_or(DEFAULT_MAX_POTIONS, |c| c.max_stack)
    }
}

/// The built-in catalog backed by [`WEAPONS`] and [`CONSUMABLES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCatalog;

impl TownCatalog for StandardCatalog {
    fn weapon(&self, id: &str) -> Option<&WeaponTemplate> {
        WEAPONS.iter().find(|w| w.id == id)
    }

    fn weapons_for_level(&self, blacksmith_level: u32) -> Vec<&WeaponTemplate> {
        WEAPONS
            .iter()
            .filter(|w| w.required_blacksmith_level <= blacksmith_level)
            .collect()
    }

    fn consumable(&self, id: &str) -> Option<&Consumable> {
        CONSUMABLES.iter().find(|c| c.id == id)
    }

    fn consumables_for_level(&self, apothecary_level: u32) -> Vec<&Consumable> {
        CONSUMABLES
            .iter()
            .filter(|c| c.required_apothecary_level <= apothecary_level)
            .collect()
    }
}
