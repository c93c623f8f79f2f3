//! The town: shared resource pools, buildings, crafting and the shop.

pub mod catalog;
pub mod logic;
pub mod shopping;
pub mod types;

pub use catalog::{Consumable, ConsumableEffect, StandardCatalog, TownCatalog, WeaponTemplate};
pub use types::{Building, BuildingKind, ResourceKind, Resources, Town, TownError};
