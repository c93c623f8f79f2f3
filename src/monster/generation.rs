//! Monster stat generation.
//!
//! Stats are a pure function of level; the only randomness is picking a
//! variant when a dungeon does not name one.

use super::types::{Monster, MonsterVariant};
use rand::Rng;

/// Variant catalog: (name, is_prefix, health multiplier, damage multiplier).
pub const VARIANT_CATALOG: [(&str, bool, f64, f64); 8] = [
    ("Giant", true, 1.5, 1.3),
    ("Fierce", true, 1.2, 1.5),
    ("Ancient", true, 2.0, 1.8),
    ("Elder", true, 1.8, 1.6),
    ("Alpha", false, 1.7, 1.7),
    ("King", false, 2.0, 1.9),
    ("Queen", false, 1.8, 2.0),
    ("Matriarch", false, 2.2, 1.7),
];

/// Unrounded base stats at a (possibly fractional) level.
/// Returns (health, min_damage, max_damage).
fn base_stats(level: f64) -> (f64, f64, f64) {
    let health = 2.0 + level * 5.0;
    let min_damage = 1.0 + (level / 2.0).floor();
    let max_damage = min_damage + 1.0 + (level / 3.0).floor();
    (health, min_damage, max_damage)
}

/// Creates a regular monster of `monster_type` at `level`.
pub fn create_monster(monster_type: &str, level: u32) -> Monster {
    let (health, min_damage, max_damage) = base_stats(level as f64);
    Monster {
        name: monster_type.to_string(),
        health: health as u32,
        max_health: health as u32,
        min_damage: min_damage as u32,
        max_damage: max_damage as u32,
        level,
        is_variant: false,
    }
}

/// Creates a boss version of `monster_type`. `level` may be fractional
/// (bosses use 1.5x the dungeon difficulty); multipliers are applied to the
/// unrounded base stats and the results floored.
pub fn create_variant_monster(monster_type: &str, level: f64, variant: &MonsterVariant) -> Monster {
    let (health, min_damage, max_damage) = base_stats(level);
    let health = (health * variant.health_multiplier).floor().max(1.0) as u32;
    let min_damage = (min_damage * variant.damage_multiplier).floor() as u32;
    let max_damage = ((max_damage * variant.damage_multiplier).floor() as u32).max(min_damage);

    Monster {
        name: variant.apply_to_name(monster_type),
        health,
        max_health: health,
        min_damage,
        max_damage,
        level: level.floor() as u32,
        is_variant: true,
    }
}

pub fn all_variants() -> Vec<MonsterVariant> {
    VARIANT_CATALOG
        .iter()
        .map(|&(name, is_prefix, hp, dmg)| MonsterVariant::new(name, is_prefix, hp, dmg))
        .collect()
}

/// Uniform pick from [`VARIANT_CATALOG`].
pub fn random_variant(rng: &mut impl Rng) -> MonsterVariant {
    let (name, is_prefix, hp, dmg) = VARIANT_CATALOG[rng.gen_range(0..VARIANT_CATALOG.len())];
    MonsterVariant::new(name, is_prefix, hp, dmg)
}
