//! Monster stat blocks and the factory that scales them.

pub mod generation;
pub mod types;

pub use generation::{all_variants, create_monster, create_variant_monster, random_variant};
pub use types::{Monster, MonsterVariant};
