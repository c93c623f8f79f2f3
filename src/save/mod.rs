//! Save files: checksummed bincode for autosaves, JSON for export.

pub mod manager;
pub mod records;

pub use manager::SaveManager;
pub use records::{migrate_legacy_json, DungeonRecord, ExplorerRecord, HeroRecord, SaveData, TownRecord};
