// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 1000;
pub const AUTOSAVE_INTERVAL_TICKS: u64 = 60;

// Starting hero stats
pub const HERO_BASE_HEALTH: u32 = 50;
pub const HERO_BASE_MIN_DAMAGE: u32 = 1;
pub const HERO_BASE_MAX_DAMAGE: u32 = 1;
pub const HERO_ID_PREFIX: &str = "hero_";

// Dungeons
pub const BOSS_LEVEL_MULTIPLIER: f64 = 1.5;

// Event log
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 100;

// Consumables
pub const HEALTH_POTION_ID: &str = "health_potion";
pub const DEFAULT_MAX_POTIONS: u32 = 5;

// Buildings: (base cost in materials, optional cost multiplier)
pub const TENT_BASE_COST: u32 = 5;
pub const TENT_COST_GROWTH: u32 = 10;
pub const APOTHECARY_BASE_COST: u32 = 10;
pub const BLACKSMITH_BASE_COST: u32 = 15;
pub const BLACKSMITH_UNLOCK_LEVEL: u32 = 2;

// Save file
pub const SAVE_VERSION_MAGIC: u64 = 0x4845_524F_5649_4C31; // "HEROVIL1"
pub const SAVE_FILE_NAME: &str = "heroville.sav";
pub const SAVE_DATA_VERSION: u32 = 1;
