use crate::core::balance::Balance;
use crate::core::error::GameError;
use crate::core::tick::TickEvent;
use crate::dungeon::{starting_dungeons, Dungeon};
use crate::exploration::assign_hero_to_dungeon;
use crate::hero::{Hero, HeroId, HeroStatus, ResetReason};
use crate::town::{logic as town_logic, BuildingKind, Town, TownCatalog};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// One narrative line in the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub tick: u64,
    pub message: String,
}

/// Bounded narrative log, newest entry first.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn push(&mut self, tick: u64, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(LogEntry {
            tick,
            message: message.into(),
        });
        self.entries.truncate(self.capacity);
    }

    /// Entries from newest to oldest.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Whole simulation state. Every subsystem borrows this for the duration of
/// one phase; nothing is global.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Ticks processed so far.
    pub tick: u64,
    /// Roster order; phases process heroes in this order.
    pub heroes: Vec<Hero>,
    pub dungeons: Vec<Dungeon>,
    pub town: Town,
    pub balance: Balance,
    pub log: EventLog,
    /// Unix timestamp of the last save or load.
    pub last_save_time: i64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Balance::default())
    }
}

impl GameState {
    /// A new game: a level 0 tent, no heroes, every dungeon undiscovered.
    pub fn new(balance: Balance) -> Self {
        let log = EventLog::new(balance.max_log_entries);
        Self {
            tick: 0,
            heroes: Vec::new(),
            dungeons: starting_dungeons(),
            town: Town::new(),
            balance,
            log,
            last_save_time: chrono::Utc::now().timestamp(),
        }
    }

    pub fn hero(&self, hero_id: &str) -> Option<&Hero> {
        self.heroes.iter().find(|h| h.id == hero_id)
    }

    pub fn hero_mut(&mut self, hero_id: &str) -> Option<&mut Hero> {
        self.heroes.iter_mut().find(|h| h.id == hero_id)
    }

    pub fn dungeon(&self, dungeon_id: &str) -> Option<&Dungeon> {
        self.dungeons.iter().find(|d| d.id == dungeon_id)
    }

    pub fn dungeon_mut(&mut self, dungeon_id: &str) -> Option<&mut Dungeon> {
        self.dungeons.iter_mut().find(|d| d.id == dungeon_id)
    }

    /// Ids of heroes matching `filter`, in roster order.
    pub fn hero_ids_where(&self, filter: impl Fn(&Hero) -> bool) -> Vec<HeroId> {
        self.heroes
            .iter()
            .filter(|h| filter(h))
            .map(|h| h.id.clone())
            .collect()
    }

    pub fn heroes_with_status(&self, status: HeroStatus) -> Vec<HeroId> {
        self.hero_ids_where(|h| h.status == status)
    }

    pub fn record(&mut self, event: &TickEvent) {
        self.log.push(self.tick, event.message());
    }

    pub fn record_all(&mut self, events: &[TickEvent]) {
        for event in events {
            self.record(event);
        }
    }

    fn reject(&mut self, err: GameError) -> GameError {
        warn!(error = %err, "command rejected");
        self.log.push(self.tick, err.to_string());
        err
    }

    // =========================================================================
    // Player commands
    // =========================================================================

    /// Adds a hero with a random name. Returns its id.
    pub fn spawn_hero(&mut self, rng: &mut impl Rng) -> HeroId {
        let hero = Hero::with_random_name(rng);
        let id = hero.id.clone();
        let event = TickEvent::HeroSpawned {
            hero_id: id.clone(),
            message: format!("A new hero has appeared: {}!", hero.name),
        };
        self.heroes.push(hero);
        self.record(&event);
        id
    }

    pub fn gather_materials(&mut self) -> u32 {
        let total = town_logic::gather_materials(&mut self.town);
        self.log.push(self.tick, "You gathered 1 material");
        total
    }

    /// Upgrades a building. Each tent upgrade houses a new hero.
    pub fn upgrade_building(
        &mut self,
        kind: BuildingKind,
        rng: &mut impl Rng,
    ) -> Result<u32, GameError> {
        let level = match town_logic::upgrade_building(&mut self.town, kind) {
            Ok(level) => level,
            Err(err) => return Err(self.reject(err.into())),
        };
        self.record(&TickEvent::BuildingUpgraded {
            kind,
            level,
            message: format!("Upgraded {} to level {}", kind, level),
        });
        if kind == BuildingKind::Tent {
            self.spawn_hero(rng);
        }
        Ok(level)
    }

    pub fn discover_dungeon(&mut self, dungeon_id: &str) -> Result<(), GameError> {
        if let Err(err) = town_logic::discover_dungeon(&mut self.town, &mut self.dungeons, dungeon_id)
        {
            return Err(self.reject(err.into()));
        }
        let name = self
            .dungeon(dungeon_id)
            .map(|d| d.name.clone())
            .unwrap_or_default();
        self.record(&TickEvent::DungeonDiscovered {
            dungeon_id: dungeon_id.to_string(),
            message: format!("Your scouts have discovered the {}!", name),
        });
        Ok(())
    }

    pub fn craft_weapon(
        &mut self,
        catalog: &dyn TownCatalog,
        weapon_id: &str,
    ) -> Result<u32, GameError> {
        match town_logic::craft_weapon(&mut self.town, catalog, weapon_id) {
            Ok(stock) => {
                let name = catalog.weapon(weapon_id).map_or(weapon_id, |w| w.name);
                self.log
                    .push(self.tick, format!("The blacksmith forged a {} ({} in stock).", name, stock));
                Ok(stock)
            }
            Err(err) => Err(self.reject(err.into())),
        }
    }

    pub fn craft_potion(
        &mut self,
        catalog: &dyn TownCatalog,
        consumable_id: &str,
    ) -> Result<u32, GameError> {
        match town_logic::craft_potion(&mut self.town, catalog, consumable_id) {
            Ok(stock) => {
                let name = catalog
                    .consumable(consumable_id)
                    .map_or(consumable_id, |c| c.name);
                self.log
                    .push(self.tick, format!("The apothecary brewed a {} ({} in stock).", name, stock));
                Ok(stock)
            }
            Err(err) => Err(self.reject(err.into())),
        }
    }

    /// Sends a hero into a discovered dungeon directly, skipping the idle
    /// decision. A hero already exploring elsewhere withdraws from that
    /// dungeon first and loses its progress there.
    pub fn assign_hero(&mut self, hero_id: &str, dungeon_id: &str) -> Result<(), GameError> {
        let Some(hero_idx) = self.heroes.iter().position(|h| h.id == hero_id) else {
            return Err(self.reject(GameError::HeroNotFound(hero_id.to_string())));
        };
        let Some(dungeon_idx) = self.dungeons.iter().position(|d| d.id == dungeon_id) else {
            return Err(self.reject(GameError::DungeonNotFound(dungeon_id.to_string())));
        };
        if !self.dungeons[dungeon_idx].discovered {
            let name = self.dungeons[dungeon_idx].name.clone();
            return Err(self.reject(GameError::DungeonUndiscovered(name)));
        }

        let hero = &mut self.heroes[hero_idx];
        if let Some(previous) = hero.dungeon_id.clone().filter(|id| id != dungeon_id) {
            hero.reset_dungeon_progress(ResetReason::Withdrawal);
            if let Some(old) = self.dungeons.iter_mut().find(|d| d.id == previous) {
                old.remove_explorer(hero_id);
            }
            debug!(hero = hero_id, from = %previous, to = dungeon_id, "hero reassigned");
        }

        let event = assign_hero_to_dungeon(
            &mut self.heroes[hero_idx],
            &mut self.dungeons[dungeon_idx],
            None,
        );
        self.record(&event);
        Ok(())
    }
}
