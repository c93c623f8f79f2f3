use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub min_damage: u32,
    pub max_damage: u32,
    pub level: u32,
    /// True only for dungeon-ending bosses.
    pub is_variant: bool,
}

impl Monster {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Applies damage, flooring health at zero. Returns true if still alive.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.is_alive()
    }
}

/// Naming rule and stat multipliers for a boss version of a monster type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterVariant {
    pub name: String,
    /// `"Giant Bat"` when true, `"Bat Giant"` when false.
    pub is_prefix: bool,
    pub health_multiplier: f64,
    pub damage_multiplier: f64,
}

impl MonsterVariant {
    pub fn new(name: &str, is_prefix: bool, health_multiplier: f64, damage_multiplier: f64) -> Self {
        Self {
            name: name.to_string(),
            is_prefix,
            health_multiplier,
            damage_multiplier,
        }
    }

    pub fn apply_to_name(&self, monster_type: &str) -> String {
        if self.is_prefix {
            format!("{} {}", self.name, monster_type)
        } else {
            format!("{} {}", monster_type, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bat() -> Monster {
        Monster {
            name: "Bat".to_string(),
            health: 7,
            max_health: 7,
            min_damage: 1,
            max_damage: 2,
            level: 1,
            is_variant: false,
        }
    }

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut monster = bat();
        assert!(monster.take_damage(3));
        assert_eq!(monster.health, 4);
        assert!(!monster.take_damage(100));
        assert_eq!(monster.health, 0);
        assert!(monster.is_defeated());
    }

    #[test]
    fn test_variant_naming() {
        let prefix = MonsterVariant::new("Giant", true, 1.5, 1.3);
        let suffix = MonsterVariant::new("King", false, 2.0, 1.9);
        assert_eq!(prefix.apply_to_name("Bat"), "Giant Bat");
        assert_eq!(suffix.apply_to_name("Rat"), "Rat King");
    }
}
