//! Generation configuration
//!
//! Every value here is an immutable input to one generation run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dungeon::{ArchetypeTable, LootTable};
use crate::spawn::TemplateId;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("min_rooms ({min}) is greater than max_rooms ({max})")]
    RoomRange { min: u32, max: u32 },

    #[error("base_room_size ({base}) is greater than max_room_size ({max})")]
    SizeRange { base: f32, max: f32 },

    #[error("Invalid value {value} for '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

/// Numeric layout and progression parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Fewest rooms on the main chain (inclusive)
    pub min_rooms: u32,
    /// Most rooms on the main chain (inclusive)
    pub max_rooms: u32,
    /// Footprint of a room without enemies
    pub base_room_size: f32,
    /// Largest footprint a chain room may grow to
    pub max_room_size: f32,
    /// Footprint growth per planned enemy
    pub size_increase_per_enemy: f32,
    pub corridor_width: f32,
    /// Per-room probability of a branch room
    pub branch_chance: f32,
    /// Per-room probability of a treasure room (rooms 2 and later)
    pub empty_room_chance: f32,
    pub starting_enemy_count: f32,
    /// Geometric growth of the enemy cap per room index
    pub enemy_increase_per_room: f32,
    pub boss_room_size_multiplier: f32,
    /// Y coordinate of the shared ground plane
    pub floor_height: f32,
    pub wall_height: f32,
    /// Loot items spawned in each treasure room
    pub treasure_loot_count: u32,
    /// Decorations per square unit of floor
    pub decoration_density: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_rooms: 6,
            max_rooms: 10,
            base_room_size: 10.0,
            max_room_size: 20.0,
            size_increase_per_enemy: 1.5,
            corridor_width: 3.0,
            branch_chance: 0.3,
            empty_room_chance: 0.15,
            starting_enemy_count: 2.0,
            enemy_increase_per_room: 1.2,
            boss_room_size_multiplier: 1.5,
            floor_height: 0.0,
            wall_height: 4.0,
            treasure_loot_count: 3,
            decoration_density: 0.02,
        }
    }
}

impl GenerationConfig {
    /// Check the invariants the generator relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_rooms > self.max_rooms {
            return Err(ConfigError::RoomRange {
                min: self.min_rooms,
                max: self.max_rooms,
            });
        }
        positive("base_room_size", self.base_room_size)?;
        positive("max_room_size", self.max_room_size)?;
        positive("corridor_width", self.corridor_width)?;
        positive("boss_room_size_multiplier", self.boss_room_size_multiplier)?;
        positive("enemy_increase_per_room", self.enemy_increase_per_room)?;
        positive("wall_height", self.wall_height)?;
        if self.base_room_size > self.max_room_size {
            return Err(ConfigError::SizeRange {
                base: self.base_room_size,
                max: self.max_room_size,
            });
        }
        probability("branch_chance", self.branch_chance)?;
        probability("empty_room_chance", self.empty_room_chance)?;
        non_negative("size_increase_per_enemy", self.size_increase_per_enemy)?;
        non_negative("starting_enemy_count", self.starting_enemy_count)?;
        non_negative("decoration_density", self.decoration_density)?;
        if !self.floor_height.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "floor_height",
                value: self.floor_height,
                reason: "must be finite",
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be greater than zero",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must not be negative",
        })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be within 0..=1",
        })
    }
}

/// Template identifiers handed to the entity spawner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTemplates {
    /// Container every generated entity lives under
    pub root: TemplateId,
    /// Per-room container holding the floor and walls
    pub room: TemplateId,
    pub floor: TemplateId,
    pub wall: TemplateId,
    pub corridor: TemplateId,
    pub player: TemplateId,
    /// Boss template; a placeholder marker is spawned when absent
    pub boss: Option<TemplateId>,
    pub placeholder: TemplateId,
    pub decorations: Vec<TemplateId>,
    pub enemies: ArchetypeTable,
    pub loot: LootTable,
}

impl Default for LevelTemplates {
    fn default() -> Self {
        Self {
            root: TemplateId::new("level_root"),
            room: TemplateId::new("room"),
            floor: TemplateId::new("floor"),
            wall: TemplateId::new("wall"),
            corridor: TemplateId::new("corridor"),
            player: TemplateId::new("player"),
            boss: Some(TemplateId::new("boss")),
            placeholder: TemplateId::new("placeholder"),
            decorations: vec![
                TemplateId::new("crate"),
                TemplateId::new("rubble"),
                TemplateId::new("brazier"),
            ],
            enemies: ArchetypeTable::default(),
            loot: LootTable::default(),
        }
    }
}

/// Full configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelveConfig {
    pub generation: GenerationConfig,
    pub templates: LevelTemplates,
}

impl DelveConfig {
    /// Load and validate a JSON configuration file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_config(&contents)
    }

    /// Parse and validate JSON configuration text
    pub fn parse_config(contents: &str) -> Result<Self, ConfigError> {
        let config: DelveConfig = serde_json::from_str(contents)?;
        config.generation.validate()?;
        Ok(config)
    }

    pub fn to_config_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_room_range_rejected() {
        let config = GenerationConfig {
            min_rooms: 8,
            max_rooms: 4,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RoomRange { min: 8, max: 4 })
        ));
    }

    #[test]
    fn test_size_range_rejected() {
        let config = GenerationConfig {
            base_room_size: 30.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SizeRange { .. })));
    }

    #[test]
    fn test_probability_rejected() {
        let config = GenerationConfig {
            branch_chance: 1.5,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "branch_chance"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_partial_config() {
        let text = r#"{ "generation": { "min_rooms": 3, "max_rooms": 3 } }"#;
        let config = DelveConfig::parse_config(text).unwrap();
        assert_eq!(config.generation.min_rooms, 3);
        assert_eq!(config.generation.corridor_width, 3.0);
        assert_eq!(config.templates.floor, TemplateId::new("floor"));
    }

    #[test]
    fn test_parse_invalid_config() {
        let text = r#"{ "generation": { "corridor_width": 0.0 } }"#;
        assert!(matches!(
            DelveConfig::parse_config(text),
            Err(ConfigError::InvalidValue { field: "corridor_width", .. })
        ));
        assert!(matches!(
            DelveConfig::parse_config("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_roundtrip() {
        let mut config = DelveConfig::default();
        config.generation.branch_chance = 0.0;
        config.templates.boss = None;

        let text = config.to_config_string().unwrap();
        let parsed = DelveConfig::parse_config(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
