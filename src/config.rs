//! Story configuration.
//!
//! Loaded from an optional JSON file; every field falls back to the defaults the
//! story world was tuned with (four zones, 30% human kill chance and so on).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_STATS_DB_PATH: &str = "./outcomes.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Fixed story seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    pub stats_db_path: PathBuf,
    /// Round limit after which an unresolved story is closed anyway.
    pub max_rounds: u32,
    pub zone_count: u8,
    pub rules: OutcomeRules,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            seed: None,
            stats_db_path: PathBuf::from(DEFAULT_STATS_DB_PATH),
            max_rounds: 500,
            zone_count: 4,
            rules: OutcomeRules::default(),
        }
    }
}

/// Percent chances used when the story loop resolves a realized action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeRules {
    pub human_kill_chance: u8,
    pub monster_kill_chance: u8,
    pub escape_chance: u8,
    pub discover_chance: u8,
}

impl Default for OutcomeRules {
    fn default() -> Self {
        Self {
            human_kill_chance: 30,
            monster_kill_chance: 70,
            escape_chance: 10,
            discover_chance: 50,
        }
    }
}

impl StoryConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::parse(&data)
    }

    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let config: StoryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zone_count == 0 {
            return Err(ConfigError::Invalid("zone_count must be at least 1".into()));
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::Invalid("max_rounds must be at least 1".into()));
        }
        let chances = [
            ("human_kill_chance", self.rules.human_kill_chance),
            ("monster_kill_chance", self.rules.monster_kill_chance),
            ("escape_chance", self.rules.escape_chance),
            ("discover_chance", self.rules.discover_chance),
        ];
        for (name, value) in chances {
            if value > 100 {
                return Err(ConfigError::Invalid(format!(
                    "{} is a percentage, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = StoryConfig::parse("{}").unwrap();
        assert_eq!(config, StoryConfig::default());
        assert_eq!(config.rules.escape_chance, 10);
    }

    #[test]
    fn partial_rules_keep_other_defaults() {
        let config =
            StoryConfig::parse(r#"{"seed": 9, "rules": {"escape_chance": 40}}"#).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.rules.escape_chance, 40);
        assert_eq!(config.rules.human_kill_chance, 30);
        assert_eq!(config.zone_count, 4);
    }

    #[test]
    fn rejects_out_of_range_chances() {
        let err = StoryConfig::parse(r#"{"rules": {"discover_chance": 120}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            StoryConfig::parse("{seed"),
            Err(ConfigError::Parse(_))
        ));
    }
}
