//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use rooted_growth::{GrowthConfig, LevelCurve, ScoringConfig};
use rooted_world::WorldGenConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World generation: seed, chunking, noise layers, water and rocks.
    pub world: WorldGenConfig,
    /// Base stats and movement tuning for the growing root.
    pub growth: GrowthConfig,
    /// Depth and length scoring intervals.
    pub scoring: ScoringConfig,
    /// Tree level curve and starting roots.
    pub progression: LevelCurve,
    /// Headless run settings.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Headless simulation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Days to simulate before stopping (the run also stops at game over).
    pub days: u32,
    /// Safety cap on fixed ticks per day.
    pub max_ticks_per_day: u64,
    /// Fixed update rate in Hz.
    pub tick_rate: u32,
    /// Classify chunks on background workers.
    pub parallel_generation: bool,
    /// Probability per tick that the tip splits.
    pub split_chance: f64,
    /// Splits allowed per day.
    pub max_splits_per_day: u32,
    /// Probability per tick that a random stat card is collected.
    pub card_chance: f64,
    /// Cards collected per day at most.
    pub max_cards_per_day: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: 4,
            max_ticks_per_day: 200_000,
            tick_rate: 50,
            parallel_generation: false,
            split_chance: 0.002,
            max_splits_per_day: 2,
            card_chance: 0.001,
            max_cards_per_day: 3,
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub log_to_file: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

/// `<platform config dir>/rooted`, if the platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rooted"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let write_error = |source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        };

        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(write_error)?;
        Ok(())
    }

    /// Rejects settings the world and the headless loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate().map_err(|e| ConfigError::Invalid {
            field: "world",
            reason: e.to_string(),
        })?;
        if self.growth.point_spacing <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "growth.point_spacing",
                reason: format!("must be positive, got {}", self.growth.point_spacing),
            });
        }
        if self.simulation.tick_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "simulation.tick_rate",
                reason: "must be at least 1 Hz".to_string(),
            });
        }
        for (field, chance) in [
            ("simulation.split_chance", self.simulation.split_chance),
            ("simulation.card_chance", self.simulation.card_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("probability {chance} is outside [0, 1]"),
                });
            }
        }
        Ok(())
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.to_path_buf(),
                source,
            })?;
        let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
