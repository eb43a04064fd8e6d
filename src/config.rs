// Configuration module for reading Duel.toml
// All rule constants of the round engine and the surrounding server live here

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub grid: GridConfig,
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
    pub food: FoodConfig,
    #[serde(default)]
    pub rng: RngConfig,
    pub session_log: SessionLogConfig,
}

/// Board geometry and starting layout
#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    /// Cells per row and column (the grid is always square)
    pub size: i32,
    pub start_length: usize,
    /// Distance of each starting head from its side wall
    pub start_inset: i32,
}

/// Scheduler cadence
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub tick_ms: u64,
    pub restart_delay_ms: u64,
}

/// Points awarded by the round engine
#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    pub food_points: u32,
    pub win_bonus: u32,
}

/// Food placement bounds
#[derive(Debug, Deserialize, Clone)]
pub struct FoodConfig {
    pub max_random_attempts: u32,
}

/// Random source configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RngConfig {
    /// Fixed seed; a fresh one is drawn per process when absent
    pub seed: Option<u64>,
}

/// Session log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SessionLogConfig {
    pub enabled: bool,
    pub path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Duel.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed and validated configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Duel.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Duel.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Duel.toml
    pub fn default_hardcoded() -> Self {
        Config {
            grid: GridConfig {
                size: 24,
                start_length: 3,
                start_inset: 4,
            },
            timing: TimingConfig {
                tick_ms: 100,
                restart_delay_ms: 800,
            },
            scoring: ScoringConfig {
                food_points: 1,
                win_bonus: 3,
            },
            food: FoodConfig {
                max_random_attempts: 1000,
            },
            rng: RngConfig { seed: None },
            session_log: SessionLogConfig {
                enabled: false,
                path: "duel_session.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Duel.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Same defaults on a different grid size, used by tests and tools
    pub fn with_grid_size(size: i32) -> Self {
        let mut config = Self::default_hardcoded();
        config.grid.size = size;
        config
    }

    /// Checks that both starting snakes fit on the grid without touching
    ///
    /// Player 1 starts at `start_inset` and lays its body toward x = 0, player 2
    /// mirrors it from the right wall. Both heads must stay distinct.
    pub fn validate(&self) -> Result<(), String> {
        let grid = &self.grid;

        if grid.start_length == 0 {
            return Err("grid.start_length must be at least 1".to_string());
        }
        if grid.size <= 0 {
            return Err(format!("grid.size must be positive, got {}", grid.size));
        }
        let tail_reach = i32::try_from(grid.start_length - 1)
            .map_err(|_| format!("grid.start_length {} is too large", grid.start_length))?;
        if grid.start_inset < tail_reach {
            return Err(format!(
                "grid.start_inset {} cannot hold a snake of length {}",
                grid.start_inset, grid.start_length
            ));
        }
        // Same as 2 * inset + 1 >= size, without the overflow
        if grid.start_inset >= grid.size / 2 {
            return Err(format!(
                "grid.size {} is too small for start_inset {}",
                grid.size, grid.start_inset
            ));
        }
        if self.timing.tick_ms == 0 {
            return Err("timing.tick_ms must be greater than zero".to_string());
        }

        Ok(())
    }
}
