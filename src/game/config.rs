use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Which rule set a game is played under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Play until the snake hits a wall or itself
    #[default]
    Classic,
    /// Eat a target number of food before the countdown runs out
    Timed,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Timed => "Timed",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid needs room for the snake and its food (got {width}x{height})")]
    GridTooSmall { width: usize, height: usize },
    #[error("tick interval must be at least 1ms")]
    ZeroTickInterval,
    #[error("ticks_per_second must be at least 1")]
    ZeroTicksPerSecond,
    #[error("max_food_target must be at least 1")]
    ZeroFoodTarget,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in tiles
    pub grid_width: usize,
    /// Height of the game grid in tiles
    pub grid_height: usize,
    /// Rule set
    pub mode: GameMode,
    /// Wall-clock time between two ticks
    pub tick_interval_ms: u64,
    /// Ticks that make up one second of the timed-mode countdown
    pub ticks_per_second: u32,
    /// Margin kept free on the far edges when placing the starting head
    pub start_inset: usize,

    // Timed mode
    /// Upper bound (inclusive) for a randomly drawn food target
    pub max_food_target: i32,
    /// Extra countdown seconds granted per food in the target
    pub seconds_per_food: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 24,
            grid_height: 24,
            mode: GameMode::Classic,
            tick_interval_ms: 100,
            ticks_per_second: 10,
            start_inset: 10,
            max_food_target: 20,
            seconds_per_food: 5,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Derive the grid from a pixel board, one tile per `block_size` pixels
    pub fn from_panel(panel_width: usize, panel_height: usize, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self::new(panel_width / block_size, panel_height / block_size)
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(12, 12)
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Countdown seconds that every timed round starts from before the
    /// per-food bonus is added
    pub fn base_time_seconds(&self) -> i32 {
        ((self.grid_width * self.grid_height) / 20) as i32
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.grid_width * self.grid_height < 2 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTicksPerSecond);
        }
        if self.max_food_target < 1 {
            return Err(ConfigError::ZeroFoodTarget);
        }
        Ok(())
    }
}
