//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Finished games are reported to the session store through an optional
//! submission handle.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig, GameMode};
pub use direction::{Direction, Velocity};
pub use engine::{GameEngine, TickInfo, TickResult};
pub use state::{CollisionType, GameState, Position, TimedRound};
