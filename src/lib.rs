//! Snake Stats - a terminal Snake game that keeps a history of every game
//!
//! This library provides:
//! - Core game logic, classic and timed modes (game module)
//! - CSV-backed session history and its background writer (session module)
//! - Analytics over past sessions (metrics module)
//! - TUI input, rendering and screens (input, render, modes modules)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
