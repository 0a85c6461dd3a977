use std::time::Instant;

use super::config::GameMode;
use super::direction::{Velocity, velocity_delta};

/// A tile on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position by the current velocity (unchanged when stationary)
    pub fn moved_with(&self, velocity: Velocity) -> Self {
        let (dx, dy) = velocity_delta(velocity);
        self.moved_by(dx, dy)
    }
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Countdown bookkeeping for timed mode.
///
/// A round is regenerated at game start and every time `food_eaten`
/// reaches `food_target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedRound {
    pub time_limit_seconds: i32,
    pub food_target: i32,
    pub food_eaten: i32,
    pub tick_counter: u32,
}

impl TimedRound {
    pub fn new(time_limit_seconds: i32, food_target: i32) -> Self {
        Self {
            time_limit_seconds,
            food_target,
            food_eaten: 0,
            tick_counter: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.food_eaten == self.food_target
    }

    /// Remaining time as `MM:SS`
    pub fn format_remaining(&self) -> String {
        let secs = self.time_limit_seconds.max(0);
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

/// Complete game state; this is also the snapshot handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub head: Position,
    /// Body segments ordered from the one behind the head to the tail
    pub body: Vec<Position>,
    pub food: Position,
    pub velocity: Velocity,
    /// Key presses received this game, including rejected reversals
    pub moves: i32,
    pub game_over: bool,
    pub mode: GameMode,
    pub round: TimedRound,
    pub grid_width: usize,
    pub grid_height: usize,
    pub started_at: Instant,
}

impl GameState {
    /// Create a fresh, stationary game state
    pub fn new(
        head: Position,
        food: Position,
        grid_width: usize,
        grid_height: usize,
        mode: GameMode,
        round: TimedRound,
    ) -> Self {
        Self {
            head,
            body: Vec::new(),
            food,
            velocity: None,
            moves: 0,
            game_over: false,
            mode,
            round,
            grid_width,
            grid_height,
            started_at: Instant::now(),
        }
    }

    /// Current score, which is the body length
    pub fn score(&self) -> usize {
        self.body.len()
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the head or any body segment
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.head == pos || self.body.contains(&pos)
    }

    /// Check if the head sits on one of the body segments
    pub fn head_hits_body(&self) -> bool {
        self.body.contains(&self.head)
    }
}
