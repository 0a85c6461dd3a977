use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{
    config::{GameConfig, GameMode},
    direction::Direction,
    state::{CollisionType, GameState, Position, TimedRound},
};
use crate::session::{SessionRecord, SessionSubmitter};

/// Information about a tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickInfo {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Whether the timed-mode countdown ran out this tick
    pub time_expired: bool,
}

/// Result of a game tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the tick
    pub info: TickInfo,
    /// Session candidate, present only on the tick that ended the game
    pub record: Option<SessionRecord>,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    submitter: Option<SessionSubmitter>,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
            submitter: None,
        }
    }

    /// Create an engine with a fixed random seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            submitter: None,
        }
    }

    /// Hand finished sessions to the store through `submitter`
    pub fn with_submitter(mut self, submitter: SessionSubmitter) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Switch rule set; takes effect on the next reset
    pub fn set_mode(&mut self, mode: GameMode) {
        self.config.mode = mode;
    }

    /// Start a fresh game
    pub fn reset(&mut self) -> GameState {
        let head = self.random_start();
        let round = self.new_round();
        let mut state = GameState::new(
            head,
            head,
            self.config.grid_width,
            self.config.grid_height,
            self.config.mode,
            round,
        );
        state.food = self.spawn_food_avoid_snake(&state);
        debug!(mode = self.config.mode.as_str(), x = head.x, y = head.y, "game started");
        state
    }

    /// Reinitialize `state` in place: empty body, counters zeroed, new head,
    /// new start time
    pub fn restart(&mut self, state: &mut GameState) {
        *state = self.reset();
    }

    /// Count a key press toward `moves`. Every key pressed during a running
    /// game counts, whether or not it steers.
    pub fn record_key_press(&self, state: &mut GameState) {
        if !state.game_over {
            state.moves += 1;
        }
    }

    /// Steer the snake. A reversal of the current heading is rejected.
    /// Returns whether the heading changed.
    pub fn handle_input(&mut self, state: &mut GameState, direction: Direction) -> bool {
        match state.velocity {
            Some(current) if current.is_opposite(direction) => false,
            _ => {
                state.velocity = Some(direction);
                true
            }
        }
    }

    /// Advance the game by one tick
    pub fn tick(&mut self, state: &mut GameState) -> TickResult {
        if state.game_over {
            return TickResult {
                terminated: true,
                info: TickInfo {
                    ate_food: false,
                    collision_type: None,
                    time_expired: false,
                },
                record: None,
            };
        }

        let ate_food = self.eat_food(state);

        self.move_snake(state);
        let collision_type = self.check_collision(state);
        if collision_type.is_some() {
            state.game_over = true;
        }

        let mut time_expired = false;
        if state.mode == GameMode::Timed {
            time_expired = self.advance_round(state);
            if time_expired {
                state.game_over = true;
            }
        }

        let record = state.game_over.then(|| self.finish(state));

        TickResult {
            terminated: state.game_over,
            info: TickInfo {
                ate_food,
                collision_type,
                time_expired,
            },
            record,
        }
    }

    /// Grow the snake if the head is on the food
    fn eat_food(&mut self, state: &mut GameState) -> bool {
        if state.food != state.head {
            return false;
        }

        let tail = state.body.last().copied().unwrap_or(state.head);
        state.body.push(tail);
        state.food = self.spawn_food_avoid_snake(state);
        state.round.food_eaten += 1;
        true
    }

    /// Step the head by the velocity; each segment takes its predecessor's
    /// old position
    fn move_snake(&self, state: &mut GameState) {
        let old_head = state.head;
        state.head = state.head.moved_with(state.velocity);

        for i in (0..state.body.len()).rev() {
            state.body[i] = if i == 0 { old_head } else { state.body[i - 1] };
        }
    }

    fn check_collision(&self, state: &GameState) -> Option<CollisionType> {
        if !state.is_in_bounds(state.head) {
            return Some(CollisionType::Wall);
        }

        if state.head_hits_body() {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Advance the countdown and retarget when the round's goal is met.
    /// Returns true when time has run out.
    fn advance_round(&mut self, state: &mut GameState) -> bool {
        state.round.tick_counter += 1;
        if state.round.tick_counter >= self.config.ticks_per_second {
            state.round.time_limit_seconds -= 1;
            state.round.tick_counter = 0;
        }

        if state.round.is_complete() {
            state.round = self.new_round();
            debug!(
                food_target = state.round.food_target,
                seconds = state.round.time_limit_seconds,
                "timed round completed"
            );
        }

        state.round.time_limit_seconds <= 0
    }

    fn finish(&self, state: &GameState) -> SessionRecord {
        let record = SessionRecord::from_game(
            state.body.len(),
            state.moves,
            state.started_at.elapsed(),
        );
        debug!(
            score = record.score,
            moves = record.moves,
            millis = record.time_spent_millis,
            "game over"
        );

        if let Some(submitter) = &self.submitter {
            submitter.submit(record.clone());
        }
        record
    }

    /// Draw a new timed-mode target and countdown
    fn new_round(&mut self) -> TimedRound {
        let food_target = self.rng.gen_range(1..=self.config.max_food_target);
        let time_limit =
            self.config.base_time_seconds() + food_target * self.config.seconds_per_food;
        TimedRound::new(time_limit, food_target)
    }

    /// Random head in `[0, dim - start_inset]` on both axes
    fn random_start(&mut self) -> Position {
        let max_x = self.config.grid_width.saturating_sub(self.config.start_inset);
        let max_y = self.config.grid_height.saturating_sub(self.config.start_inset);
        let max_x = max_x.min(self.config.grid_width.saturating_sub(1));
        let max_y = max_y.min(self.config.grid_height.saturating_sub(1));
        Position::new(
            self.rng.gen_range(0..=max_x) as i32,
            self.rng.gen_range(0..=max_y) as i32,
        )
    }

    /// Spawn food on a random tile not covered by the snake.
    ///
    /// Rejection sampling with no retry bound: it only stalls if the snake
    /// fills the whole board.
    fn spawn_food_avoid_snake(&mut self, state: &GameState) -> Position {
        loop {
            let x = self.rng.gen_range(0..self.config.grid_width) as i32;
            let y = self.rng.gen_range(0..self.config.grid_height) as i32;
            let pos = Position::new(x, y);

            if !state.is_occupied_by_snake(pos) {
                return pos;
            }
        }
    }
}
