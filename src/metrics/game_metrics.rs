use std::time::{Duration, Instant};

/// Per-run HUD counters: the clock of the game in progress and the best
/// score reached since the program started.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_score: usize,
    pub games_this_run: u32,
    /// Set once the current game has ended so the clock stops
    frozen: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_this_run: 0,
            frozen: false,
        }
    }

    pub fn update(&mut self) {
        if !self.frozen {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.frozen = false;
    }

    pub fn on_game_over(&mut self, final_score: usize) {
        self.update();
        self.frozen = true;
        self.games_this_run += 1;
        self.best_score = self.best_score.max(final_score);
    }

    pub fn format_time(&self) -> String {
        format_millis(self.elapsed_time.as_millis() as i64)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a millisecond count as `MM:SS`; minutes are not wrapped into hours
pub fn format_millis(millis: i64) -> String {
    let total_secs = millis.max(0) / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
