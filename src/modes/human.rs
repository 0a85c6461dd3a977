use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use super::Screen;
use crate::game::{GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{RenderView, Renderer};
use crate::session::{SessionSubmitter, StoreSnapshot};

/// Interactive play: intro menu, the game itself and the statistics screen
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    screen: Screen,
    submitter: SessionSubmitter,
    history: watch::Receiver<StoreSnapshot>,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(
        config: GameConfig,
        submitter: SessionSubmitter,
        history: watch::Receiver<StoreSnapshot>,
    ) -> Self {
        let mut engine = GameEngine::new(config).with_submitter(submitter.clone());
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            screen: Screen::Intro,
            submitter,
            history,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.screen == Screen::Game && !self.state.game_over {
                        self.update_game();
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let history = *self.history.borrow();
                    let view = RenderView {
                        screen: self.screen,
                        state: &self.state,
                        metrics: &self.metrics,
                        history: &history,
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &view);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            if self.screen == Screen::Game {
                self.engine.record_key_press(&mut self.state);
            }

            let action = self.input_handler.handle_key_event(self.screen, key);
            self.apply_action(action);
        }
    }

    fn apply_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Steer(direction) => {
                if self.screen == Screen::Game && !self.state.game_over {
                    self.engine.handle_input(&mut self.state, direction);
                }
            }
            KeyAction::StartGame(mode) => {
                self.engine.set_mode(mode);
                self.reset_game();
            }
            KeyAction::StartLastMode => self.reset_game(),
            KeyAction::Restart => {
                if self.screen == Screen::Game && self.state.game_over {
                    self.reset_game();
                }
            }
            KeyAction::ClearStats => {
                info!("clearing session history");
                self.submitter.request_clear();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::ShowStats | KeyAction::BackToMenu | KeyAction::None => {}
        }

        self.screen = self.screen.next(action, self.state.game_over);
    }

    fn update_game(&mut self) {
        let result = self.engine.tick(&mut self.state);

        // Track game over
        if result.record.is_some() {
            self.metrics.on_game_over(self.state.score());
        }
    }

    fn reset_game(&mut self) {
        self.engine.restart(&mut self.state);
        self.metrics.on_game_start();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
