use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, GameMode};
use crate::modes::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Steer the snake
    Steer(Direction),
    StartGame(GameMode),
    /// Start a game in the most recently used mode
    StartLastMode,
    ShowStats,
    /// Wipe the session history
    ClearStats,
    Restart,
    BackToMenu,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Translate a key press on `screen` into an action
    pub fn handle_key_event(&self, screen: Screen, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match screen {
            Screen::Intro => Self::intro_key(key.code),
            Screen::Game => Self::game_key(key.code),
            Screen::Stats => Self::stats_key(key.code),
        }
    }

    fn intro_key(code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Enter => KeyAction::StartLastMode,
            KeyCode::Char('1') | KeyCode::Char('c') | KeyCode::Char('C') => {
                KeyAction::StartGame(GameMode::Classic)
            }
            KeyCode::Char('2') | KeyCode::Char('t') | KeyCode::Char('T') => {
                KeyAction::StartGame(GameMode::Timed)
            }
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::ShowStats,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }

    fn game_key(code: KeyCode) -> KeyAction {
        match code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Direction::Right),

            // Game over overlay
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char('m') | KeyCode::Char('M') => KeyAction::BackToMenu,

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }

    fn stats_key(code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Esc | KeyCode::Backspace => {
                KeyAction::BackToMenu
            }
            KeyCode::Char('x') | KeyCode::Char('X') => KeyAction::ClearStats,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(Screen::Game, press(KeyCode::Up)),
            KeyAction::Steer(Direction::Up)
        );
        assert_eq!(
            handler.handle_key_event(Screen::Game, press(KeyCode::Down)),
            KeyAction::Steer(Direction::Down)
        );
        assert_eq!(
            handler.handle_key_event(Screen::Game, press(KeyCode::Left)),
            KeyAction::Steer(Direction::Left)
        );
        assert_eq!(
            handler.handle_key_event(Screen::Game, press(KeyCode::Right)),
            KeyAction::Steer(Direction::Right)
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(Screen::Game, press(KeyCode::Char('w'))),
            KeyAction::Steer(Direction::Up)
        );
        assert_eq!(
            handler.handle_key_event(Screen::Game, press(KeyCode::Char('a'))),
            KeyAction::Steer(Direction::Left)
        );
        assert_eq!(
            handler.handle_key_event(Screen::Game, press(KeyCode::Char('s'))),
            KeyAction::Steer(Direction::Down)
        );

        let d_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(Screen::Game, d_upper),
            KeyAction::Steer(Direction::Right)
        );
    }

    #[test]
    fn test_same_key_depends_on_screen() {
        let handler = InputHandler::new();
        let s = press(KeyCode::Char('s'));

        assert_eq!(handler.handle_key_event(Screen::Intro, s), KeyAction::ShowStats);
        assert_eq!(
            handler.handle_key_event(Screen::Game, s),
            KeyAction::Steer(Direction::Down)
        );
        assert_eq!(handler.handle_key_event(Screen::Stats, s), KeyAction::None);
    }

    #[test]
    fn test_intro_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(Screen::Intro, press(KeyCode::Enter)),
            KeyAction::StartLastMode
        );
        assert_eq!(
            handler.handle_key_event(Screen::Intro, press(KeyCode::Char('c'))),
            KeyAction::StartGame(GameMode::Classic)
        );
        assert_eq!(
            handler.handle_key_event(Screen::Intro, press(KeyCode::Char('t'))),
            KeyAction::StartGame(GameMode::Timed)
        );
        assert_eq!(
            handler.handle_key_event(Screen::Intro, press(KeyCode::Esc)),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_game_over_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(Screen::Game, press(KeyCode::Char('r'))),
            KeyAction::Restart
        );
        assert_eq!(
            handler.handle_key_event(Screen::Game, press(KeyCode::Char('M'))),
            KeyAction::BackToMenu
        );
    }

    #[test]
    fn test_stats_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(Screen::Stats, press(KeyCode::Esc)),
            KeyAction::BackToMenu
        );
        assert_eq!(
            handler.handle_key_event(Screen::Stats, press(KeyCode::Char('x'))),
            KeyAction::ClearStats
        );
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for screen in [Screen::Intro, Screen::Game, Screen::Stats] {
            assert_eq!(handler.handle_key_event(screen, ctrl_c), KeyAction::Quit);
        }
    }
}
