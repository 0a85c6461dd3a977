use crate::input::KeyAction;

/// Which screen the interactive mode is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Intro,
    Game,
    Stats,
}

impl Screen {
    /// Screen to show after `action`.
    ///
    /// Leaving a game only works once it is over; a game in progress must
    /// first end.
    pub fn next(self, action: KeyAction, game_over: bool) -> Screen {
        match (self, action) {
            (Screen::Intro, KeyAction::StartGame(_) | KeyAction::StartLastMode) => Screen::Game,
            (Screen::Intro, KeyAction::ShowStats) => Screen::Stats,
            (Screen::Game, KeyAction::BackToMenu) if game_over => Screen::Intro,
            (Screen::Stats, KeyAction::BackToMenu) => Screen::Intro,
            (screen, _) => screen,
        }
    }
}
