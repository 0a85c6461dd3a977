pub mod human;
pub mod screen;
pub mod stats;

pub use human::HumanMode;
pub use screen::Screen;
pub use stats::{StatsMode, format_report};
