pub mod analytics;
pub mod game_metrics;

pub use analytics::{ReportSection, UserAnalytics};
pub use game_metrics::{GameMetrics, format_millis};
