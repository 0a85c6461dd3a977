//! Headless statistics: load the history, print the report, exit.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::metrics::UserAnalytics;
use crate::session::SessionStore;

pub struct StatsMode {
    store: SessionStore,
}

impl StatsMode {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            store: SessionStore::new(data_file),
        }
    }

    pub fn run(&mut self, out: &mut impl Write) -> Result<()> {
        let records = self.store.load_all().with_context(|| {
            format!(
                "Failed to load session history from {}",
                self.store.path().display()
            )
        })?;

        let report = format_report(records.len(), self.store.analytics());
        out.write_all(report.as_bytes())
            .context("Failed to write statistics")?;
        Ok(())
    }
}

/// Plain-text rendering of the statistics screen
pub fn format_report(sessions: usize, analytics: Option<UserAnalytics>) -> String {
    let mut text = String::from("Player Statistics\n");
    text.push_str(&"=".repeat(40));
    text.push('\n');

    if analytics.is_none() {
        text.push_str("No sessions recorded yet.\n");
        return text;
    }

    text.push_str(&format!("Sessions on file: {sessions}\n"));
    for section in analytics.unwrap_or_default().report() {
        text.push('\n');
        text.push_str(section.title);
        text.push('\n');
        for (label, value) in section.rows {
            text.push_str(&format!("  {label:<24} {value}\n"));
        }
    }
    text
}
