//! Summary statistics over all recorded sessions.
//!
//! Always recomputed by a full scan; there is one record per finished game
//! so the set stays small.

use super::format_millis;
use crate::session::SessionRecord;

/// Totals, floor-divided averages and extremes across sessions.
///
/// `Default` is the all-zero value shown before any history is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserAnalytics {
    // Totals
    pub total_games: i64,
    pub total_moves: i64,
    pub total_food_eaten: i64,
    pub total_time_spent: i64,

    // Averages
    pub average_length: i64,
    pub average_food_eaten: i64,
    pub average_moves: i64,
    pub average_time_spent: i64,

    // Longest
    pub longest_length: i64,
    pub longest_food_eaten: i64,
    pub longest_moves: i64,
    pub longest_time_spent: i64,

    // Shortest
    pub shortest_length: i64,
    pub shortest_food_eaten: i64,
    pub shortest_moves: i64,
    pub shortest_time_spent: i64,
}

/// Running min/max/sum for one metric
#[derive(Debug, Clone, Copy)]
struct Extent {
    sum: i64,
    min: i64,
    max: i64,
}

impl Extent {
    fn new(first: i64) -> Self {
        Self {
            sum: 0,
            min: first,
            max: first,
        }
    }

    fn add(&mut self, value: i64) {
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

impl UserAnalytics {
    /// Aggregate `records`.
    ///
    /// Returns `None` for an empty slice: there is nothing to average.
    pub fn aggregate(records: &[SessionRecord]) -> Option<Self> {
        let first = records.first()?;

        let mut length = Extent::new(first.length as i64);
        let mut food = Extent::new(first.food_eaten as i64);
        let mut moves = Extent::new(first.moves as i64);
        let mut time = Extent::new(first.time_spent_millis);

        for record in records {
            length.add(record.length as i64);
            food.add(record.food_eaten as i64);
            moves.add(record.moves as i64);
            time.add(record.time_spent_millis);
        }

        let games = records.len() as i64;

        Some(Self {
            total_games: games,
            total_moves: moves.sum,
            total_food_eaten: food.sum,
            total_time_spent: time.sum,

            average_length: length.sum / games,
            average_food_eaten: food.sum / games,
            average_moves: moves.sum / games,
            average_time_spent: time.sum / games,

            longest_length: length.max,
            longest_food_eaten: food.max,
            longest_moves: moves.max,
            longest_time_spent: time.max,

            shortest_length: length.min,
            shortest_food_eaten: food.min,
            shortest_moves: moves.min,
            shortest_time_spent: time.min,
        })
    }
}

/// One titled block of the statistics screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

impl UserAnalytics {
    /// Labelled values grouped the way the statistics screen shows them
    pub fn report(&self) -> Vec<ReportSection> {
        vec![
            ReportSection {
                title: "Totals",
                rows: vec![
                    ("Total Games", self.total_games.to_string()),
                    ("Total Moves", self.total_moves.to_string()),
                    ("Total Food Eaten", self.total_food_eaten.to_string()),
                    ("Total Time Spent", format_millis(self.total_time_spent)),
                ],
            },
            ReportSection {
                title: "Averages",
                rows: vec![
                    ("Average Length", self.average_length.to_string()),
                    ("Average Moves per Game", self.average_moves.to_string()),
                    ("Average Food per Game", self.average_food_eaten.to_string()),
                    ("Average Time", format_millis(self.average_time_spent)),
                ],
            },
            ReportSection {
                title: "Longest Stats",
                rows: vec![
                    ("Longest Length", self.longest_length.to_string()),
                    ("Longest Moves", self.longest_moves.to_string()),
                    ("Longest Food Eaten", self.longest_food_eaten.to_string()),
                    ("Longest Time", format_millis(self.longest_time_spent)),
                ],
            },
            ReportSection {
                title: "Shortest Stats",
                rows: vec![
                    ("Shortest Length", self.shortest_length.to_string()),
                    ("Shortest Moves", self.shortest_moves.to_string()),
                    ("Shortest Food Eaten", self.shortest_food_eaten.to_string()),
                    ("Shortest Time", format_millis(self.shortest_time_spent)),
                ],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(id: u64, length: i32, moves: i32, millis: i64) -> SessionRecord {
        SessionRecord {
            id,
            score: length as i64,
            length,
            food_eaten: length,
            moves,
            time_spent_millis: millis,
            timestamp: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_empty_is_unavailable() {
        assert_eq!(UserAnalytics::aggregate(&[]), None);
    }

    #[test]
    fn test_single_record() {
        let analytics = UserAnalytics::aggregate(&[record(0, 4, 9, 1200)]).unwrap();

        assert_eq!(analytics.total_games, 1);
        assert_eq!(analytics.average_length, 4);
        assert_eq!(analytics.longest_moves, 9);
        assert_eq!(analytics.shortest_moves, 9);
        assert_eq!(analytics.total_time_spent, 1200);
    }

    #[test]
    fn test_two_records() {
        let records = [record(0, 3, 10, 5000), record(1, 7, 21, 9000)];
        let analytics = UserAnalytics::aggregate(&records).unwrap();

        assert_eq!(analytics.total_games, 2);
        assert_eq!(analytics.total_moves, 31);
        assert_eq!(analytics.total_food_eaten, 10);
        assert_eq!(analytics.total_time_spent, 14000);
        assert_eq!(analytics.average_length, 5);
        assert_eq!(analytics.average_moves, 15); // 31 / 2, floored
        assert_eq!(analytics.average_time_spent, 7000);
        assert_eq!(analytics.longest_length, 7);
        assert_eq!(analytics.shortest_length, 3);
        assert_eq!(analytics.longest_time_spent, 9000);
        assert_eq!(analytics.shortest_time_spent, 5000);
    }

    #[test]
    fn test_extremes_ignore_order() {
        let records = [
            record(0, 5, 2, 300),
            record(1, 0, 40, 100),
            record(2, 12, 7, 200),
        ];
        let analytics = UserAnalytics::aggregate(&records).unwrap();

        assert_eq!(analytics.shortest_length, 0);
        assert_eq!(analytics.longest_length, 12);
        assert_eq!(analytics.shortest_moves, 2);
        assert_eq!(analytics.longest_moves, 40);
        assert_eq!(analytics.shortest_time_spent, 100);
        assert_eq!(analytics.average_length, 5); // 17 / 3
    }

    #[test]
    fn test_report_layout() {
        let records = [record(0, 3, 10, 65_000), record(1, 7, 21, 5_000)];
        let report = UserAnalytics::aggregate(&records).unwrap().report();

        let titles: Vec<_> = report.iter().map(|s| s.title).collect();
        assert_eq!(titles, ["Totals", "Averages", "Longest Stats", "Shortest Stats"]);
        assert_eq!(report[0].rows[0], ("Total Games", "2".to_string()));
        assert_eq!(report[0].rows[3], ("Total Time Spent", "01:10".to_string()));
        assert_eq!(report[2].rows[3], ("Longest Time", "01:05".to_string()));
    }

    #[test]
    fn test_default_is_zero() {
        let analytics = UserAnalytics::default();
        assert_eq!(analytics.total_games, 0);
        assert_eq!(analytics.shortest_length, 0);
    }
}
