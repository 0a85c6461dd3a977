//! One completed game, and its CSV row representation.
//!
//! Rows are `id, score, length, food_eaten, time_spent_millis, moves, date`.
//! The date is written as an ISO-8601 local date-time
//! (`2025-01-05T14:03:22.123`), which sorts and parses as text.

use chrono::{Local, NaiveDateTime};
use csv::StringRecord;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Header written to a new history file
pub const CSV_HEADER: [&str; 7] = [
    "Id",
    "Score",
    "Snake-Length",
    "Food-Eaten",
    "Time-Spent",
    "Moves",
    "Date",
];

/// Number of fields every data row carries
pub const ROW_FIELDS: usize = 7;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const TIMESTAMP_FORMAT_MINUTES: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("expected 7 fields, found {found}")]
    FieldCount { found: usize },
    #[error("field {field} is not a valid integer: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid timestamp {value:?}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Immutable summary of one finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: u64,
    pub score: i64,
    pub length: i32,
    pub food_eaten: i32,
    pub moves: i32,
    pub time_spent_millis: i64,
    pub timestamp: NaiveDateTime,
}

impl SessionRecord {
    /// Build the candidate record for a game that just ended.
    ///
    /// Score, length and food eaten are all the final body length. The id
    /// is a placeholder until the store assigns one.
    pub fn from_game(body_length: usize, moves: i32, elapsed: Duration) -> Self {
        let length = body_length as i32;
        Self {
            id: 0,
            score: length as i64,
            length,
            food_eaten: length,
            moves,
            time_spent_millis: elapsed.as_millis() as i64,
            timestamp: Local::now().naive_local(),
        }
    }

    /// Copy of this record carrying the id assigned by the store
    pub fn with_id(self, id: u64) -> Self {
        Self { id, ..self }
    }

    pub fn to_csv_row(&self) -> [String; ROW_FIELDS] {
        [
            self.id.to_string(),
            self.score.to_string(),
            self.length.to_string(),
            self.food_eaten.to_string(),
            self.time_spent_millis.to_string(),
            self.moves.to_string(),
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        ]
    }

    /// Parse a data row. Quote characters and surrounding whitespace are
    /// stripped from each field before parsing; extra trailing fields are
    /// ignored.
    pub fn from_csv_row(row: &StringRecord) -> Result<Self, RecordError> {
        if row.len() < ROW_FIELDS {
            return Err(RecordError::FieldCount { found: row.len() });
        }

        let raw_timestamp = clean(&row[6]);
        let timestamp = parse_timestamp(&raw_timestamp)?;

        Ok(Self {
            id: number(row, 0, "Id")?,
            score: number(row, 1, "Score")?,
            length: number(row, 2, "Snake-Length")?,
            food_eaten: number(row, 3, "Food-Eaten")?,
            time_spent_millis: number(row, 4, "Time-Spent")?,
            moves: number(row, 5, "Moves")?,
            timestamp,
        })
    }

    pub fn time_spent(&self) -> Duration {
        Duration::from_millis(self.time_spent_millis.max(0) as u64)
    }
}

fn clean(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}

fn number<T: FromStr>(row: &StringRecord, idx: usize, field: &'static str) -> Result<T, RecordError> {
    let value = clean(&row[idx]);
    value
        .parse()
        .map_err(|_| RecordError::InvalidNumber { field, value })
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, RecordError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT_MINUTES))
        .map_err(|source| RecordError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}
