//! Flat-file session history.
//!
//! The store owns the in-memory record cache and the analytics derived from
//! it. It is not shared: concurrent callers go through
//! [`SessionWorker`](super::SessionWorker), which owns the only instance.

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::record::{CSV_HEADER, SessionRecord};
use crate::metrics::UserAnalytics;

/// Default history location, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "data/snakeData.csv";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    records: Vec<SessionRecord>,
    analytics: Option<UserAnalytics>,
    loaded: bool,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            analytics: None,
            loaded: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    /// Analytics over the cached records, `None` while there are none
    pub fn analytics(&self) -> Option<UserAnalytics> {
        self.analytics
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the cache with everything in the history file.
    ///
    /// A missing file is an empty history. Rows that fail to parse are
    /// logged and skipped.
    pub fn load_all(&mut self) -> Result<Vec<SessionRecord>, StoreError> {
        self.records.clear();
        self.analytics = None;

        if !self.path.exists() {
            warn!(path = %self.path.display(), "session file does not exist");
            self.loaded = true;
            return Ok(Vec::new());
        }

        // Nothing partial stays cached if the file stops reading midway
        if let Err(e) = self.read_rows() {
            self.records.clear();
            self.loaded = false;
            return Err(e);
        }

        self.loaded = true;
        self.recompute();
        info!(
            path = %self.path.display(),
            sessions = self.records.len(),
            "session history loaded"
        );
        Ok(self.records.clone())
    }

    /// Persist `record` under the next free id and return that id.
    ///
    /// The cache only changes once the row is durably written, so a failed
    /// append leaves both file and cache as they were.
    pub fn append(&mut self, record: SessionRecord) -> Result<u64, StoreError> {
        if !self.loaded {
            self.load_all()?;
        }

        let id = self.next_id();
        let record = record.with_id(id);
        self.write_row(&record)?;

        info!(id, score = record.score, "session written");
        self.records.push(record);
        self.recompute();
        Ok(id)
    }

    /// Drop every session, keeping only the header line of the file
    pub fn clear(&mut self) -> Result<(), StoreError> {
        if self.path.exists() {
            let header = self.read_header()?;
            match header {
                Some(header) => {
                    fs::write(&self.path, format!("{header}\n"))
                        .map_err(|e| StoreError::io(&self.path, e))?;
                    info!(path = %self.path.display(), "cleared session data");
                }
                None => warn!(path = %self.path.display(), "session file was empty, nothing to clear"),
            }
        } else {
            warn!(path = %self.path.display(), "session file does not exist, nothing to clear");
        }

        self.records.clear();
        self.analytics = None;
        self.loaded = true;
        Ok(())
    }

    fn read_rows(&mut self) -> Result<(), StoreError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        for (idx, row) in reader.records().enumerate() {
            // +2: one for the header, one for 1-based line numbers
            let line = idx + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(error) => {
                    warn!(line, %error, "skipping unreadable session row");
                    continue;
                }
            };

            match SessionRecord::from_csv_row(&row) {
                Ok(record) => self.records.push(record),
                Err(error) => warn!(line, %error, "skipping malformed session row"),
            }
        }
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.records
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(0, |max| max + 1)
    }

    fn recompute(&mut self) {
        self.analytics = UserAnalytics::aggregate(&self.records);
        if self.analytics.is_none() {
            warn!("no session data available to calculate analytics");
        }
    }

    fn read_header(&self) -> Result<Option<String>, StoreError> {
        let file = File::open(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let mut first = String::new();
        let read = BufReader::new(file)
            .read_line(&mut first)
            .map_err(|e| StoreError::io(&self.path, e))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(first.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn write_row(&self, record: &SessionRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let needs_header = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .flexible(true)
            .from_writer(file);
        if needs_header {
            writer.write_record(CSV_HEADER)?;
            info!(path = %self.path.display(), "header written to new session file");
        }
        writer.write_record(record.to_csv_row())?;

        let mut file = writer
            .into_inner()
            .map_err(|e| StoreError::io(&self.path, io::Error::other(e.to_string())))?;
        file.flush().map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn candidate(length: usize, moves: i32, millis: u64) -> SessionRecord {
        SessionRecord::from_game(length, moves, Duration::from_millis(millis))
    }

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("data").join("snakeData.csv"))
    }

    #[test]
    fn test_sequential_ids_and_analytics() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        assert_eq!(store.append(candidate(3, 10, 5000)).unwrap(), 0);
        assert_eq!(store.append(candidate(7, 4, 8000)).unwrap(), 1);

        let analytics = store.analytics().unwrap();
        assert_eq!(analytics.total_games, 2);
        assert_eq!(analytics.total_moves, 14);
        assert_eq!(analytics.average_length, 5);
    }

    #[test]
    fn test_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(candidate(3, 10, 5000)).unwrap();
        store.append(candidate(1, 2, 700)).unwrap();
        let written = store.records().to_vec();

        let mut reopened = store_in(&dir);
        let loaded = reopened.load_all().unwrap();

        assert_eq!(loaded, written);
        assert_eq!(reopened.analytics(), store.analytics());
        assert_eq!(reopened.append(candidate(2, 2, 10)).unwrap(), 2);
    }

    #[test]
    fn test_append_loads_existing_history_first() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(candidate(3, 10, 5000)).unwrap();

        let mut fresh = store_in(&dir);
        assert!(!fresh.is_loaded());
        assert_eq!(fresh.append(candidate(1, 1, 1)).unwrap(), 1);
        assert_eq!(fresh.records().len(), 2);
    }

    #[test]
    fn test_new_file_has_header_and_quoted_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(candidate(3, 10, 5000)).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"Id\",\"Score\",\"Snake-Length\",\"Food-Eaten\",\"Time-Spent\",\"Moves\",\"Date\""
        );
        assert!(lines.next().unwrap().starts_with("\"0\",\"3\",\"3\",\"3\",\"5000\",\"10\",\""));
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        assert!(store.load_all().unwrap().is_empty());
        assert!(store.analytics().is_none());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(
            &path,
            "\"Id\",\"Score\",\"Snake-Length\",\"Food-Eaten\",\"Time-Spent\",\"Moves\"\n\
             \"0\",\"3\",\"3\",\"3\",\"5000\",\"10\",\"2025-01-05T14:03:22.120\"\n\
             \"1\",\"oops\",\"3\",\"3\",\"5000\",\"10\",\"2025-01-05T14:03:22\"\n\
             \"2\",\"4\",\"4\"\n\
             \"3\",\"5\",\"5\",\"5\",\"6000\",\"12\",\"2025-01-06T09:00:00\"\n",
        )
        .unwrap();

        let mut store = SessionStore::new(&path);
        let loaded = store.load_all().unwrap();

        assert_eq!(loaded.iter().map(|r| r.id).collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(store.analytics().unwrap().total_games, 2);
        assert_eq!(store.append(candidate(1, 1, 1)).unwrap(), 4);
    }

    #[test]
    fn test_clear_keeps_header() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(candidate(3, 10, 5000)).unwrap();
        store.append(candidate(4, 11, 5000)).unwrap();

        store.clear().unwrap();

        assert!(store.records().is_empty());
        assert!(store.analytics().is_none());
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("\"Id\""));

        assert_eq!(store.append(candidate(1, 1, 1)).unwrap(), 0);
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_clear_without_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.clear().unwrap();

        assert!(!store.path().exists());
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_failed_append_keeps_cache() {
        let dir = TempDir::new().unwrap();
        // A regular file where the data directory should be makes the write fail
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();
        let mut store = SessionStore::new(blocker.join("snakeData.csv"));

        assert!(store.append(candidate(3, 10, 5000)).is_err());
        assert!(store.records().is_empty());
        assert!(store.analytics().is_none());
    }

    #[test]
    fn test_failed_append_keeps_earlier_sessions() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(candidate(3, 10, 5000)).unwrap();
        let before = store.analytics();

        // Move the data directory aside and block its path with a file
        let data = dir.path().join("data");
        let aside = dir.path().join("aside");
        fs::rename(&data, &aside).unwrap();
        fs::write(&data, "not a directory").unwrap();

        assert!(store.append(candidate(7, 4, 8000)).is_err());
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.records()[0].id, 0);
        assert_eq!(store.analytics(), before);

        fs::remove_file(&data).unwrap();
        fs::rename(&aside, &data).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);

        let mut reopened = store_in(&dir);
        assert_eq!(reopened.load_all().unwrap(), store.records().to_vec());
        assert_eq!(store.append(candidate(7, 4, 8000)).unwrap(), 1);
    }

    #[test]
    fn test_unreadable_history_leaves_cache_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(candidate(3, 10, 5000)).unwrap();

        // A directory in place of the file fails on the first read
        fs::remove_file(store.path()).unwrap();
        fs::create_dir(store.path()).unwrap();

        assert!(store.load_all().is_err());
        assert!(store.records().is_empty());
        assert!(store.analytics().is_none());
        assert!(!store.is_loaded());
    }
}
