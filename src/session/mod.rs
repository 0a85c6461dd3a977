//! Finished-game records and their persistence.

pub mod record;
pub mod store;
pub mod worker;

pub use record::{CSV_HEADER, RecordError, SessionRecord};
pub use store::{DEFAULT_DATA_FILE, SessionStore, StoreError};
pub use worker::{SessionSubmitter, SessionWorker, StoreCommand, StoreSnapshot};
