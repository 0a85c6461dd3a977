//! Background owner of the [`SessionStore`].
//!
//! All store mutations are serialized through one channel and applied on a
//! blocking task. Readers never touch the store: they watch the
//! [`StoreSnapshot`] republished after every command.

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

use super::record::SessionRecord;
use super::store::SessionStore;
use crate::metrics::UserAnalytics;

#[derive(Debug)]
pub enum StoreCommand {
    Load,
    Append(SessionRecord),
    Clear,
    Shutdown,
}

/// What the UI may show about the history at a given moment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// False until the start-up load has finished
    pub loaded: bool,
    pub session_count: usize,
    pub analytics: Option<UserAnalytics>,
    /// Id of the most recently written session
    pub last_id: Option<u64>,
}

impl StoreSnapshot {
    fn of(store: &SessionStore, last_id: Option<u64>) -> Self {
        Self {
            loaded: store.is_loaded(),
            session_count: store.records().len(),
            analytics: store.analytics(),
            last_id,
        }
    }

    /// Analytics to display; zeros when nothing is loaded or recorded yet
    pub fn analytics_or_default(&self) -> UserAnalytics {
        self.analytics.unwrap_or_default()
    }
}

/// Cheap, cloneable handle for queueing store commands.
///
/// Sending never blocks and never fails the caller.
#[derive(Debug, Clone)]
pub struct SessionSubmitter {
    tx: mpsc::UnboundedSender<StoreCommand>,
}

impl SessionSubmitter {
    /// Queue a finished session for writing
    pub fn submit(&self, record: SessionRecord) {
        self.send(StoreCommand::Append(record));
    }

    pub fn request_load(&self) {
        self.send(StoreCommand::Load);
    }

    pub fn request_clear(&self) {
        self.send(StoreCommand::Clear);
    }

    fn send(&self, command: StoreCommand) {
        if let Err(e) = self.tx.send(command) {
            warn!(command = ?e.0, "session worker is gone, dropping command");
        }
    }
}

pub struct SessionWorker {
    submitter: SessionSubmitter,
    snapshot: watch::Receiver<StoreSnapshot>,
    handle: JoinHandle<SessionStore>,
}

impl SessionWorker {
    /// Start the worker on the tokio blocking pool.
    ///
    /// A `Load` is queued before anything else, so sessions submitted
    /// while the history is still loading get ids after the existing ones.
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: SessionStore) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot) = watch::channel(StoreSnapshot::default());

        let submitter = SessionSubmitter { tx };
        submitter.request_load();

        let handle = tokio::task::spawn_blocking(move || run(store, rx, snapshot_tx));

        Self {
            submitter,
            snapshot,
            handle,
        }
    }

    pub fn submitter(&self) -> SessionSubmitter {
        self.submitter.clone()
    }

    pub fn snapshot(&self) -> watch::Receiver<StoreSnapshot> {
        self.snapshot.clone()
    }

    /// Stop after every command queued so far has been applied, and hand
    /// the store back
    pub async fn shutdown(self) -> Result<SessionStore, JoinError> {
        self.submitter.send(StoreCommand::Shutdown);
        self.handle.await
    }
}

fn run(
    mut store: SessionStore,
    mut rx: mpsc::UnboundedReceiver<StoreCommand>,
    snapshot_tx: watch::Sender<StoreSnapshot>,
) -> SessionStore {
    let mut last_id = None;

    while let Some(command) = rx.blocking_recv() {
        match command {
            StoreCommand::Load => {
                if let Err(e) = store.load_all() {
                    error!(path = %store.path().display(), error = %e, "failed to load session history");
                }
            }
            StoreCommand::Append(record) => match store.append(record) {
                Ok(id) => last_id = Some(id),
                Err(e) => {
                    error!(path = %store.path().display(), error = %e, "failed to write session")
                }
            },
            StoreCommand::Clear => {
                if let Err(e) = store.clear() {
                    error!(path = %store.path().display(), error = %e, "failed to clear session history");
                } else {
                    last_id = None;
                }
            }
            StoreCommand::Shutdown => break,
        }

        snapshot_tx.send_replace(StoreSnapshot::of(&store, last_id));
    }

    info!("session worker stopped");
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn candidate(length: usize, moves: i32) -> SessionRecord {
        SessionRecord::from_game(length, moves, Duration::from_millis(5000))
    }

    #[tokio::test]
    async fn test_worker_writes_in_submission_order() {
        let dir = TempDir::new().unwrap();
        let worker = SessionWorker::spawn(SessionStore::new(dir.path().join("s.csv")));
        let submitter = worker.submitter();

        submitter.submit(candidate(3, 10));
        submitter.submit(candidate(7, 4));

        let store = worker.shutdown().await.unwrap();
        let ids: Vec<u64> = store.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1]);

        let analytics = store.analytics().unwrap();
        assert_eq!(analytics.total_games, 2);
        assert_eq!(analytics.total_moves, 14);
        assert_eq!(analytics.average_length, 5);
    }

    #[tokio::test]
    async fn test_snapshot_tracks_load_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.csv");
        let mut seed = SessionStore::new(&path);
        seed.append(candidate(2, 2)).unwrap();

        let worker = SessionWorker::spawn(SessionStore::new(&path));
        let mut snapshot = worker.snapshot();

        worker.submitter().submit(candidate(4, 6));
        let latest = *snapshot
            .wait_for(|s| s.session_count == 2)
            .await
            .unwrap();

        assert!(latest.loaded);
        assert_eq!(latest.last_id, Some(1));
        assert_eq!(latest.analytics_or_default().longest_length, 4);

        worker.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_resets_snapshot() {
        let dir = TempDir::new().unwrap();
        let worker = SessionWorker::spawn(SessionStore::new(dir.path().join("s.csv")));
        let submitter = worker.submitter();
        let mut snapshot = worker.snapshot();

        submitter.submit(candidate(3, 1));
        snapshot.wait_for(|s| s.session_count == 1).await.unwrap();

        submitter.request_clear();
        let cleared = *snapshot.wait_for(|s| s.session_count == 0).await.unwrap();
        assert_eq!(cleared.analytics, None);
        assert_eq!(cleared.analytics_or_default(), UserAnalytics::default());

        let store = worker.shutdown().await.unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap().lines().count(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_does_not_stop_worker() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();
        let worker = SessionWorker::spawn(SessionStore::new(blocker.join("s.csv")));
        let submitter = worker.submitter();

        submitter.submit(candidate(3, 1));
        submitter.submit(candidate(4, 1));

        let store = worker.shutdown().await.unwrap();
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_ignored() {
        let dir = TempDir::new().unwrap();
        let worker = SessionWorker::spawn(SessionStore::new(dir.path().join("s.csv")));
        let submitter = worker.submitter();

        worker.shutdown().await.unwrap();
        submitter.submit(candidate(1, 1));
    }
}
