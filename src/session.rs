//! One user's working session: the composer plus its history

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::composer::Composer;
use crate::error::CommitError;
use crate::history::{apply_to_composer, HistoryStore};
use crate::model::{Field, HistoryEntry, SessionSnapshot};
use crate::storage::KeyValueStore;

pub struct Session {
    pub composer: Composer,
    pub history: HistoryStore,
}

impl Session {
    /// Starts a session with an empty form and the persisted history
    pub fn start(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            composer: Composer::new(),
            history: HistoryStore::load(store),
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.composer.set_field(field, value);
    }

    /// Records the current generated URL once the caller has copied it
    pub fn commit(&mut self) -> Result<HistoryEntry, CommitError> {
        let url = self.composer.generated_url().to_string();
        if !url.starts_with("http") {
            return Err(CommitError::NothingToCommit);
        }

        self.history
            .record(&url)
            .cloned()
            .ok_or(CommitError::NothingToCommit)
    }

    /// Loads the form from the history entry at `index`
    ///
    /// Returns `false` when there is no such entry. An entry whose URL no
    /// longer parses leaves the form untouched.
    pub fn select_history(&mut self, index: usize) -> bool {
        let Some(entry) = self.history.get(index) else {
            return false;
        };

        if let Some(fields) = apply_to_composer(entry) {
            debug!(index, "restoring form from history");
            self.composer.apply(fields);
        }
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            fields: self.composer.fields().clone(),
            errors: self.composer.errors().clone(),
            generated_url: self.composer.generated_url().to_string(),
            missing_required: self.composer.missing_required(),
            history: self.history.entries().to_vec(),
        }
    }
}

/// Application state shared across all request handlers
///
/// There is one logical actor (the user behind the UI), so a plain mutex
/// around the whole session serializes every mutation and its persist.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::start(store))),
        }
    }

    /// Locks the session; a panic in an earlier holder does not lock the user out
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
