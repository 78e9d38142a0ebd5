//! The persisted poll state: one JSON record, read-modify-written per tick.
//!
//! # File format
//!
//! A single `state.json` under the configured state directory. There is one
//! writer (the tick guard serializes ticks), so no multi-record transaction
//! machinery is needed. Writes are still atomic (write-to-temp, fsync,
//! rename, fsync directory) so readers and crash recovery always see either
//! the old record or the new one, never a partial write.
//!
//! # Invariant
//!
//! The stored roster always reflects exactly the last set of names that was
//! diffed and acted upon. A tick that fails before its downstream work never
//! writes, leaving the file byte-for-byte unchanged.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::fsync::{fsync_dir, fsync_file};
use crate::types::{MessageId, Roster};

/// Current schema version. Increment on breaking record changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Cap on journal entries kept in the record (oldest dropped first).
pub const MAX_JOURNAL_ENTRIES: usize = 25;

/// Errors that can occur during state store operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema version mismatch.
    #[error("schema version mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: u32, got: u32 },
}

/// Result type for state store operations.
pub type Result<T> = std::result::Result<T, StateError>;

/// One line of the rolling change journal shown in the status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub at: DateTime<Utc>,
    pub line: String,
}

/// The persisted state record.
///
/// Created on the first successful poll, replaced wholesale when a new event
/// identity is detected, incrementally updated otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEventState {
    /// Schema version for forward-compatible migrations.
    pub schema_version: u32,

    /// The tracked signup message; `None` until the first event is seen.
    pub event_id: Option<MessageId>,

    /// The last roster that was diffed and acted upon (normalized names).
    pub roster: Roster,

    /// The last computed grid count.
    pub grid_count: u32,

    /// SHA-256 over the normalized roster, used to skip no-op ticks.
    pub roster_hash: String,

    /// When set, the grid count is frozen at this value until a new event.
    pub grids_locked: Option<u32>,

    /// One-shot: the new-event notification for `event_id` has been fired.
    pub reset_notified: bool,

    /// Status message created by the bot, if any (edited on later ticks).
    pub status_message_id: Option<MessageId>,

    /// Rolling change journal, newest last, bounded by [`MAX_JOURNAL_ENTRIES`].
    pub journal: Vec<JournalEntry>,

    /// When this record was last written.
    pub updated_at: DateTime<Utc>,
}

impl PersistedEventState {
    /// Appends a journal line, dropping the oldest entries beyond the cap.
    pub fn record_change(&mut self, at: DateTime<Utc>, line: impl Into<String>) {
        self.journal.push(JournalEntry {
            at,
            line: line.into(),
        });
        if self.journal.len() > MAX_JOURNAL_ENTRIES {
            let excess = self.journal.len() - MAX_JOURNAL_ENTRIES;
            self.journal.drain(..excess);
        }
    }
}

impl Default for PersistedEventState {
    fn default() -> Self {
        PersistedEventState {
            schema_version: SCHEMA_VERSION,
            event_id: None,
            roster: Roster::new(),
            grid_count: 0,
            roster_hash: String::new(),
            grids_locked: None,
            reset_notified: false,
            status_message_id: None,
            journal: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Saves the state record atomically.
///
/// Write-to-temp-then-rename: readers always see either the old or the new
/// record. The parent directory is created if missing.
pub fn save_state_atomic(path: &Path, state: &PersistedEventState) -> Result<()> {
    use std::fs::OpenOptions;
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(state)?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(&bytes)?;
        fsync_file(&file)?;
    }

    std::fs::rename(&tmp_path, path)?;

    if let Some(parent) = path.parent() {
        fsync_dir(parent)?;
    }

    Ok(())
}

/// Loads the state record, failing on missing file, bad JSON, or wrong schema.
pub fn load_state(path: &Path) -> Result<PersistedEventState> {
    let bytes = std::fs::read(path)?;
    let state: PersistedEventState = serde_json::from_slice(&bytes)?;

    if state.schema_version != SCHEMA_VERSION {
        return Err(StateError::SchemaMismatch {
            expected: SCHEMA_VERSION,
            got: state.schema_version,
        });
    }

    Ok(state)
}

/// Loads the state record, returning `None` if the file doesn't exist.
///
/// Other errors (malformed JSON, schema mismatch) are propagated.
pub fn try_load_state(path: &Path) -> Result<Option<PersistedEventState>> {
    match load_state(path) {
        Ok(state) => Ok(Some(state)),
        Err(StateError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Loads the state record, falling back to the default on any failure.
///
/// An unreadable or corrupt store must never kill the poll loop: the failure
/// is logged and polling continues from a fresh record.
pub fn load_or_default(path: &Path) -> PersistedEventState {
    match try_load_state(path) {
        Ok(Some(state)) => state,
        Ok(None) => PersistedEventState::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "state file unreadable, starting from default record");
            PersistedEventState::default()
        }
    }
}
