//! State persistence: a single-record JSON store with atomic writes.

pub mod fsync;
pub mod state;

pub use state::{
    JournalEntry, PersistedEventState, Result, StateError, load_or_default, load_state,
    save_state_atomic, try_load_state, MAX_JOURNAL_ENTRIES, SCHEMA_VERSION,
};
