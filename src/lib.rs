//! Watches a Discord channel for a signup embed, tracks the roster it
//! carries, and fans out changes.
//!
//! The service polls the channel on an interval (and on demand over HTTP),
//! extracts the driver roster from the newest recognizable signup embed,
//! diffs it against the persisted record, buckets drivers into fixed-size
//! grids, and on change posts a JSON payload to a webhook and refreshes a
//! status message in the channel. All state lives in a single atomically
//! written JSON file, so a restart picks up exactly where the last tick
//! left off.

pub mod capacity;
pub mod config;
pub mod diff;
pub mod discord;
pub mod extract;
pub mod notify;
pub mod persistence;
pub mod poller;
pub mod server;
pub mod status;
pub mod types;
