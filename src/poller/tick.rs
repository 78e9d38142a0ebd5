//! The poll tick: the roster-diff-and-capacity state machine.
//!
//! Each tick runs the same pipeline: load state, fetch recent messages,
//! locate the signup embed, extract + normalize the roster, short-circuit if
//! nothing changed, otherwise diff, recompute grids, notify, and persist.
//!
//! The decision logic lives in [`plan_tick`], a pure function from (previous
//! state, observed signup) to a [`TickPlan`]; [`run_tick`] only wires I/O
//! around it. That keeps every branch of the state machine testable without
//! a network.
//!
//! # Invariants
//!
//! - A tick that fails upstream performs no state mutation at all; the state
//!   file is left byte-for-byte unchanged.
//! - The new-event notification fires exactly once per event identity: it is
//!   sent on the tick that replaces the record, and subsequent ticks see the
//!   stored identity match.
//! - Downstream failures (webhook, status edit) are logged and never prevent
//!   the snapshot write.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::capacity::resolve_grid_count;
use crate::config::Config;
use crate::diff::diff;
use crate::discord::{find_signup_message, DiscordApiError, DiscordClient};
use crate::extract::extract_roster;
use crate::notify::{UpdateKind, WebhookNotifier, WebhookPayload};
use crate::persistence::{load_or_default, save_state_atomic, PersistedEventState, StateError};
use crate::status::format_status_message;
use crate::types::{MessageId, Roster};

/// How many recent messages to scan for the signup embed.
pub const RECENT_MESSAGE_WINDOW: u8 = 20;

/// Errors that abort a tick.
///
/// Downstream (webhook/status) failures are not here: they are best-effort
/// and only logged.
#[derive(Debug, Error)]
pub enum TickError {
    /// Upstream read failed; the tick is skipped and state is untouched.
    #[error("discord error: {0}")]
    Discord(#[from] DiscordApiError),

    /// Persisting the new record failed.
    #[error("state error: {0}")]
    State(#[from] StateError),
}

/// Result type for tick operations.
pub type Result<T> = std::result::Result<T, TickError>;

/// What a tick concluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// No recognized signup embed in the recent-message window.
    NoEvent,

    /// Same event, same roster; nothing to do.
    Unchanged,

    /// A new event identity was detected and the record was replaced.
    NewEvent { driver_count: usize, grids: u32 },

    /// The roster changed within the same event.
    RosterChanged {
        driver_count: usize,
        grids: u32,
        added: Vec<String>,
        removed: Vec<String>,
    },
}

/// The signup message as observed this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupSnapshot {
    pub message_id: MessageId,
    pub roster: Roster,
}

/// Everything a tick decided, before any side effect runs.
#[derive(Debug)]
pub struct TickPlan {
    pub outcome: TickOutcome,
    /// The record to persist; `None` means the tick mutates nothing.
    pub state: Option<PersistedEventState>,
    /// The webhook payload to deliver, if any.
    pub notification: Option<WebhookPayload>,
}

/// SHA-256 over the normalized roster, newline-joined.
///
/// If the fingerprint matches the stored one for the same event, the tick
/// skips all downstream work.
pub fn roster_fingerprint(roster: &Roster) -> String {
    let mut hasher = Sha256::new();
    for (i, name) in roster.iter().enumerate() {
        if i > 0 {
            hasher.update(b"\n");
        }
        hasher.update(name.as_str().as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Decides what a tick should do. Pure.
pub fn plan_tick(
    config: &Config,
    now: DateTime<Utc>,
    previous: &PersistedEventState,
    observed: SignupSnapshot,
) -> TickPlan {
    let fingerprint = roster_fingerprint(&observed.roster);
    let same_event = previous.event_id.as_ref() == Some(&observed.message_id);

    if same_event && fingerprint == previous.roster_hash {
        return TickPlan {
            outcome: TickOutcome::Unchanged,
            state: None,
            notification: None,
        };
    }

    if !same_event {
        return plan_new_event(config, now, previous, observed, fingerprint);
    }

    plan_roster_update(config, now, previous, observed, fingerprint)
}

/// New event identity: replace the record wholesale, clear the lock, fire the
/// reset notification.
fn plan_new_event(
    config: &Config,
    now: DateTime<Utc>,
    previous: &PersistedEventState,
    observed: SignupSnapshot,
    fingerprint: String,
) -> TickPlan {
    let driver_count = observed.roster.len();
    let grids = config.grid.grid_count(driver_count);
    let drivers = observed.roster.as_strings();

    let mut state = PersistedEventState {
        event_id: Some(observed.message_id),
        roster: observed.roster,
        grid_count: grids,
        roster_hash: fingerprint,
        grids_locked: None,
        reset_notified: true,
        // The bot's own status message outlives individual events.
        status_message_id: previous.status_message_id.clone(),
        updated_at: now,
        ..PersistedEventState::default()
    };
    state.record_change(now, format!("New event tracked ({driver_count} drivers)"));

    TickPlan {
        outcome: TickOutcome::NewEvent {
            driver_count,
            grids,
        },
        notification: Some(WebhookPayload {
            kind: UpdateKind::NewEvent,
            driver_count,
            added: drivers.clone(),
            removed: Vec::new(),
            drivers,
            grids,
            timestamp: now,
        }),
        state: Some(state),
    }
}

/// Same event, changed fingerprint: diff and recompute.
fn plan_roster_update(
    config: &Config,
    now: DateTime<Utc>,
    previous: &PersistedEventState,
    observed: SignupSnapshot,
    fingerprint: String,
) -> TickPlan {
    let changes = diff(&previous.roster, &observed.roster);
    let driver_count = observed.roster.len();

    let (grids, lock) = resolve_grid_count(
        &config.grid,
        driver_count,
        previous.grids_locked,
        config.lock_weekday,
        now.weekday(),
        previous.grid_count,
    );

    let mut state = previous.clone();
    state.roster = observed.roster;
    state.roster_hash = fingerprint;
    state.grid_count = grids;
    state.grids_locked = lock;
    state.updated_at = now;
    for name in &changes.added {
        state.record_change(now, format!("+ {name}"));
    }
    for name in &changes.removed {
        state.record_change(now, format!("- {name}"));
    }

    // A reorder or duplicate-count change moves the fingerprint without
    // moving the name sets. Persist the new fingerprint, notify nobody.
    if changes.is_empty() {
        return TickPlan {
            outcome: TickOutcome::Unchanged,
            state: Some(state),
            notification: None,
        };
    }

    let added: Vec<String> = changes.added.iter().map(|n| n.to_string()).collect();
    let removed: Vec<String> = changes.removed.iter().map(|n| n.to_string()).collect();

    TickPlan {
        outcome: TickOutcome::RosterChanged {
            driver_count,
            grids,
            added: added.clone(),
            removed: removed.clone(),
        },
        notification: Some(WebhookPayload {
            kind: UpdateKind::RosterUpdate,
            driver_count,
            drivers: state.roster.as_strings(),
            added,
            removed,
            grids,
            timestamp: now,
        }),
        state: Some(state),
    }
}

/// Runs one full tick against the real collaborators.
pub async fn run_tick(
    config: &Config,
    discord: &DiscordClient,
    notifier: Option<&WebhookNotifier>,
) -> Result<TickOutcome> {
    let state_file = config.state_file();
    let previous = load_or_default(&state_file);

    // Any upstream failure propagates here, before any mutation.
    let messages = discord.recent_messages(RECENT_MESSAGE_WINDOW).await?;

    let Some((message, embed)) = find_signup_message(&messages) else {
        debug!("no signup embed in the recent-message window");
        return Ok(TickOutcome::NoEvent);
    };

    let observed = SignupSnapshot {
        message_id: message.id.clone(),
        roster: extract_roster(embed),
    };

    let plan = plan_tick(config, Utc::now(), &previous, observed);

    if let Some(payload) = &plan.notification {
        match notifier {
            Some(notifier) => {
                if let Err(e) = notifier.send(payload).await {
                    warn!(error = %e, "webhook delivery failed");
                }
            }
            None => debug!("no webhook configured, skipping notification"),
        }
    }

    let Some(mut next) = plan.state else {
        return Ok(plan.outcome);
    };

    if config.publish_status {
        publish_status(config, discord, &mut next).await;
    }

    save_state_atomic(&state_file, &next)?;
    info!(outcome = ?plan.outcome, "tick persisted");

    Ok(plan.outcome)
}

/// Edits (or first creates) the Discord status message. Best-effort.
async fn publish_status(config: &Config, discord: &DiscordClient, state: &mut PersistedEventState) {
    let body = format_status_message(state, &config.grid);
    let target = config
        .status_message_id
        .clone()
        .or_else(|| state.status_message_id.clone());

    match target {
        Some(id) => {
            if let Err(e) = discord.edit_message(&id, &body).await {
                warn!(message_id = %id, error = %e, "status message edit failed");
            }
        }
        None => match discord.create_message(&body).await {
            Ok(message) => {
                info!(message_id = %message.id, "created status message");
                state.status_message_id = Some(message.id);
            }
            Err(e) => warn!(error = %e, "status message creation failed"),
        },
    }
}
