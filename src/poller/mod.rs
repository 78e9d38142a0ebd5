//! Polling: the per-tick state machine and the interval worker driving it.
//!
//! Ticks are serialized through [`TickRunner`]: the interval worker and the
//! HTTP trigger share one runner, and a trigger arriving while a tick is
//! already in flight is skipped rather than queued.

mod tick;
mod worker;

pub use tick::{
    plan_tick, roster_fingerprint, run_tick, SignupSnapshot, TickError, TickOutcome, TickPlan,
    RECENT_MESSAGE_WINDOW,
};
pub use worker::run_poll_worker;

use tokio::sync::Mutex;
use tracing::info;

use crate::config::Config;
use crate::discord::DiscordClient;
use crate::notify::WebhookNotifier;

/// Owns the tick collaborators and serializes tick execution.
#[derive(Debug)]
pub struct TickRunner {
    config: Config,
    discord: DiscordClient,
    notifier: Option<WebhookNotifier>,
    running: Mutex<()>,
}

impl TickRunner {
    pub fn new(config: Config, discord: DiscordClient, notifier: Option<WebhookNotifier>) -> Self {
        Self {
            config,
            discord,
            notifier,
            running: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one tick unless one is already in flight, in which case `None`.
    pub async fn try_tick(&self) -> Option<tick::Result<TickOutcome>> {
        let Ok(_lease) = self.running.try_lock() else {
            info!("tick already in flight, skipping trigger");
            return None;
        };
        Some(run_tick(&self.config, &self.discord, self.notifier.as_ref()).await)
    }
}
