//! The background interval worker.
//!
//! Fires a tick every `poll_interval` until cancelled. The first tick runs
//! immediately on startup so a restart does not wait a full interval to catch
//! up with the channel.

use std::sync::Arc;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::TickRunner;

/// Drives periodic ticks until `cancel` fires.
pub async fn run_poll_worker(runner: Arc<TickRunner>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(runner.config().poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        interval_secs = runner.config().poll_interval.as_secs(),
        "poll worker started"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("poll worker shutting down");
                return;
            }
            _ = interval.tick() => {
                match runner.try_tick().await {
                    Some(Ok(outcome)) => debug!(?outcome, "scheduled tick finished"),
                    Some(Err(e)) => warn!(error = %e, "scheduled tick failed"),
                    // An HTTP trigger beat us to it.
                    None => {}
                }
            }
        }
    }
}
