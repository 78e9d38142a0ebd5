//! The manual tick trigger.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use super::AppState;
use crate::poller::TickOutcome;

/// What a trigger request got back.
///
/// Always delivered with HTTP 200: the trigger succeeded in asking for a
/// tick; whether the tick itself succeeded is in the body.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TriggerResponse {
    /// The tick ran; its outcome fields are flattened alongside.
    Completed {
        #[serde(flatten)]
        outcome: TickOutcome,
    },
    /// A tick was already in flight; this trigger did nothing.
    Skipped,
    /// The tick ran and failed.
    Failed { message: String },
}

pub async fn trigger(State(app): State<AppState>) -> Json<TriggerResponse> {
    match app.runner.try_tick().await {
        None => Json(TriggerResponse::Skipped),
        Some(Ok(outcome)) => Json(TriggerResponse::Completed { outcome }),
        Some(Err(e)) => {
            warn!(error = %e, "triggered tick failed");
            Json(TriggerResponse::Failed {
                message: e.to_string(),
            })
        }
    }
}
