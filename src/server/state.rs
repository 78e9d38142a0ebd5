//! State inspection: the persisted record, verbatim.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use super::AppState;
use crate::persistence::try_load_state;

pub async fn state(State(app): State<AppState>) -> Response {
    match try_load_state(&app.runner.config().state_file()) {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "no state recorded yet"})),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to read persisted state");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}
