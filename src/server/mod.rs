//! The HTTP surface: manual tick trigger, health probe, and state inspection.
//!
//! Three routes, all GET, all JSON except the health probe:
//!
//! - `/` triggers a tick through the shared [`TickRunner`] and reports what
//!   it concluded. Always answers 200; tick failures are reported in the body
//!   so the caller's automation does not confuse "the tick found a problem"
//!   with "the service is down".
//! - `/health` answers `OK` for liveness probes.
//! - `/state` returns the persisted record as stored, or 404 before the
//!   first successful tick.

mod health;
mod state;
mod trigger;

pub use trigger::TriggerResponse;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::poller::TickRunner;

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    runner: Arc<TickRunner>,
}

/// Builds the service router.
pub fn build_router(runner: Arc<TickRunner>) -> Router {
    Router::new()
        .route("/", get(trigger::trigger))
        .route("/health", get(health::health))
        .route("/state", get(state::state))
        .with_state(AppState { runner })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::GridConfig;
    use crate::config::Config;
    use crate::discord::DiscordClient;
    use crate::persistence::{save_state_atomic, PersistedEventState};
    use crate::types::MessageId;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(state_dir: &Path) -> Config {
        Config {
            discord_token: "tok".to_string(),
            channel_id: "424242".into(),
            webhook_url: None,
            state_dir: state_dir.to_path_buf(),
            poll_interval: Duration::from_secs(300),
            grid: GridConfig::DEFAULT,
            lock_weekday: None,
            status_message_id: None,
            publish_status: false,
            http_timeout: Duration::from_secs(5),
            listen_port: 0,
        }
    }

    fn router_for(server: &MockServer, state_dir: &Path) -> Router {
        let discord = DiscordClient::new(reqwest::Client::new(), "tok", "424242".into())
            .with_base_url(server.uri());
        build_router(Arc::new(TickRunner::new(
            test_config(state_dir),
            discord,
            None,
        )))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();

        let response = router_for(&server, dir.path())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn trigger_reports_tick_outcome() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "555", "content": "", "embeds": [{
                    "title": "GT3 Grid",
                    "fields": [{"name": "Drivers", "value": "Alice\nBob"}]
                }]}
            ])))
            .mount(&server)
            .await;

        let (status, json) = get_json(router_for(&server, dir.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["outcome"], "new_event");
        assert_eq!(json["driver_count"], 2);
    }

    #[tokio::test]
    async fn trigger_reports_failure_with_200() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (status, json) = get_json(router_for(&server, dir.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "failed");
        assert!(json["message"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn state_is_404_before_first_tick() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();

        let (status, _) = get_json(router_for(&server, dir.path()), "/state").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn state_returns_the_persisted_record() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();

        let mut record = PersistedEventState::default();
        record.event_id = Some(MessageId::new("777"));
        save_state_atomic(&dir.path().join("state.json"), &record).unwrap();

        let (status, json) = get_json(router_for(&server, dir.path()), "/state").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["event_id"], "777");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();

        let (status, _) = get_json(router_for(&server, dir.path()), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
