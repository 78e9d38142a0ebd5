//! Webhook delivery: one JSON POST per roster change.
//!
//! At-most-once, best-effort. A failed delivery is reported through the
//! `Result` so the caller can log it, but nothing retries and nothing blocks
//! the rest of the tick on it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur delivering a webhook payload.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport-level failure (timeout, DNS, connection).
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("webhook endpoint returned HTTP {0}")]
    Status(u16),
}

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// What kind of update this payload describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// A new event identity was detected; state was reset. Fired exactly
    /// once per event.
    NewEvent,
    /// The roster changed within the same event.
    RosterUpdate,
}

/// The JSON payload posted to the webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub driver_count: usize,
    pub drivers: Vec<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub grids: u32,
    pub timestamp: DateTime<Utc>,
}

/// Posts payloads to the single configured webhook URL.
#[derive(Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Delivers one payload. No retry on failure.
    pub async fn send(&self, payload: &WebhookPayload) -> Result<()> {
        let response = self.http.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URL embeds a credential-bearing token on most webhook services.
        f.debug_struct("WebhookNotifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> WebhookPayload {
        WebhookPayload {
            kind: UpdateKind::RosterUpdate,
            driver_count: 2,
            drivers: vec!["Alice".to_string(), "Bob".to_string()],
            added: vec!["Bob".to_string()],
            removed: vec![],
            grids: 1,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn payload_serializes_with_type_tag() {
        let json = serde_json::to_value(payload()).unwrap();
        assert_eq!(json["type"], "roster_update");
        assert_eq!(json["driver_count"], 2);
        assert_eq!(json["grids"], 1);
        assert_eq!(json["drivers"][1], "Bob");
    }

    #[test]
    fn new_event_kind_serializes_snake_case() {
        let json = serde_json::to_value(WebhookPayload {
            kind: UpdateKind::NewEvent,
            ..payload()
        })
        .unwrap();
        assert_eq!(json["type"], "new_event");
    }

    #[tokio::test]
    async fn send_posts_json() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(reqwest::Client::new(), format!("{}/hook", server.uri()));
        notifier.send(&payload()).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(reqwest::Client::new(), server.uri());
        let err = notifier.send(&payload()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Status(410)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_http_error() {
        // Port 1 should refuse connections.
        let notifier = WebhookNotifier::new(reqwest::Client::new(), "http://127.0.0.1:1/hook");
        let err = notifier.send(&payload()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Http(_)));
    }
}
