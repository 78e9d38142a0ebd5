//! Discord API error types.
//!
//! Failures are categorized so callers can decide what a tick should do:
//!
//! - **Transient**: 5xx, 429 rate limits, network timeouts. Skip the tick and
//!   let the next trigger try again.
//! - **Permanent**: other 4xx (bad token, missing permissions, deleted
//!   message). Retrying the same call will not help.
//!
//! No retry happens inside a tick either way; the classification exists for
//! logging and for callers that opt into bounded retry later.

use std::fmt;
use thiserror::Error;

/// The kind of Discord API error, categorized for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscordErrorKind {
    /// Safe to try again on a later tick (5xx, 429, network trouble).
    Transient,

    /// Requires intervention (auth, permissions, nonexistent resources).
    Permanent,
}

impl DiscordErrorKind {
    pub fn is_transient(&self) -> bool {
        matches!(self, DiscordErrorKind::Transient)
    }
}

/// A Discord API error with categorization.
#[derive(Debug, Error)]
pub struct DiscordApiError {
    /// Transient or permanent.
    pub kind: DiscordErrorKind,

    /// The HTTP status code, if the request got that far.
    pub status: Option<u16>,

    /// Human-readable description.
    pub message: String,

    /// The underlying reqwest error, if any.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for DiscordApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "Discord API error (HTTP {}): {}", code, self.message),
            None => write!(f, "Discord API error: {}", self.message),
        }
    }
}

impl DiscordApiError {
    /// Classifies a non-success HTTP status.
    ///
    /// 429 and 5xx are transient; everything else in 4xx is permanent.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = if status == 429 || status >= 500 {
            DiscordErrorKind::Transient
        } else {
            DiscordErrorKind::Permanent
        };
        Self {
            kind,
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    /// Classifies a transport-level reqwest failure.
    ///
    /// Timeouts, connection failures, and errors while dispatching the
    /// request are transient; anything else (body decoding and the like) is
    /// permanent.
    pub fn from_reqwest(source: reqwest::Error) -> Self {
        let kind = if source.is_timeout() || source.is_connect() || source.is_request() {
            DiscordErrorKind::Transient
        } else {
            DiscordErrorKind::Permanent
        };
        let status = source.status().map(|s| s.as_u16());
        Self {
            kind,
            status,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Whether waiting for the next tick could plausibly fix this.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        for status in [500, 502, 503, 504] {
            let err = DiscordApiError::from_status(status, "upstream sad");
            assert!(err.is_transient(), "status {status}");
        }
    }

    #[test]
    fn rate_limit_is_transient() {
        assert!(DiscordApiError::from_status(429, "slow down").is_transient());
    }

    #[test]
    fn client_errors_are_permanent() {
        for status in [400, 401, 403, 404] {
            let err = DiscordApiError::from_status(status, "our fault");
            assert!(!err.is_transient(), "status {status}");
        }
    }

    #[test]
    fn display_includes_status() {
        let err = DiscordApiError::from_status(503, "maintenance");
        assert_eq!(format!("{err}"), "Discord API error (HTTP 503): maintenance");
    }
}
