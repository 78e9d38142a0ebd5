//! Liveness probe.

/// Answers `OK` as long as the process is serving requests.
pub async fn health() -> &'static str {
    "OK"
}
