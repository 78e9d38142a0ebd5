//! Outbound notification: the single configured webhook.

mod webhook;

pub use webhook::{NotifyError, UpdateKind, WebhookNotifier, WebhookPayload};
