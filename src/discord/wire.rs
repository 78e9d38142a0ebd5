//! Wire types for the Discord REST API, reduced to the fields we read.

use serde::{Deserialize, Serialize};

use crate::extract::{is_signup_embed, Embed};
use crate::types::MessageId;

/// A channel message as returned by `GET /channels/{id}/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub embeds: Vec<Embed>,
}

impl Message {
    /// The signup embed carried by this message, if any.
    pub fn signup_embed(&self) -> Option<&Embed> {
        self.embeds.iter().find(|e| is_signup_embed(e))
    }
}

/// Locates the current signup message in a recent-messages listing.
///
/// Discord returns messages newest-first, so the first match is the newest
/// signup embed and wins: a fresh event post supersedes an old one.
pub fn find_signup_message(messages: &[Message]) -> Option<(&Message, &Embed)> {
    messages
        .iter()
        .find_map(|m| m.signup_embed().map(|e| (m, e)))
}

/// Body for message create/edit calls.
#[derive(Debug, Serialize)]
pub struct MessageContent<'a> {
    pub content: &'a str,
}
