//! Reqwest client wrapper scoped to a single Discord channel.
//!
//! All reads and writes target the one configured channel, so the channel ID
//! lives in the client rather than in every call site. Every call returns an
//! explicit `Result` with a categorized error; nothing retries internally.

use reqwest::header::AUTHORIZATION;

use super::error::DiscordApiError;
use super::wire::{Message, MessageContent};
use crate::types::{ChannelId, MessageId};

/// Result type for Discord API operations.
pub type Result<T> = std::result::Result<T, DiscordApiError>;

/// Discord REST API base URL.
const DEFAULT_BASE_URL: &str = "https://discord.com/api/v10";

/// A Discord REST client scoped to a specific channel.
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    channel: ChannelId,
}

impl DiscordClient {
    /// Creates a client for the given bot token and channel.
    pub fn new(http: reqwest::Client, token: impl Into<String>, channel: ChannelId) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            channel,
        }
    }

    /// Overrides the API base URL. Intended for tests against a local mock.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the channel this client is scoped to.
    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    fn messages_url(&self) -> String {
        format!("{}/channels/{}/messages", self.base_url, self.channel)
    }

    fn message_url(&self, id: &MessageId) -> String {
        format!("{}/{}", self.messages_url(), id)
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Fetches the most recent messages in the channel, newest first.
    pub async fn recent_messages(&self, limit: u8) -> Result<Vec<Message>> {
        let response = self
            .http
            .get(self.messages_url())
            .query(&[("limit", limit.to_string())])
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(DiscordApiError::from_reqwest)?;

        Self::check(response).await?.json().await.map_err(DiscordApiError::from_reqwest)
    }

    /// Fetches a single message by ID.
    pub async fn get_message(&self, id: &MessageId) -> Result<Message> {
        let response = self
            .http
            .get(self.message_url(id))
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(DiscordApiError::from_reqwest)?;

        Self::check(response).await?.json().await.map_err(DiscordApiError::from_reqwest)
    }

    /// Posts a new message to the channel.
    pub async fn create_message(&self, content: &str) -> Result<Message> {
        let response = self
            .http
            .post(self.messages_url())
            .header(AUTHORIZATION, self.auth_header())
            .json(&MessageContent { content })
            .send()
            .await
            .map_err(DiscordApiError::from_reqwest)?;

        Self::check(response).await?.json().await.map_err(DiscordApiError::from_reqwest)
    }

    /// Edits an existing message's content.
    pub async fn edit_message(&self, id: &MessageId, content: &str) -> Result<Message> {
        let response = self
            .http
            .patch(self.message_url(id))
            .header(AUTHORIZATION, self.auth_header())
            .json(&MessageContent { content })
            .send()
            .await
            .map_err(DiscordApiError::from_reqwest)?;

        Self::check(response).await?.json().await.map_err(DiscordApiError::from_reqwest)
    }

    /// Deletes a message.
    pub async fn delete_message(&self, id: &MessageId) -> Result<()> {
        let response = self
            .http
            .delete(self.message_url(id))
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(DiscordApiError::from_reqwest)?;

        Self::check(response).await?;
        Ok(())
    }

    /// Maps non-success statuses to categorized errors, with the response
    /// body as the message when Discord provides one.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            status.to_string()
        } else {
            body
        };
        Err(DiscordApiError::from_status(status.as_u16(), message))
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token deliberately omitted.
        f.debug_struct("DiscordClient")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}
