//! Discord REST access: a channel-scoped client and the wire types it reads.

mod client;
mod error;
mod wire;

pub use client::{DiscordClient, Result};
pub use error::{DiscordApiError, DiscordErrorKind};
pub use wire::{find_signup_message, Message, MessageContent};
