//! Status display formatting.

mod format;

pub use format::{format_status_message, DISCORD_MESSAGE_SIZE_LIMIT};
