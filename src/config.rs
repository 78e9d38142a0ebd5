//! Service configuration.
//!
//! Built once at startup from environment variables and passed by parameter
//! everywhere; there is no global mutable config. `from_vars` takes the
//! lookup as a parameter so tests can feed a plain map instead of mutating
//! the process environment.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Weekday;
use thiserror::Error;

use crate::capacity::GridConfig;
use crate::types::{ChannelId, MessageId};

/// Default poll interval (5 minutes).
const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Default timeout for outbound HTTP calls.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default HTTP listen port.
const DEFAULT_LISTEN_PORT: u16 = 3000;

/// Errors that can occur building the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// An environment variable has an unparseable value.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Complete service configuration.
#[derive(Clone)]
pub struct Config {
    /// Discord bot token.
    pub discord_token: String,

    /// The channel carrying the signup embed.
    pub channel_id: ChannelId,

    /// Outbound webhook URL. `None` disables webhook notifications.
    pub webhook_url: Option<String>,

    /// Directory holding the persisted state record.
    pub state_dir: PathBuf,

    /// Interval between automatic poll ticks.
    pub poll_interval: Duration,

    /// Grid sizing.
    pub grid: GridConfig,

    /// Weekday on which the grid count freezes, if any.
    pub lock_weekday: Option<Weekday>,

    /// Pinned status message to edit. When unset and `publish_status` is on,
    /// the bot creates its own status message and remembers it in state.
    pub status_message_id: Option<MessageId>,

    /// Whether to maintain the Discord status message at all.
    pub publish_status: bool,

    /// Timeout applied to every outbound HTTP call.
    pub http_timeout: Duration,

    /// Port for the trigger/health/state HTTP server.
    pub listen_port: u16,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let discord_token = require(&lookup, "DISCORD_TOKEN")?;
        let channel_id = ChannelId::new(require(&lookup, "CHANNEL_ID")?);
        let webhook_url = lookup("MAKE_WEBHOOK").filter(|s| !s.is_empty());

        let state_dir = lookup("GRID_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("state"));

        let poll_interval = Duration::from_secs(parse_or(
            &lookup,
            "GRID_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
        )?);

        let grid = GridConfig::new(
            parse_or(&lookup, "GRID_SEATS_PER_GRID", GridConfig::DEFAULT.per_grid)?,
            parse_or(&lookup, "GRID_MAX_GRIDS", GridConfig::DEFAULT.max_grids)?,
        );

        let lock_weekday = match lookup("GRID_LOCK_WEEKDAY").filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<Weekday>().map_err(|_| ConfigError::Invalid {
                var: "GRID_LOCK_WEEKDAY",
                value: raw,
            })?),
            None => None,
        };

        let status_message_id = lookup("GRID_STATUS_MESSAGE_ID")
            .filter(|s| !s.is_empty())
            .map(MessageId::new);

        let publish_status = parse_or(&lookup, "GRID_PUBLISH_STATUS", true)?;

        let http_timeout = Duration::from_secs(parse_or(
            &lookup,
            "GRID_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);

        let listen_port = parse_or(&lookup, "PORT", DEFAULT_LISTEN_PORT)?;

        Ok(Config {
            discord_token,
            channel_id,
            webhook_url,
            state_dir,
            poll_interval,
            grid,
            lock_weekday,
            status_message_id,
            publish_status,
            http_timeout,
            listen_port,
        })
    }

    /// Path of the persisted state record.
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join("state.json")
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token and webhook URL (credential-bearing) deliberately omitted.
        f.debug_struct("Config")
            .field("channel_id", &self.channel_id)
            .field("state_dir", &self.state_dir)
            .field("poll_interval", &self.poll_interval)
            .field("grid", &self.grid)
            .field("lock_weekday", &self.lock_weekday)
            .field("status_message_id", &self.status_message_id)
            .field("publish_status", &self.publish_status)
            .field("http_timeout", &self.http_timeout)
            .field("listen_port", &self.listen_port)
            .finish_non_exhaustive()
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<String> {
    lookup(var)
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T> {
    match lookup(var).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid {
            var,
            value: raw,
        }),
        None => Ok(default),
    }
}
