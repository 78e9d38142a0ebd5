//! Core domain types.

mod ids;
mod roster;

pub use ids::{ChannelId, MessageId};
pub use roster::{DriverName, Roster};
