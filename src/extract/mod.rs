//! Embed extraction: locating the signup embed and pulling the roster out.
//!
//! The signup bot ("Apollo"-style) posts one message per event whose embed
//! carries the driver list across named fields. Detection and extraction are
//! both keyword-driven: the embed title/description must mention a signup
//! keyword, and only fields whose *name* matches the field allow-list
//! contribute names. Keywords are matched case-insensitively as substrings
//! and include the German variants used in the channels this runs against.
//!
//! Extraction never fails: an embed with no matching fields yields an empty
//! roster. Whether that means "no event" is the caller's decision, and here
//! it does not: a recognized signup embed with zero names is a valid zero-driver
//! roster. "No event" is reserved for no recognized embed at all.

mod normalize;

pub use normalize::normalize_name;

use serde::{Deserialize, Serialize};

use crate::types::{DriverName, Roster};

/// Keywords that mark an embed as a signup embed (title or description).
const SIGNUP_KEYWORDS: &[&str] = &["grid", "signup", "sign-up", "anmeldung"];

/// Keywords that mark an embed field as carrying driver names.
const ROSTER_FIELD_KEYWORDS: &[&str] = &["driver", "fahrer", "accepted", "angemeldet", "teilnehmer"];

/// Lines that collide with structural keywords are headers, not names.
const NOISE_KEYWORDS: &[&str] = &["grid", "waitlist", "warteliste", "reserve"];

/// A named text field within an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// A rich-content block attached to a Discord message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
}

/// Case-insensitive substring match against a keyword list.
fn matches_keyword(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}

/// Returns true if this embed looks like an event-signup embed.
pub fn is_signup_embed(embed: &Embed) -> bool {
    let title = embed.title.as_deref().unwrap_or("");
    let description = embed.description.as_deref().unwrap_or("");
    matches_keyword(title, SIGNUP_KEYWORDS) || matches_keyword(description, SIGNUP_KEYWORDS)
}

/// Extracts the ordered driver roster from a signup embed.
///
/// Fields are visited in embed order; within a field, lines are visited top
/// to bottom, so the result preserves signup order. Every name goes through
/// [`normalize_name`]. Empty lines and keyword headers are dropped.
pub fn extract_roster(embed: &Embed) -> Roster {
    let mut roster = Roster::new();
    for field in &embed.fields {
        if !matches_keyword(&field.name, ROSTER_FIELD_KEYWORDS) {
            continue;
        }
        for line in field.value.lines() {
            let name = normalize_name(line);
            if name.is_empty() || matches_keyword(&name, NOISE_KEYWORDS) {
                continue;
            }
            roster.push(DriverName::new(name));
        }
    }
    roster
}
