//! Status message formatting.
//!
//! Renders the current state into the text of a Discord status message:
//! driver and grid counts, the seated/waitlist split, and the rolling change
//! journal. Output stays under Discord's message size limit by dropping the
//! oldest journal lines first.

use crate::capacity::GridConfig;
use crate::persistence::PersistedEventState;

/// Discord's message content limit (2000 characters).
pub const DISCORD_MESSAGE_SIZE_LIMIT: usize = 2000;

/// Journal lines shown in the status message.
const SHOWN_JOURNAL_LINES: usize = 10;

/// Formats the status message body for the current state.
pub fn format_status_message(state: &PersistedEventState, config: &GridConfig) -> String {
    let mut body = String::new();

    body.push_str("**Grid Status**\n");
    body.push_str(&format!(
        "Drivers: {} | Grids: {} ({} seats each)",
        state.roster.len(),
        state.grid_count,
        config.per_grid
    ));
    if state.grids_locked.is_some() {
        body.push_str(" 🔒");
    }
    body.push('\n');

    let (seated, waitlisted) = config.split_seated(state.roster.names(), state.grid_count);
    body.push_str(&format!(
        "Seated: {} | Waitlist: {}\n",
        seated.len(),
        waitlisted.len()
    ));

    if !waitlisted.is_empty() {
        body.push_str("\nWaitlist:\n");
        for name in waitlisted {
            body.push_str(&format!("• {}\n", name));
        }
    }

    if !state.journal.is_empty() {
        body.push_str("\nRecent changes:\n");
        let start = state.journal.len().saturating_sub(SHOWN_JOURNAL_LINES);
        for entry in &state.journal[start..] {
            body.push_str(&format!(
                "`{}` {}\n",
                entry.at.format("%d.%m. %H:%M"),
                entry.line
            ));
        }
    }

    truncate_to_limit(body)
}

/// Drops whole trailing lines until the body fits the message limit.
fn truncate_to_limit(body: String) -> String {
    if body.len() <= DISCORD_MESSAGE_SIZE_LIMIT {
        return body;
    }
    let mut fitted = body;
    while fitted.len() > DISCORD_MESSAGE_SIZE_LIMIT {
        match fitted.trim_end().rfind('\n') {
            Some(pos) => fitted.truncate(pos),
            None => {
                let mut end = DISCORD_MESSAGE_SIZE_LIMIT;
                while end > 0 && !fitted.is_char_boundary(end) {
                    end -= 1;
                }
                fitted.truncate(end);
                break;
            }
        }
    }
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::types::{DriverName, Roster};

    fn state_with(names: &[&str], grid_count: u32) -> PersistedEventState {
        PersistedEventState {
            roster: names.iter().map(|s| DriverName::from(*s)).collect::<Roster>(),
            grid_count,
            ..Default::default()
        }
    }

    #[test]
    fn shows_counts_and_split() {
        let state = state_with(&["Alice", "Bob", "Carol"], 1);
        let body = format_status_message(&state, &GridConfig::new(2, 4));

        assert!(body.contains("Drivers: 3 | Grids: 1 (2 seats each)"));
        assert!(body.contains("Seated: 2 | Waitlist: 1"));
        assert!(body.contains("• Carol"));
    }

    #[test]
    fn no_waitlist_section_when_everyone_fits() {
        let state = state_with(&["Alice"], 1);
        let body = format_status_message(&state, &GridConfig::DEFAULT);
        assert!(!body.contains("Waitlist:\n"));
    }

    #[test]
    fn lock_marker_shown_when_frozen() {
        let mut state = state_with(&["Alice"], 1);
        state.grids_locked = Some(1);
        let body = format_status_message(&state, &GridConfig::DEFAULT);
        assert!(body.contains("🔒"));
    }

    #[test]
    fn journal_shows_newest_entries() {
        let mut state = state_with(&["Alice"], 1);
        for i in 0..20 {
            state.record_change(Utc::now(), format!("change {i}"));
        }
        let body = format_status_message(&state, &GridConfig::DEFAULT);

        assert!(body.contains("Recent changes:"));
        assert!(body.contains("change 19"));
        // Older than the shown window.
        assert!(!body.contains("change 5\n"));
    }

    #[test]
    fn output_respects_discord_limit() {
        let long_names: Vec<String> = (0..200).map(|i| format!("Driver Number {i:04}")).collect();
        let refs: Vec<&str> = long_names.iter().map(String::as_str).collect();
        let mut state = state_with(&refs, 1);
        for i in 0..25 {
            state.record_change(Utc::now(), format!("a fairly long change line number {i}"));
        }

        let body = format_status_message(&state, &GridConfig::DEFAULT);
        assert!(body.len() <= DISCORD_MESSAGE_SIZE_LIMIT);
        // Truncation drops whole lines, not mid-line fragments.
        assert!(!body.ends_with('•'));
    }

    #[test]
    fn empty_state_still_renders() {
        let body = format_status_message(&PersistedEventState::default(), &GridConfig::DEFAULT);
        assert!(body.contains("Drivers: 0 | Grids: 0"));
    }
}
