//! Steam identity input handling

use crate::error::ResolutionError;

/// Reduce raw user input to the identifying segment.
///
/// `https://steamcommunity.com/id/gaben/` -> `gaben`,
/// `https://steamcommunity.com/profiles/76561197960287930` -> `76561197960287930`,
/// anything without a slash is returned trimmed. Query strings and
/// fragments are dropped.
pub fn extract_identifier(input: &str) -> &str {
    let trimmed = input.trim();
    let path = trimmed
        .split_once(['?', '#'])
        .map_or(trimmed, |(path, _)| path);
    let without_trailing = path.trim().trim_end_matches('/');

    match without_trailing.rsplit_once('/') {
        Some((_, segment)) if !segment.is_empty() => segment,
        _ => without_trailing,
    }
}

/// Accept only a non-empty run of ASCII digits as a numeric Steam ID
pub fn validate_numeric_id(segment: &str) -> Result<&str, ResolutionError> {
    if segment.is_empty() {
        return Err(ResolutionError::Empty);
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ResolutionError::NotNumeric(segment.to_string()));
    }
    Ok(segment)
}

/// Human readable `personastate`
pub fn persona_state_meaning(state: u8) -> &'static str {
    match state {
        0 => "Offline",
        1 => "Online",
        2 => "Busy",
        3 => "Away",
        4 => "Snooze",
        5 => "Looking to trade",
        6 => "Looking to play",
        _ => "Unknown",
    }
}
