//! Shared utility functions.

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string. If the string is shorter than
/// `max_bytes`, the entire string is returned unchanged.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Remove a leading `"Name:"` attribution that a model may echo back.
///
/// Only strips when the prefix matches `speaker` (case-insensitive), so
/// content that merely contains a colon is left intact. Full-width colons
/// are accepted too.
pub fn strip_speaker_prefix<'a>(text: &'a str, speaker: &str) -> &'a str {
    let trimmed = text.trim();
    let Some(head) = trimmed.get(..speaker.len()) else {
        return trimmed;
    };
    if !head.eq_ignore_ascii_case(speaker) {
        return trimmed;
    }
    let rest = trimmed[speaker.len()..].trim_start();
    rest.strip_prefix(':')
        .or_else(|| rest.strip_prefix('：'))
        .map(str::trim_start)
        .unwrap_or(trimmed)
}
