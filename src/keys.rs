//! Character key normalization.
//!
//! Produces a stable URL-safe key from a character name and a media
//! title. The key is the primary lookup key for the roster and the vote
//! ledger, so the mapping must stay byte-stable across releases.
//!
//! Normalization per segment: lowercase, trim, drop everything that is not
//! ASCII alphanumeric, whitespace, hyphen, or underscore, then collapse
//! each separator run into a single underscore and cut at 100 characters.
//! The two segments join with a pipe.

pub const MAX_SEGMENT_LEN: usize = 100;

/// Normalize one key segment (a name or a media title).
pub fn normalize_segment(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for c in lowered.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator {
                out.push('_');
                pending_separator = false;
            }
            out.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
        // Everything else (punctuation, non-ASCII letters) is dropped
        // without acting as a separator.
    }
    if pending_separator {
        out.push('_');
    }
    // Output is pure ASCII at this point, so byte truncation is safe.
    out.truncate(MAX_SEGMENT_LEN);
    out
}

/// Build the canonical `{name}|{media}` key.
pub fn character_key(character_name: &str, media_title: &str) -> String {
    format!(
        "{}|{}",
        normalize_segment(character_name),
        normalize_segment(media_title)
    )
}

/// Split a key back into its name and media segments. The first pipe wins;
/// later pipes belong to the media segment.
pub fn parse_character_key(key: &str) -> Option<(&str, &str)> {
    key.split_once('|')
}
