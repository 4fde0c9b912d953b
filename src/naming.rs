//! Centralized parsing for the export's entry naming convention.
//!
//! The export tool names every page and dataset file after its title plus a
//! long hexadecimal unique id, separated by a space or a dash:
//!
//! - `Getting Started 4a1b2c3d5e6f708192a3b4c5d6e7f801.md`
//! - `Intro-abc123ef4567890aabbccddeeff00112.md`
//! - `Board a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6.csv`
//!
//! This module is the single place that splits those names back apart and
//! derives URL slugs from titles. Every other module (scanner, resolver,
//! dataset pairing) goes through here so the convention is interpreted
//! exactly once.
//!
//! ## Misclassification guard
//!
//! Titles legitimately end in dash-separated words (`deep-dive`,
//! `intro-part-two`). The trailing token is only treated as a unique id when
//! it is hex-only and at least [`MIN_ID_LEN`] characters long; anything else
//! stays part of the title.

/// Minimum length for a trailing token to qualify as a unique id. The same
/// floor applies to resolver fragments.
pub const MIN_ID_LEN: usize = 8;

/// Result of decoding an entry name like `Getting Started 4a1b…01`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntryName {
    /// Human-readable title with the id suffix removed. Trimmed.
    pub title: String,
    /// The hexadecimal unique id, when the name carries one.
    pub unique_id: Option<String>,
}

/// Decode an on-disk entry name into title and optional unique id.
///
/// Splits on the LAST space-or-dash delimiter. The trailing token is the id
/// iff it is plausible hex ([`is_hex_id`]); otherwise the whole input is the
/// title:
///
/// - `"Getting Started 4a1b2c3d5e6f708192a3b4c5d6e7f801"` → title `"Getting Started"`, id present
/// - `"Intro-abc123ef"` → title `"Intro"`, id `"abc123ef"`
/// - `"deep-dive"` → title `"deep-dive"`, no id (`dive` is not hex)
/// - `"cafe-babe"` → title `"cafe-babe"`, no id (`babe` is hex but too short)
pub fn decode_entry_name(raw: &str) -> ParsedEntryName {
    if let Some(pos) = raw.rfind([' ', '-']) {
        let tail = &raw[pos + 1..];
        if is_hex_id(tail) {
            return ParsedEntryName {
                title: raw[..pos].trim().to_string(),
                unique_id: Some(tail.to_string()),
            };
        }
    }
    ParsedEntryName {
        title: raw.trim().to_string(),
        unique_id: None,
    }
}

/// Whether a token is a plausible unique id: hex-only and at least
/// [`MIN_ID_LEN`] characters.
pub fn is_hex_id(token: &str) -> bool {
    token.len() >= MIN_ID_LEN && token.chars().all(|c| c.is_ascii_hexdigit())
}

/// Derive a URL-safe slug from a title.
///
/// Lossy and deterministic: lowercase, non-alphanumeric runs collapsed to a
/// single `-`. The same title always yields the same slug, so links generated
/// against one build keep resolving against the next.
pub fn slugify(title: &str) -> String {
    slug::slugify(title)
}
