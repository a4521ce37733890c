//! Text normalization for report output and description trimming.
//!
//! The PDF backend writes text with a single-byte encoding, so everything
//! placed in a report goes through [`clean_for_output`] first.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Maximum length of a trimmed article description, in characters.
pub const DESCRIPTION_LIMIT: usize = 700;

/// Truncation marker the news backend appends to `content`, e.g. `… [+1234 chars]`.
static TRUNCATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:…|‚Ä¶|\.\.\.)?\s*\[\+\d+ chars\]").unwrap());

static NON_DESCRIPTION_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s.,!?]").unwrap());

/// Reduce arbitrary Unicode to text the report font can encode.
///
/// Applies compatibility decomposition (so `é` becomes `e` + combining accent
/// and `…` becomes `...`) and then drops every character above U+00FF.
pub fn clean_for_output(text: &str) -> String {
    text.nfkd().filter(|c| (*c as u32) <= 0xFF).collect()
}

/// Build a display description from an article's description and content.
///
/// Strips the backend's truncation marker from `content`, joins the two
/// fields, keeps only ASCII letters, digits, whitespace and `.,!?`, caps the
/// result at [`DESCRIPTION_LIMIT`] characters and cuts back to the last
/// period. Text without any period gets a single `.` appended instead.
pub fn combine_and_trim(description: &str, content: &str) -> String {
    let content = TRUNCATION_MARKER.replace_all(content, "");
    let combined = format!("{} {}", description.trim(), content.trim());
    let combined = NON_DESCRIPTION_CHARS.replace_all(combined.trim(), "");
    let window: String = combined.chars().take(DESCRIPTION_LIMIT).collect();

    match window.rfind('.') {
        Some(idx) => window[..=idx].trim().to_string(),
        None => {
            let body = window.trim_end().trim_end_matches('.');
            let body: String = body.chars().take(DESCRIPTION_LIMIT - 1).collect();
            format!("{}.", body.trim())
        }
    }
}
