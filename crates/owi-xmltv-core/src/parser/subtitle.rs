//! Sub-title and title clean-up.

use std::sync::LazyLock;

use regex::Regex;

use super::text::sanitize;

static CATEGORY_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[.+\]\s*").expect("category prefix pattern is valid"));

static EPISODE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([SE]\d+.*\)").expect("episode suffix pattern is valid"));

/// Marker broadcasters put in front of first-run titles
pub const NEW_MARKER: &str = "New: ";

/// Derive a sub-title from a short description.
///
/// Strips the `[Category]` prefix and any `(S1 Ep2)` style parenthetical.
/// Returns `None` when nothing is left.
///
/// # Examples
/// ```
/// use owi_xmltv_core::parser::derive_subtitle;
///
/// assert_eq!(derive_subtitle("[Drama] The Reunion (S2 Ep4)"), Some("The Reunion".to_string()));
/// assert_eq!(derive_subtitle("[News]"), None);
/// ```
pub fn derive_subtitle(short_description: &str) -> Option<String> {
    let without_prefix = CATEGORY_PREFIX_RE.replace(short_description, "");
    let subtitle = sanitize(&EPISODE_SUFFIX_RE.replace_all(&without_prefix, ""));
    if subtitle.is_empty() {
        return None;
    }
    Some(subtitle)
}

/// Sanitize a title and pull out the `New: ` marker.
///
/// Returns the cleaned title and whether the marker was present.
pub fn clean_title(raw_title: &str) -> (String, bool) {
    let title = sanitize(raw_title);
    if title.contains(NEW_MARKER) {
        (title.replace(NEW_MARKER, ""), true)
    } else {
        (title, false)
    }
}
