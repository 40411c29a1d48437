//! Episode numbering and air dates hidden in short descriptions.
//!
//! Two numbering conventions are recognized:
//! - `S2 Ep3/6`, `S1/E4`, `Ep5`, `E12/13` anywhere in the text
//! - `3/6.` at the very start of the text (episode/part, no season)
//!
//! Source numbers are 1-based; the `xmltv_ns` output is 0-based, so a source
//! `0` becomes `-1`. Digits are ASCII `0-9`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::EpisodeNumber;

static SEASON_EPISODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:S(?P<season>[0-9]+)[/\s]*)?(?:Ep|E)\s*(?P<episode>[0-9]+)(?:/(?P<part>[0-9]+))?")
        .expect("season/episode pattern is valid")
});

static LEADING_FRACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<episode>[0-9]+)/(?P<part>[0-9]+)\.").expect("leading fraction pattern is valid")
});

static AIR_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2})[/.\-]([0-9]{2})[/.\-]([0-9]{4})").expect("air date pattern is valid")
});

/// Find an episode number in free text.
///
/// Returns whether a pattern matched and the zero-indexed triple. When nothing
/// matched the triple is empty and renders as `..`.
///
/// # Examples
/// ```
/// use owi_xmltv_core::parser::parse_episode_number;
///
/// let (matched, number) = parse_episode_number("Ep3/6");
/// assert!(matched);
/// assert_eq!(number.to_string(), ".2.5");
///
/// let (matched, number) = parse_episode_number("no numbers here");
/// assert!(!matched);
/// assert_eq!(number.to_string(), "..");
/// ```
pub fn parse_episode_number(text: &str) -> (bool, EpisodeNumber) {
    let caps = SEASON_EPISODE_RE
        .captures(text)
        .or_else(|| LEADING_FRACTION_RE.captures(text));

    match caps {
        Some(caps) => (
            true,
            EpisodeNumber {
                season: zero_indexed(&caps, "season"),
                episode: zero_indexed(&caps, "episode"),
                part: zero_indexed(&caps, "part"),
            },
        ),
        None => (false, EpisodeNumber::default()),
    }
}

/// Convert a captured 1-based number to 0-based.
///
/// Only a digit run too long for `i64` is left empty.
fn zero_indexed(caps: &Captures<'_>, group: &str) -> Option<i64> {
    let number: i64 = caps.name(group)?.as_str().parse().ok()?;
    Some(number - 1)
}

/// Find a `DD/MM/YYYY` date (`/`, `.` or `-` separated) and return it as
/// `YYYY-MM-DD`.
///
/// # Examples
/// ```
/// use owi_xmltv_core::parser::parse_air_date;
///
/// assert_eq!(parse_air_date("First shown 24/12/1999."), Some("1999-12-24".to_string()));
/// assert_eq!(parse_air_date("no date"), None);
/// ```
pub fn parse_air_date(text: &str) -> Option<String> {
    let caps = AIR_DATE_RE.captures(text)?;
    Some(format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]))
}
