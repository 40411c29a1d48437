//! Series annotations: `episode-num` elements and the `Series` fallback
//! category.

use crate::types::{EpisodeNum, EpisodeNumSystem};

use super::episode::{parse_air_date, parse_episode_number};

/// Categories that never carry episode numbers
const UNNUMBERED_CATEGORIES: [&str; 2] = ["Movie", "News"];

/// Category given to numbered programmes that had none
pub const SERIES_CATEGORY: &str = "Series";

/// Annotations derived from a short description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesInfo {
    /// `xmltv_ns` first, then `original-air-date`, each only when found
    pub episode_numbers: Vec<EpisodeNum>,
    /// Set when an episode number was found but no category was known
    pub inferred_category: Option<String>,
}

/// Decide the series annotations for a programme.
///
/// `categories` are the categories already assigned; the first one decides
/// whether the programme may be numbered at all.
pub fn annotate_series(categories: &[String], short_description: &str) -> SeriesInfo {
    let mut info = SeriesInfo::default();

    if let Some(first) = categories.first() {
        if UNNUMBERED_CATEGORIES.contains(&first.as_str()) {
            return info;
        }
    }

    let (matched, number) = parse_episode_number(short_description);
    if matched {
        info.episode_numbers.push(EpisodeNum {
            system: EpisodeNumSystem::XmltvNs,
            value: number.to_string(),
        });
        if categories.is_empty() {
            info.inferred_category = Some(SERIES_CATEGORY.to_string());
        }
    }

    if let Some(date) = parse_air_date(short_description) {
        info.episode_numbers.push(EpisodeNum {
            system: EpisodeNumSystem::OriginalAirDate,
            value: date,
        });
    }

    info
}
