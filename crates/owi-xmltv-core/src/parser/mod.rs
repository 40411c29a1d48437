//! Heuristic parsers for EPG free text
//!
//! Each parser is a pure function from text to an optional result:
//! - `text`: entity decoding and invalid character stripping
//! - `category`: `[First.Second]` category prefix
//! - `episode`: episode numbers and original air dates
//! - `series`: `episode-num` annotations and the `Series` fallback
//! - `credits`: director and cast of movies
//! - `subtitle`: sub-title and `New: ` title marker
//!
//! A non-match is a normal outcome and never an error.

pub mod category;
pub mod credits;
pub mod episode;
pub mod series;
pub mod subtitle;
pub mod text;

// Re-export main parsing functions
pub use category::extract_categories;
pub use credits::extract_credits;
pub use episode::{parse_air_date, parse_episode_number};
pub use series::{annotate_series, SeriesInfo};
pub use subtitle::{clean_title, derive_subtitle};
pub use text::sanitize;
