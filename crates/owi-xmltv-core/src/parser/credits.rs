//! Director and cast lines at the end of movie descriptions.
//!
//! Movie long descriptions follow the layout
//!
//! ```text
//! Synopsis of the film.
//! Director Name
//! Actor One
//! Actor Two
//! ```

use crate::types::Credits;

use super::text::sanitize;

/// Category whose long descriptions carry credits
pub const MOVIE_CATEGORY: &str = "Movie";

/// Split a movie's long description into director and actors.
///
/// Only applies when `primary_category` is exactly `Movie`. Returns `None`
/// when the description has no cast section.
pub fn extract_credits(primary_category: Option<&str>, long_description: &str) -> Option<Credits> {
    if primary_category != Some(MOVIE_CATEGORY) {
        return None;
    }

    let mut parts = long_description.splitn(3, '\n');
    let _synopsis = parts.next()?;
    let director = parts.next()?;
    let cast = parts.next()?;

    // Only the entry left by a final line break is dropped
    let cast = cast.strip_suffix('\n').unwrap_or(cast);
    let actors = cast.split('\n').map(sanitize).collect();

    Some(Credits {
        director: sanitize(director),
        actors,
    })
}
