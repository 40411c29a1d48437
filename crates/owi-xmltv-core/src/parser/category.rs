//! Category tags from the bracketed prefix of a short description.
//!
//! Broadcasters put up to two tags in front of the text, e.g.
//! `[Drama.Crime] Two detectives...` or `[Movie] ...`. Word characters are
//! matched in full Unicode, so `[Série.Drame]` is recognized too.

use std::sync::LazyLock;

use regex::Regex;

use super::text::sanitize;

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<first>[\w\s]+)[.\s]*(?P<second>[\w\s]+)*\]")
        .expect("category pattern is valid")
});

/// Extract up to two categories from a leading `[First.Second]` prefix.
///
/// Each category is sanitized; one that is empty afterwards is dropped.
///
/// # Examples
/// ```
/// use owi_xmltv_core::parser::extract_categories;
///
/// assert_eq!(extract_categories("[Drama.Crime] rest of text"), vec!["Drama", "Crime"]);
/// assert_eq!(extract_categories("[Movie] A film"), vec!["Movie"]);
/// assert!(extract_categories("no brackets").is_empty());
/// ```
pub fn extract_categories(short_description: &str) -> Vec<String> {
    let Some(caps) = CATEGORY_RE.captures(short_description) else {
        return Vec::new();
    };

    ["first", "second"]
        .iter()
        .filter_map(|name| caps.name(name))
        .map(|m| sanitize(m.as_str()))
        .filter(|category| !category.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::text::is_xml_char;
    use proptest::prelude::*;

    #[test]
    fn test_two_categories_dot_separated() {
        assert_eq!(
            extract_categories("[Drama.Crime] rest of text"),
            vec!["Drama", "Crime"]
        );
    }

    #[test]
    fn test_single_category() {
        assert_eq!(extract_categories("[News] Headlines"), vec!["News"]);
        assert_eq!(extract_categories("[Movie]"), vec!["Movie"]);
    }

    #[test]
    fn test_words_with_spaces_stay_in_first_group() {
        assert_eq!(
            extract_categories("[Soap Opera] Drama in the square"),
            vec!["Soap Opera"]
        );
    }

    #[test]
    fn test_second_group_after_dot_with_spaces() {
        assert_eq!(
            extract_categories("[Factual. Nature] Wildlife"),
            vec!["Factual", "Nature"]
        );
    }

    #[test]
    fn test_accented_categories() {
        assert_eq!(
            extract_categories("[Série.Drame] Un épisode"),
            vec!["Série", "Drame"]
        );
        assert_eq!(extract_categories("[Comédie] x"), vec!["Comédie"]);
    }

    #[test]
    fn test_categories_are_sanitized() {
        assert_eq!(extract_categories("[Drama\u{b}Crime] x"), vec!["DramaCrime"]);
        assert_eq!(extract_categories("[Quiz\u{c}.Game] x"), vec!["Quiz", "Game"]);
        assert!(extract_categories("[\u{b}] x").is_empty());
    }

    #[test]
    fn test_no_brackets() {
        assert!(extract_categories("no brackets").is_empty());
        assert!(extract_categories("").is_empty());
    }

    #[test]
    fn test_brackets_not_at_start() {
        assert!(extract_categories("Film [Movie]").is_empty());
    }

    #[test]
    fn test_punctuation_inside_brackets_does_not_match() {
        assert!(extract_categories("[Kids/Family] Cartoons").is_empty());
        assert!(extract_categories("[] Empty").is_empty());
    }

    #[test]
    fn test_unterminated_bracket() {
        assert!(extract_categories("[Drama Crime").is_empty());
    }

    proptest! {
        #[test]
        fn test_never_more_than_two(text in "\\PC{0,80}") {
            let categories = extract_categories(&text);
            prop_assert!(categories.len() <= 2);
            prop_assert!(categories.iter().all(|c| !c.is_empty()));
            prop_assert!(categories.iter().all(|c| c.chars().all(is_xml_char)));
        }
    }
}
