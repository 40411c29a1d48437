//! Free text normalization.
//!
//! EPG text arrives HTML-escaped and occasionally carries control characters
//! that XML 1.0 forbids. Everything embedded in the document goes through
//! [`sanitize`] first.

use std::borrow::Cow;
use std::sync::LazyLock;

use quick_xml::escape::resolve_html5_entity;
use regex::{Captures, Regex};

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+;?|#[xX][0-9A-Fa-f]+;?|[^\t\n\x0C <&#;]{1,32};?)")
        .expect("entity pattern is valid")
});

/// Named references that HTML5 also recognizes without the trailing `;`
const LEGACY_ENTITIES: [&str; 106] = [
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Windows-1252 characters for the numeric references `&#128;` to `&#159;`
const CP1252_C1: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2C6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8D}', '\u{17D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2DC}', '\u{2122}', '\u{161}', '\u{203A}', '\u{153}', '\u{9D}', '\u{17E}', '\u{178}',
];

/// Decode entities and drop characters XML cannot carry.
///
/// Unknown entities are kept literally, so decoding never fails.
///
/// # Examples
/// ```
/// use owi_xmltv_core::parser::sanitize;
///
/// assert_eq!(sanitize("Tom &amp; Jerry"), "Tom & Jerry");
/// assert_eq!(sanitize("Bell\u{7} rings"), "Bell rings");
/// assert_eq!(sanitize("AT&T"), "AT&T");
/// ```
pub fn sanitize(text: &str) -> String {
    decode_entities(text)
        .chars()
        .filter(|c| is_xml_char(*c))
        .collect()
}

/// Replace named and numeric character references with their characters.
///
/// Follows the HTML5 rules: numeric references and the legacy named
/// references may omit the `;`, numeric references in the C1 range map to
/// Windows-1252, and out-of-range code points become U+FFFD.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    ENTITY_RE.replace_all(text, |caps: &Captures<'_>| {
        let reference = &caps[1];
        match reference.strip_prefix('#') {
            Some(number) => resolve_numeric(number),
            None => resolve_named(reference).unwrap_or_else(|| caps[0].to_string()),
        }
    })
}

fn resolve_numeric(number: &str) -> String {
    let number = number.strip_suffix(';').unwrap_or(number);
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => number.parse(),
    };
    // Too many digits for u32 is beyond U+10FFFF as well
    let Ok(code) = code else {
        return '\u{FFFD}'.to_string();
    };

    match code {
        0 => '\u{FFFD}'.to_string(),
        0x80..=0x9F => CP1252_C1[(code - 0x80) as usize].to_string(),
        0x0D => '\r'.to_string(),
        0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF => String::new(),
        _ if code & 0xFFFE == 0xFFFE && code <= 0x10FFFF => String::new(),
        _ => char::from_u32(code)
            .map(String::from)
            .unwrap_or_else(|| '\u{FFFD}'.to_string()),
    }
}

/// Resolve `name` or `name;`, falling back to the longest legacy prefix.
fn resolve_named(reference: &str) -> Option<String> {
    match reference.strip_suffix(';') {
        Some(name) => {
            if let Some(value) = resolve_html5_entity(name) {
                return Some(value.to_string());
            }
        }
        None => {
            if let Some(value) = resolve_legacy(reference) {
                return Some(value.to_string());
            }
        }
    }

    // `&notit;` decodes as `¬it;`
    let boundaries: Vec<usize> = reference.char_indices().map(|(i, _)| i).skip(2).collect();
    boundaries.into_iter().rev().find_map(|end| {
        let (prefix, rest) = reference.split_at(end);
        resolve_legacy(prefix).map(|value| format!("{}{}", value, rest))
    })
}

fn resolve_legacy(name: &str) -> Option<&'static str> {
    if LEGACY_ENTITIES.contains(&name) {
        resolve_html5_entity(name)
    } else {
        None
    }
}

/// Whether a character is allowed by the XML 1.0 `Char` production.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_decodes_and_strips() {
        assert_eq!(sanitize("Fish &amp; Chips\u{1}"), "Fish & Chips");
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(sanitize("&lt;b&gt;"), "<b>");
        assert_eq!(sanitize("Caf&eacute;"), "Café");
        assert_eq!(sanitize("&quot;Quoted&quot;"), "\"Quoted\"");
        assert_eq!(sanitize("It&apos;s"), "It's");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(sanitize("&#169; BBC"), "© BBC");
        assert_eq!(sanitize("&#x263A;"), "☺");
        assert_eq!(sanitize("&#X263a;"), "☺");
    }

    #[test]
    fn test_unknown_entities_pass_through() {
        assert_eq!(sanitize("&bogus;"), "&bogus;");
        assert_eq!(sanitize("R&B"), "R&B");
        assert_eq!(sanitize("Q&A; live"), "Q&A; live");
    }

    #[test]
    fn test_references_without_semicolon() {
        assert_eq!(sanitize("Fish &amp Chips"), "Fish & Chips");
        assert_eq!(sanitize("&copy 2024"), "© 2024");
        assert_eq!(sanitize("&#65&#x42"), "AB");
        assert_eq!(sanitize("&notit;"), "¬it;");
        // Only legacy names decode without `;`
        assert_eq!(sanitize("&hellip"), "&hellip");
        assert_eq!(sanitize("&hellip;"), "…");
    }

    #[test]
    fn test_c1_numeric_references_use_windows_1252() {
        assert_eq!(sanitize("&#128;5"), "€5");
        assert_eq!(sanitize("&#150;"), "–");
        assert_eq!(sanitize("&#x99;"), "™");
        assert_eq!(sanitize("&#159;"), "Ÿ");
    }

    #[test]
    fn test_out_of_range_numeric_references() {
        assert_eq!(sanitize("&#xD800;"), "\u{FFFD}");
        assert_eq!(sanitize("&#x110000;"), "\u{FFFD}");
        assert_eq!(sanitize("&#99999999999;"), "\u{FFFD}");
        assert_eq!(sanitize("&#0;"), "\u{FFFD}");
        assert_eq!(sanitize("&#xFFFE;"), "");
    }

    #[test]
    fn test_numeric_entity_for_control_char_is_dropped() {
        assert_eq!(sanitize("a&#1;b"), "ab");
    }

    #[test]
    fn test_whitespace_controls_are_kept() {
        assert_eq!(sanitize("line one\nline two\ttab\r"), "line one\nline two\ttab\r");
    }

    #[test]
    fn test_invalid_characters_removed() {
        assert_eq!(sanitize("a\u{0}b\u{1F}c\u{FFFE}d\u{FFFF}"), "abcd");
        assert_eq!(sanitize("emoji \u{1F600}"), "emoji \u{1F600}");
    }

    #[test]
    fn test_decode_entities_borrows_without_ampersand() {
        assert!(matches!(decode_entities("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(sanitize(""), "");
    }

    proptest! {
        #[test]
        fn test_sanitize_only_emits_xml_chars(text in any::<String>()) {
            let cleaned = sanitize(&text);
            prop_assert!(cleaned.chars().all(is_xml_char));
        }

        #[test]
        fn test_sanitize_keeps_text_without_markup(text in "[A-Za-z0-9 ,.!?]{0,64}") {
            prop_assert_eq!(sanitize(&text), text);
        }
    }
}
