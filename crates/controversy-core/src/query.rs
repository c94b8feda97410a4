//! Query-string parsing and URI component encoding.
//!
//! Encoding follows `encodeURIComponent`: ASCII alphanumerics and
//! `- _ . ! ~ * ' ( )` pass through, everything else is percent-encoded as
//! UTF-8. Decoding follows `decodeURIComponent`, so `+` stays a literal plus.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

const WIKI_BASE: &str = "http://en.wikipedia.org/wiki/";

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Characters `encodeURIComponent` leaves alone but `urlencoding` escapes.
const URI_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encode a string the way `encodeURIComponent` does.
pub fn encode_uri_component(s: &str) -> String {
    let encoded = urlencoding::encode(s);
    if !encoded.contains('%') {
        return encoded.into_owned();
    }
    URI_MARKS
        .iter()
        .fold(encoded.into_owned(), |acc, (from, to)| acc.replace(from, to))
}

/// Percent-decode a string. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_uri_component(s: &str) -> String {
    let bytes = urlencoding::decode_binary(s.as_bytes());
    match String::from_utf8_lossy(&bytes) {
        Cow::Borrowed(v) => v.to_string(),
        Cow::Owned(v) => v,
    }
}

/// Extract and decode a named parameter from a query string.
///
/// The leading `?` is optional. Returns an empty string when the parameter
/// is absent or carries no value; the first occurrence wins.
pub fn get_query_param(query: &str, name: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| match pair.split_once('=') {
            Some((key, value)) if key == name => Some(decode_uri_component(value)),
            None if pair == name => Some(String::new()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Build the English Wikipedia URL for an entry title.
///
/// Whitespace runs become a single underscore before encoding, so
/// `"Climate Change"` maps to `http://en.wikipedia.org/wiki/Climate_Change`.
pub fn make_wiki_url(entry: &str) -> String {
    let slug = WHITESPACE_RUN.replace_all(entry, "_");
    format!("{WIKI_BASE}{}", encode_uri_component(&slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_url_param() {
        assert_eq!(
            get_query_param("?url=http%3A%2F%2Fa.com", "url"),
            "http://a.com"
        );
    }

    #[test]
    fn missing_param_is_empty() {
        assert_eq!(get_query_param("?x=1", "url"), "");
        assert_eq!(get_query_param("", "url"), "");
        assert_eq!(get_query_param("?", "url"), "");
    }

    #[test]
    fn valueless_param_is_empty() {
        assert_eq!(get_query_param("?url=&text=hi", "url"), "");
        assert_eq!(get_query_param("?url&text=hi", "url"), "");
        assert_eq!(get_query_param("?url&text=hi", "text"), "hi");
    }

    #[test]
    fn key_must_match_exactly() {
        assert_eq!(get_query_param("?myurl=a&url=b", "url"), "b");
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(get_query_param("url=a&url=b", "url"), "a");
    }

    #[test]
    fn plus_is_literal() {
        assert_eq!(get_query_param("?text=a+b%20c", "text"), "a+b c");
    }

    #[test]
    fn malformed_escapes_do_not_fail() {
        assert_eq!(get_query_param("?text=100%", "text"), "100%");
        assert_eq!(get_query_param("?text=%zz", "text"), "%zz");
        assert_eq!(get_query_param("?text=%FF", "text"), "\u{FFFD}");
    }

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(encode_uri_component("a b&c"), "a%20b%26c");
        assert_eq!(encode_uri_component("it's (fine)!*~"), "it's%20(fine)!*~");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
        assert_eq!(encode_uri_component("plain"), "plain");
    }

    #[test]
    fn decode_reverses_encode() {
        let original = "Abortion (debate): 100% & más";
        assert_eq!(decode_uri_component(&encode_uri_component(original)), original);
    }

    #[test]
    fn wiki_url_replaces_spaces() {
        assert_eq!(
            make_wiki_url("Climate Change"),
            "http://en.wikipedia.org/wiki/Climate_Change"
        );
    }

    #[test]
    fn wiki_url_collapses_whitespace_runs() {
        assert_eq!(
            make_wiki_url("Gun \t politics\nin  the US"),
            "http://en.wikipedia.org/wiki/Gun_politics_in_the_US"
        );
    }

    #[test]
    fn wiki_url_encodes_reserved() {
        assert_eq!(
            make_wiki_url("AC/DC & friends"),
            "http://en.wikipedia.org/wiki/AC%2FDC_%26_friends"
        );
        assert_eq!(
            make_wiki_url("Roe v. Wade"),
            "http://en.wikipedia.org/wiki/Roe_v._Wade"
        );
    }
}
