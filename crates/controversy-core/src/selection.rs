//! Selection capture for the bookmarklet.
//!
//! The bookmarklet runs on an arbitrary host page: it serialises the current
//! selection to HTML, strips it down to plain text and opens the client page
//! with the host location and the cleaned text as query parameters.

use std::sync::LazyLock;

use regex::Regex;

use crate::query::encode_uri_component;

/// Client page opened by the bookmarklet, relative to the service base.
pub const CLIENT_PAGE: &str = "controversy.html";

/// Popup window features used when opening the client page.
pub const WINDOW_FEATURES: &str = "width=800, height=600";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Reduce serialised selection HTML to a single line of text.
///
/// Tags become spaces, whitespace runs collapse to one space, and the result
/// is trimmed. Entities are left as-is.
pub fn clean_selection(html: &str) -> String {
    let untagged = TAG.replace_all(html, " ");
    let collapsed = WHITESPACE_RUN.replace_all(&untagged, " ");
    collapsed.trim().to_string()
}

/// A captured selection, ready to hand to the client page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Location of the page the selection was made on.
    pub location: String,
    /// Cleaned selection text; empty when nothing was selected.
    pub text: String,
}

impl Selection {
    /// Capture from the HTML of each selected range, in document order.
    pub fn capture<'a>(location: &str, ranges: impl IntoIterator<Item = &'a str>) -> Self {
        let html: String = ranges.into_iter().collect();
        Self {
            location: location.to_string(),
            text: clean_selection(&html),
        }
    }

    /// Capture from a legacy single-range selection, which is already HTML.
    pub fn capture_legacy(location: &str, html_text: &str) -> Self {
        Self::capture(location, [html_text])
    }

    /// Query string carrying the selection, `url=...&text=...`.
    pub fn query(&self) -> String {
        format!(
            "url={}&text={}",
            encode_uri_component(&self.location),
            encode_uri_component(&self.text)
        )
    }

    /// Full URL of the client page to open, given the page's own URL.
    pub fn launch_url(&self, client_page: &str) -> String {
        format!("{client_page}?{}", self.query())
    }
}

/// Render the `javascript:` bookmarklet that opens `client_page`.
pub fn bookmarklet_source(client_page: &str) -> String {
    format!(
        concat!(
            "javascript:(function(){{",
            "var h=\"\",s,c,i;",
            "if(window.getSelection){{s=window.getSelection();",
            "if(s.rangeCount){{c=document.createElement(\"div\");",
            "for(i=0;i<s.rangeCount;++i){{c.appendChild(s.getRangeAt(i).cloneContents());}}",
            "h=c.innerHTML;}}}}",
            "else if((s=document.selection)&&s.type==\"Text\"){{h=s.createRange().htmlText;}}",
            "h=h.replace(/<[^>]+>/gi,\" \").replace(/\\s+/gi,\" \").trim();",
            "window.open(\"{page}?url=\"+encodeURIComponent(location.href)",
            "+\"&text=\"+encodeURIComponent(h),\"_blank\",\"{features}\");",
            "}})()"
        ),
        page = client_page,
        features = WINDOW_FEATURES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let html = "<p>Gun <b>control</b>\n\n  laws</p><br/>are   <i>debated</i> ";
        assert_eq!(clean_selection(html), "Gun control laws are debated");
    }

    #[test]
    fn empty_selection() {
        assert_eq!(clean_selection(""), "");
        assert_eq!(clean_selection("<div>  </div>"), "");
    }

    #[test]
    fn entities_are_kept() {
        assert_eq!(clean_selection("<p>a &amp; b</p>"), "a &amp; b");
    }

    #[test]
    fn multiple_ranges_concatenate() {
        let sel = Selection::capture("http://a.com/x", ["<p>first</p>", "<p>second</p>"]);
        assert_eq!(sel.text, "first second");
    }

    #[test]
    fn legacy_path_matches_modern() {
        let modern = Selection::capture("http://a.com", ["<b>x</b> y"]);
        let legacy = Selection::capture_legacy("http://a.com", "<b>x</b> y");
        assert_eq!(modern, legacy);
    }

    #[test]
    fn launch_url_encodes_both_params() {
        let sel = Selection::capture("http://a.com/p?q=1", ["some <em>text</em>"]);
        assert_eq!(
            sel.launch_url("http://localhost:8080/controversy_webservice/controversy.html"),
            "http://localhost:8080/controversy_webservice/controversy.html\
             ?url=http%3A%2F%2Fa.com%2Fp%3Fq%3D1&text=some%20text"
        );
    }

    #[test]
    fn launch_url_round_trips_through_query_parser() {
        let sel = Selection::capture("http://a.com/?a=b&c=d", ["100% <i>sure</i>"]);
        let query = sel.query();
        assert_eq!(crate::get_query_param(&query, "url"), "http://a.com/?a=b&c=d");
        assert_eq!(crate::get_query_param(&query, "text"), "100% sure");
    }

    #[test]
    fn bookmarklet_targets_page() {
        let js = bookmarklet_source("http://h/controversy.html");
        assert!(js.starts_with("javascript:(function(){"));
        assert!(js.contains("window.open(\"http://h/controversy.html?url=\""));
        assert!(js.contains("\"width=800, height=600\""));
        assert!(js.ends_with("})()"));
    }
}
