//! Per-page-load state shared by the request handlers.

use tracing::debug;
use url::Url;

use crate::error::CoreError;
use crate::query::get_query_param;
use crate::render::DetectPatch;
use crate::response::RequestId;

/// Everything one view of the client page knows.
///
/// Built once when the page loads and threaded through every request. The
/// only field that changes afterwards is `request_id`, set from the `detect`
/// response so later ratings can be correlated with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Directory of the client page; endpoints are resolved against it.
    pub service_base: String,
    /// Target URL from the `url` query parameter.
    pub url: String,
    /// Selected text from the `text` query parameter.
    pub text: String,
    pub userid: String,
    pub request_id: Option<RequestId>,
}

impl PageContext {
    /// Build from the full location of the client page.
    ///
    /// `http://h:8080/svc/controversy.html?url=..&text=..` yields the service
    /// base `http://h:8080/svc/` and the decoded `url`/`text` parameters.
    pub fn from_location(location: &str, userid: impl Into<String>) -> Result<Self, CoreError> {
        let parsed = Url::parse(location)?;
        let query = parsed.query().unwrap_or_default();
        let ctx = Self {
            service_base: service_base(&parsed)?,
            url: get_query_param(query, "url"),
            text: get_query_param(query, "text"),
            userid: userid.into(),
            request_id: None,
        };
        debug!(service = %ctx.service_base, url = %ctx.url, text_len = ctx.text.len(), "page context loaded");
        Ok(ctx)
    }

    /// Build directly from a service base and explicit parameters.
    pub fn new(
        service_base: &str,
        url: impl Into<String>,
        text: impl Into<String>,
        userid: impl Into<String>,
    ) -> Self {
        let mut base = service_base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            service_base: base,
            url: url.into(),
            text: text.into(),
            userid: userid.into(),
            request_id: None,
        }
    }

    /// Absolute URL of a service endpoint such as `detect`.
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}{name}", self.service_base)
    }

    /// URL of the client page itself, where the bookmarklet points.
    pub fn client_page(&self) -> String {
        self.endpoint(crate::selection::CLIENT_PAGE)
    }

    /// Request id to send with ratings; empty until `detect` has answered.
    pub fn request_id_or_empty(&self) -> RequestId {
        self.request_id.clone().unwrap_or_default()
    }

    /// Fold the session state carried by a rendered `detect` response.
    pub fn apply(&mut self, patch: &DetectPatch) {
        if let Some(form) = &patch.url_rating {
            debug!(request_id = %form.request_id, "stored request id");
            self.request_id = Some(form.request_id.clone());
        }
    }
}

/// Scheme, authority and path up to and including the last `/`.
fn service_base(location: &Url) -> Result<String, CoreError> {
    let host = location
        .host_str()
        .ok_or_else(|| CoreError::MissingHost(location.to_string()))?;
    let authority = match location.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let path = location.path();
    let dir = &path[..path.rfind('/').map_or(0, |i| i + 1)];
    Ok(format!("{}://{authority}{dir}", location.scheme()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_location() {
        let ctx = PageContext::from_location(
            "http://localhost:8080/controversy_webservice/controversy.html?url=http%3A%2F%2Fa.com&text=",
            "0.1:0.2",
        )
        .unwrap();
        assert_eq!(ctx.service_base, "http://localhost:8080/controversy_webservice/");
        assert_eq!(ctx.url, "http://a.com");
        assert_eq!(ctx.text, "");
        assert_eq!(ctx.userid, "0.1:0.2");
        assert!(ctx.request_id.is_none());
    }

    #[test]
    fn missing_params_default_to_empty() {
        let ctx = PageContext::from_location("http://h/controversy.html", "u").unwrap();
        assert_eq!(ctx.service_base, "http://h/");
        assert_eq!(ctx.url, "");
        assert_eq!(ctx.text, "");
    }

    #[test]
    fn endpoints_resolve_against_base() {
        let ctx = PageContext::from_location("https://h.org/a/b/page.html?x=1", "u").unwrap();
        assert_eq!(ctx.endpoint("detect"), "https://h.org/a/b/detect");
        assert_eq!(ctx.client_page(), "https://h.org/a/b/controversy.html");
    }

    #[test]
    fn rejects_hostless_location() {
        assert!(PageContext::from_location("not a url", "u").is_err());
        assert!(matches!(
            PageContext::from_location("data:text/plain,hi", "u"),
            Err(CoreError::MissingHost(_))
        ));
    }

    #[test]
    fn new_appends_slash() {
        let ctx = PageContext::new("http://h/svc", "http://a.com", "", "u");
        assert_eq!(ctx.endpoint("url_rating"), "http://h/svc/url_rating");
    }

    #[test]
    fn request_id_defaults_to_empty() {
        let mut ctx = PageContext::new("http://h/", "", "", "u");
        assert!(ctx.request_id_or_empty().is_empty());
        ctx.request_id = Some(RequestId::new("9"));
        assert_eq!(ctx.request_id_or_empty().as_str(), "9");
    }
}
