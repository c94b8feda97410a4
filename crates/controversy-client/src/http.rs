//! HTTP client for the scoring service's `detect`, `url_rating` and
//! `wikientry_rating` endpoints.

use controversy_core::{
    EntryRating, PageContext, RatingResponse, RatingTier, ScoreResponse, encode_uri_component,
};
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid cookie header: {0}")]
    Cookie(#[from] InvalidHeaderValue),
}

/// Client for the scoring service rooted at a page context's service base.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Default)]
pub struct ScoreClient {
    client: reqwest::Client,
}

impl ScoreClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Wrap a preconfigured `reqwest` client (proxies, timeouts, TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Client that sends `cookie` with every request, as a browser does for
    /// same-origin calls. An empty header sends no cookies.
    pub fn with_cookie_header(cookie: &str) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if !cookie.is_empty() {
            headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
        }
        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self::with_client(client))
    }

    /// Request the controversy score for the page context's `url`/`text`.
    pub async fn detect(&self, ctx: &PageContext) -> Result<ScoreResponse, ClientError> {
        let url = ctx.endpoint("detect");
        info!(url = %url, target = %ctx.url, text_len = ctx.text.len(), "requesting controversy score");
        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(detect_body(ctx))
            .send()
            .await?;
        let score: ScoreResponse = read_json(resp).await?;
        info!(success = score.success, controversy = ?score.controversy, "received controversy score");
        Ok(score)
    }

    /// Submit the user's controversy rating for the scored page or text.
    pub async fn submit_url_rating(
        &self,
        ctx: &PageContext,
        rating: RatingTier,
    ) -> Result<RatingResponse, ClientError> {
        let url = url_rating_url(ctx, rating);
        info!(url = %url, "submitting url rating");
        let resp = self.client.get(&url).send().await?;
        let result: RatingResponse = read_json(resp).await?;
        info!(success = result.success, "url rating response");
        Ok(result)
    }

    /// Submit the user's relevance rating for one Wikipedia entry.
    pub async fn submit_entry_rating(
        &self,
        ctx: &PageContext,
        entry: &str,
        rating: EntryRating,
    ) -> Result<RatingResponse, ClientError> {
        let url = entry_rating_url(ctx, entry, rating);
        info!(url = %url, entry, "submitting wiki entry rating");
        let resp = self.client.get(&url).send().await?;
        let result: RatingResponse = read_json(resp).await?;
        info!(success = result.success, entry, "wiki entry rating response");
        Ok(result)
    }
}

/// Form body of a `detect` request. `debug` is always on so the server
/// returns the `info` block the rating forms depend on.
pub fn detect_body(ctx: &PageContext) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("debug", "1")
        .append_pair("userid", &ctx.userid)
        .append_pair("url", &ctx.url)
        .append_pair("text", &ctx.text)
        .finish()
}

/// `url_rating?requestid=..&rating=..`; the request id goes out as-is, and
/// is empty if `detect` has not answered yet.
pub fn url_rating_url(ctx: &PageContext, rating: RatingTier) -> String {
    format!(
        "{}?requestid={}&rating={}",
        ctx.endpoint("url_rating"),
        ctx.request_id_or_empty(),
        rating
    )
}

/// `wikientry_rating?requestid=..&entry=..&rating=..` with the entry encoded.
pub fn entry_rating_url(ctx: &PageContext, entry: &str, rating: EntryRating) -> String {
    format!(
        "{}?requestid={}&entry={}&rating={}",
        ctx.endpoint("wikientry_rating"),
        ctx.request_id_or_empty(),
        encode_uri_component(entry),
        rating
    )
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }
    let body = resp.text().await?;
    debug!(bytes = body.len(), "response body");
    Ok(serde_json::from_str(&body)?)
}
