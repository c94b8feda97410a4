//! Wire types returned by the scoring service.
//!
//! The server owns this schema and builds parts of it by hand, so every field
//! is optional here: a missing field deserializes to its default and unknown
//! fields are kept as diagnostics instead of failing the whole response.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Response of the `detect` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreResponse {
    pub success: bool,
    pub errmsg: Option<String>,
    pub controversy: Option<f64>,
    pub info: Option<ScoreInfo>,
}

/// Response of the `url_rating` and `wikientry_rating` endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingResponse {
    pub success: bool,
    pub errmsg: Option<String>,
}

/// Whether the server scored a fetched webpage or a submitted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Url,
    Text,
    #[serde(other)]
    Unknown,
}

/// The `info` block attached when the request was made in debug mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreInfo {
    pub request_type: Option<RequestType>,
    pub user_request: Option<UserRequest>,
    pub prev_rating: Option<i64>,
    #[serde(rename = "top_wikientries_QL")]
    pub top_wikientries_ql: Option<Vec<WikiEntry>>,
    #[serde(rename = "top_wikientries_QL_title")]
    pub top_wikientries_ql_title: Option<Vec<WikiEntry>>,
    /// Prior ratings keyed by entry name; `null` means not rated.
    pub prev_rating_entries: Option<HashMap<String, Option<i64>>>,
    /// Scorer diagnostics (timings, query terms, entry scores).
    #[serde(flatten)]
    pub diagnostics: serde_json::Map<String, serde_json::Value>,
}

/// The request row the server logged for this lookup.
///
/// Only `requestid` matters to the client; the rest is echoed for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRequest {
    pub requestid: RequestId,
    pub timestamp: Option<i64>,
    pub ip: Option<String>,
    pub userid: Option<String>,
    pub url: Option<String>,
    pub param: Option<String>,
    pub text: Option<String>,
    pub texthash: Option<i32>,
}

/// A Wikipedia entry matched against the request, with its retrieval score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiEntry {
    #[serde(default)]
    pub entry: String,
    #[serde(default)]
    pub value: f64,
}

/// Opaque correlator tying rating submissions back to a `detect` request.
///
/// The server issues numeric ids; anything else is carried through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "String")]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<serde_json::Value> for RequestId {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self(s),
            serde_json::Value::Null => Self::default(),
            other => Self(other.to_string()),
        }
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

impl ScoreResponse {
    /// The server's error message, if it sent a non-empty one.
    pub fn error_message(&self) -> Option<&str> {
        self.errmsg.as_deref().filter(|m| !m.is_empty())
    }
}

impl RatingResponse {
    pub fn error_message(&self) -> Option<&str> {
        self.errmsg.as_deref().filter(|m| !m.is_empty())
    }
}
