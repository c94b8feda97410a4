//! Response rendering, independent of any display surface.
//!
//! Each completion handler is a pure function of the server response and the
//! page context that returns a patch describing what to show. The CLI prints
//! patches; a browser front end would map the same fields onto DOM regions.

use std::fmt;

use rand::Rng;
use tracing::debug;

use crate::context::PageContext;
use crate::grade::{Grade, grade};
use crate::query::make_wiki_url;
use crate::rating::{
    EntryRating, RATING_SUBMITTED, RatingTier, entry_control_id, entry_element_id,
    entry_status_region,
};
use crate::response::{RatingResponse, RequestId, RequestType, ScoreInfo, ScoreResponse};
use crate::shuffle::shuffle;

/// At most this many reference entries are offered for rating.
pub const MAX_WIKI_ENTRIES: usize = 10;

/// Status region of the URL rating form.
pub const URL_RATING_STATUS: &str = "text_rating_status";

/// What the server scored, as worded to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Webpage,
    Text,
}

impl Source {
    fn from_request_type(request_type: Option<RequestType>) -> Option<Self> {
        match request_type? {
            RequestType::Url => Some(Self::Webpage),
            RequestType::Text => Some(Self::Text),
            RequestType::Unknown => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Webpage => "webpage",
            Self::Text => "text",
        })
    }
}

/// Source wording, falling back to a neutral noun for unknown request types.
fn source_noun(source: Option<Source>) -> String {
    source.map_or_else(|| "content".to_string(), |s| s.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub href: String,
}

/// UI changes produced by a `detect` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectPatch {
    /// Server-reported error, shown verbatim.
    pub error: Option<String>,
    /// Transport failure: the request never produced a usable response.
    pub network_error: Option<String>,
    pub score: Option<ScoreBanner>,
    pub url_rating: Option<UrlRatingForm>,
    pub entry_rating: Option<EntryRatingForm>,
    /// Scorer diagnostics from the debug `info` block, for verbose display.
    pub diagnostics: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBanner {
    pub source: Option<Source>,
    pub score: f64,
    pub grade: Grade,
    /// The scored URL, linked.
    pub link: Link,
    /// Shown only when the server scored submitted text.
    pub selected_text: Option<String>,
}

impl ScoreBanner {
    /// Headline such as "The following webpage is highly controversial".
    pub fn headline(&self) -> String {
        format!(
            "The following {} is {}",
            source_noun(self.source),
            self.grade.label()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRatingForm {
    pub instruction: String,
    pub request_id: RequestId,
    pub preselected: Option<RatingTier>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRatingForm {
    pub instruction: String,
    /// Rows in display order, already shuffled.
    pub rows: Vec<EntryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    /// Position of the entry in the server's list, e.g. `entry3`.
    pub element_id: String,
    /// Entry key sent back with a rating.
    pub entry: String,
    pub link: Link,
    pub status_region: String,
    pub options: Vec<RatingOption>,
}

impl EntryRow {
    pub fn preselected(&self) -> Option<EntryRating> {
        self.options.iter().find(|o| o.checked).map(|o| o.rating)
    }
}

/// One radio control inside an entry row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingOption {
    pub control_id: String,
    pub rating: EntryRating,
    pub label: &'static str,
    pub checked: bool,
}

/// Render a `detect` response.
///
/// Error and score are guarded independently, so a response may carry both.
/// Entry order is shuffled with `rng` so position carries no signal.
pub fn render_detect<R: Rng + ?Sized>(
    response: &ScoreResponse,
    ctx: &PageContext,
    rng: &mut R,
) -> DetectPatch {
    let mut patch = DetectPatch {
        error: response.error_message().map(str::to_string),
        ..Default::default()
    };
    if !response.success {
        return patch;
    }

    let default_info = ScoreInfo::default();
    let info = response.info.as_ref().unwrap_or(&default_info);
    let source = Source::from_request_type(info.request_type);
    let noun = source_noun(source);
    patch.diagnostics = info.diagnostics.clone();

    // A success without a score grades like zero, matching the page script.
    let score = response.controversy.unwrap_or(0.0);
    patch.score = Some(ScoreBanner {
        source,
        score,
        grade: grade(score),
        link: Link {
            label: ctx.url.clone(),
            href: ctx.url.clone(),
        },
        selected_text: (source == Some(Source::Text)).then(|| ctx.text.clone()),
    });

    if let Some(user_request) = &info.user_request {
        let instruction = if info.prev_rating.is_some() {
            format!(
                "You have already rated this {noun}. Please feel free to change your rating if you have a second thought."
            )
        } else {
            format!("Do you think this {noun} is controversial?")
        };
        patch.url_rating = Some(UrlRatingForm {
            instruction,
            request_id: user_request.requestid.clone(),
            preselected: info.prev_rating.and_then(|r| RatingTier::new(r).ok()),
        });
    }

    if let (Some(entries), Some(titles)) = (&info.top_wikientries_ql, &info.top_wikientries_ql_title)
    {
        let mut order: Vec<usize> = (0..entries.len().min(MAX_WIKI_ENTRIES))
            .filter(|&ix| !entries[ix].entry.is_empty())
            .collect();
        shuffle(&mut order, rng);

        let rows = order
            .into_iter()
            .map(|ix| {
                let entry = entries[ix].entry.clone();
                let title = titles
                    .get(ix)
                    .map(|t| t.entry.as_str())
                    .filter(|t| !t.is_empty())
                    .unwrap_or(entry.as_str());
                let previous = info
                    .prev_rating_entries
                    .as_ref()
                    .and_then(|prev| prev.get(&entry))
                    .copied()
                    .flatten();
                let element_id = entry_element_id(ix);
                let options = EntryRating::all()
                    .map(|rating| RatingOption {
                        control_id: entry_control_id(&element_id, rating),
                        rating,
                        label: rating.label(),
                        checked: previous == Some(rating.value() as i64),
                    })
                    .collect();
                EntryRow {
                    status_region: entry_status_region(&element_id),
                    link: Link {
                        label: title.to_string(),
                        href: make_wiki_url(title),
                    },
                    element_id,
                    entry,
                    options,
                }
            })
            .collect::<Vec<_>>();

        debug!(rows = rows.len(), available = entries.len(), "rendered entry rating rows");
        patch.entry_rating = Some(EntryRatingForm {
            instruction: format!(
                "Please judge whether the following Wikipedia entries are related to the {noun}."
            ),
            rows,
        });
    }

    patch
}

/// Which status region a rating patch reports into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTarget {
    UrlRating,
    Entry(String),
}

impl StatusTarget {
    /// Target for the entry row owning `control_id`.
    pub fn for_entry_control(control_id: &str) -> Self {
        Self::Entry(entry_status_region(control_id))
    }

    pub fn region(&self) -> &str {
        match self {
            Self::UrlRating => URL_RATING_STATUS,
            Self::Entry(region) => region,
        }
    }
}

/// UI changes produced by a rating submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingPatch {
    pub target: StatusTarget,
    pub status: Option<&'static str>,
    pub error: Option<String>,
    pub network_error: Option<String>,
}

impl RatingPatch {
    /// Patch for a submission whose request failed in transport.
    pub fn transport_failure(target: StatusTarget, message: impl Into<String>) -> Self {
        Self {
            target,
            status: None,
            error: None,
            network_error: Some(message.into()),
        }
    }
}

impl DetectPatch {
    /// Patch for a `detect` request that failed in transport.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            network_error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Render the response to a rating submission.
pub fn render_rating(response: &RatingResponse, target: StatusTarget) -> RatingPatch {
    RatingPatch {
        target,
        status: response.success.then_some(RATING_SUBMITTED),
        error: response.error_message().map(str::to_string),
        network_error: None,
    }
}
