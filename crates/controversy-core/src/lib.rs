pub mod context;
pub mod error;
pub mod grade;
pub mod query;
pub mod rating;
pub mod render;
pub mod response;
pub mod selection;
pub mod shuffle;

pub use context::PageContext;
pub use error::CoreError;
pub use grade::{Grade, grade};
pub use query::{decode_uri_component, encode_uri_component, get_query_param, make_wiki_url};
pub use rating::{EntryRating, RatingTier};
pub use render::{
    DetectPatch, RatingPatch, StatusTarget, render_detect, render_rating,
};
pub use response::{RatingResponse, RequestId, RequestType, ScoreInfo, ScoreResponse, WikiEntry};
pub use selection::{Selection, bookmarklet_source, clean_selection};
pub use shuffle::shuffle;
