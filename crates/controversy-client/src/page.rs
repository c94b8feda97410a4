//! One view of the client page: the score request and the rating submissions
//! it enables.
//!
//! Every request resolves to a patch. Transport failures become patches too,
//! carried in a `network_error` field separate from the server's `errmsg`.
//! Ratings run as independent tasks with no ordering between them; whichever
//! finishes last owns any status region they share.

use controversy_core::{
    DetectPatch, EntryRating, PageContext, RatingPatch, RatingTier, StatusTarget, render_detect,
    render_rating,
};
use rand::Rng;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::http::ScoreClient;

pub struct Page {
    client: ScoreClient,
    ctx: PageContext,
}

impl Page {
    pub fn new(client: ScoreClient, ctx: PageContext) -> Self {
        Self { client, ctx }
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    /// Fetch and render the controversy score, keeping the request id the
    /// server hands back for later ratings.
    pub async fn request_controversy_score<R: Rng + ?Sized>(&mut self, rng: &mut R) -> DetectPatch {
        match self.client.detect(&self.ctx).await {
            Ok(response) => {
                let patch = render_detect(&response, &self.ctx, rng);
                self.ctx.apply(&patch);
                patch
            }
            Err(e) => {
                warn!(error = %e, "controversy score request failed");
                DetectPatch::transport_failure(e.to_string())
            }
        }
    }

    /// Submit a controversy rating in the background.
    pub fn submit_url_rating(&self, rating: RatingTier) -> JoinHandle<RatingPatch> {
        let client = self.client.clone();
        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            match client.submit_url_rating(&ctx, rating).await {
                Ok(response) => render_rating(&response, StatusTarget::UrlRating),
                Err(e) => {
                    warn!(error = %e, "url rating submission failed");
                    RatingPatch::transport_failure(StatusTarget::UrlRating, e.to_string())
                }
            }
        })
    }

    /// Submit an entry relevance rating in the background.
    ///
    /// `control_id` identifies the triggering control, e.g. `entry3_r2`; the
    /// result is reported into that control's row.
    pub fn submit_entry_rating(
        &self,
        entry: &str,
        control_id: &str,
        rating: EntryRating,
    ) -> JoinHandle<RatingPatch> {
        self.submit_entry_rating_into(entry, StatusTarget::for_entry_control(control_id), rating)
    }

    /// Submit an entry relevance rating, reporting into an explicit target.
    pub fn submit_entry_rating_into(
        &self,
        entry: &str,
        target: StatusTarget,
        rating: EntryRating,
    ) -> JoinHandle<RatingPatch> {
        let client = self.client.clone();
        let ctx = self.ctx.clone();
        let entry = entry.to_string();
        tokio::spawn(async move {
            match client.submit_entry_rating(&ctx, &entry, rating).await {
                Ok(response) => render_rating(&response, target),
                Err(e) => {
                    warn!(error = %e, entry = %entry, "wiki entry rating submission failed");
                    RatingPatch::transport_failure(target, e.to_string())
                }
            }
        })
    }
}
