//! Driving port for the rating aggregation engine.

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::feedback::{CategoryRatings, Feedback, FeedbackId, Rating};
use crate::domain::rating::{FeedbackSummary, RatingSummary};
use crate::domain::swap::SwapId;
use crate::domain::user::UserId;

/// Request payload for [`RatingEngine::submit_feedback`].
#[derive(Debug, Clone)]
pub struct SubmitFeedbackRequest {
    pub swap_id: SwapId,
    pub reviewer: UserId,
    pub rating: Rating,
    pub comment: Option<String>,
    pub categories: CategoryRatings,
}

/// Request payload for [`RatingEngine::edit_feedback`].
///
/// `None` fields keep the stored value.
#[derive(Debug, Clone)]
pub struct EditFeedbackRequest {
    pub feedback_id: FeedbackId,
    pub reviewer: UserId,
    pub rating: Option<Rating>,
    pub comment: Option<String>,
    pub categories: Option<CategoryRatings>,
}

/// Feedback mutations and the derived-rating reads they maintain.
///
/// Every mutation recomputes the affected reviewee's aggregate before
/// returning, so the directory's rating fields never lag the feedback set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingEngine: Send + Sync {
    /// Leave feedback on a completed swap; the reviewee is the other
    /// participant.
    async fn submit_feedback(&self, request: SubmitFeedbackRequest) -> Result<Feedback, DomainError>;

    /// Amend a review; reviewer only.
    async fn edit_feedback(&self, request: EditFeedbackRequest) -> Result<Feedback, DomainError>;

    /// Remove a review; reviewer only.
    async fn delete_feedback(&self, feedback_id: &FeedbackId, reviewer: &UserId)
    -> Result<(), DomainError>;

    /// Moderation flag: the review stops counting towards aggregates.
    async fn flag_feedback(&self, feedback_id: &FeedbackId, reason: &str)
    -> Result<Feedback, DomainError>;

    /// Lift a moderation flag: the review counts again.
    async fn unflag_feedback(&self, feedback_id: &FeedbackId) -> Result<Feedback, DomainError>;

    /// Recompute and store the user's aggregate from the current feedback
    /// set, returning the result.
    async fn recompute(&self, user_id: &UserId) -> Result<RatingSummary, DomainError>;

    /// Read model: distribution and per-category averages over the user's
    /// countable feedback.
    async fn feedback_summary(&self, user_id: &UserId) -> Result<FeedbackSummary, DomainError>;
}
