//! Post-completion feedback entities.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::swap::SwapId;
use crate::domain::user::UserId;

/// Maximum accepted comment length, in characters.
pub const COMMENT_MAX: usize = 1000;

/// Validation errors returned by feedback constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackValidationError {
    SelfReview,
    RatingOutOfRange { min: u8, max: u8 },
    CommentTooLong { max: usize },
}

impl fmt::Display for FeedbackValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfReview => write!(f, "reviewer and reviewee must differ"),
            Self::RatingOutOfRange { min, max } => {
                write!(f, "rating must be between {min} and {max}")
            }
            Self::CommentTooLong { max } => {
                write!(f, "comment must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for FeedbackValidationError {}

/// Stable feedback identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(Uuid);

impl FeedbackId {
    /// Wrap an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`FeedbackId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A star rating in the closed range 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

/// Lowest assignable rating.
pub const RATING_MIN: u8 = 1;
/// Highest assignable rating.
pub const RATING_MAX: u8 = 5;

impl Rating {
    /// Validate and construct a [`Rating`].
    pub const fn new(value: u8) -> Result<Self, FeedbackValidationError> {
        if value < RATING_MIN || value > RATING_MAX {
            return Err(FeedbackValidationError::RatingOutOfRange {
                min: RATING_MIN,
                max: RATING_MAX,
            });
        }
        Ok(Self(value))
    }

    /// The raw star value.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = FeedbackValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Optional per-category sub-ratings attached to a review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRatings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_quality: Option<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability: Option<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professionalism: Option<Rating>,
}

impl CategoryRatings {
    /// Whether no category carries a value.
    pub const fn is_empty(&self) -> bool {
        self.skill_quality.is_none()
            && self.communication.is_none()
            && self.reliability.is_none()
            && self.professionalism.is_none()
    }
}

/// Input payload for [`Feedback::new`].
#[derive(Debug, Clone)]
pub struct FeedbackDraft {
    pub id: FeedbackId,
    pub swap_id: SwapId,
    pub reviewer: UserId,
    pub reviewee: UserId,
    pub rating: Rating,
    pub comment: Option<String>,
    pub categories: CategoryRatings,
    pub created_at: DateTime<Utc>,
}

/// A review one participant left about the other after a completed swap.
///
/// ## Invariants
/// - `reviewer != reviewee`.
/// - At most one record exists per (swap, reviewer); the store enforces the
///   unique index, [`Feedback::new`] cannot.
/// - Flagged records are excluded from rating aggregation until unflagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    id: FeedbackId,
    swap_id: SwapId,
    reviewer: UserId,
    reviewee: UserId,
    rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    categories: CategoryRatings,
    is_public: bool,
    flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    flag_reason: Option<String>,
    admin_reviewed: bool,
    created_at: DateTime<Utc>,
}

impl Feedback {
    /// Create a validated feedback record.
    pub fn new(draft: FeedbackDraft) -> Result<Self, FeedbackValidationError> {
        let FeedbackDraft {
            id,
            swap_id,
            reviewer,
            reviewee,
            rating,
            comment,
            categories,
            created_at,
        } = draft;

        if reviewer == reviewee {
            return Err(FeedbackValidationError::SelfReview);
        }
        validate_comment(comment.as_deref())?;

        Ok(Self {
            id,
            swap_id,
            reviewer,
            reviewee,
            rating,
            comment,
            categories,
            is_public: true,
            flagged: false,
            flag_reason: None,
            admin_reviewed: false,
            created_at,
        })
    }

    /// Stable feedback identifier.
    pub const fn id(&self) -> &FeedbackId {
        &self.id
    }

    /// The swap this review refers to.
    pub const fn swap_id(&self) -> &SwapId {
        &self.swap_id
    }

    /// The participant who wrote the review.
    pub const fn reviewer(&self) -> &UserId {
        &self.reviewer
    }

    /// The participant being reviewed.
    pub const fn reviewee(&self) -> &UserId {
        &self.reviewee
    }

    /// Overall star rating.
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Free-form comment, when supplied.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Per-category sub-ratings.
    pub const fn categories(&self) -> CategoryRatings {
        self.categories
    }

    /// Whether the review is publicly listed.
    pub const fn is_public(&self) -> bool {
        self.is_public
    }

    /// Whether a moderator flagged the review.
    pub const fn flagged(&self) -> bool {
        self.flagged
    }

    /// Reason recorded with the flag, if any.
    pub fn flag_reason(&self) -> Option<&str> {
        self.flag_reason.as_deref()
    }

    /// Whether a moderator has looked at this record.
    pub const fn admin_reviewed(&self) -> bool {
        self.admin_reviewed
    }

    /// Submission timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the review counts towards listings shown to members.
    pub const fn is_visible(&self) -> bool {
        self.is_public && !self.flagged
    }

    /// Replace the overall rating. Reviewer-restricted at the service layer.
    pub const fn set_rating(&mut self, rating: Rating) {
        self.rating = rating;
    }

    /// Replace the comment. Reviewer-restricted at the service layer.
    pub fn set_comment(&mut self, comment: Option<String>) -> Result<(), FeedbackValidationError> {
        validate_comment(comment.as_deref())?;
        self.comment = comment;
        Ok(())
    }

    /// Replace the category sub-ratings.
    pub const fn set_categories(&mut self, categories: CategoryRatings) {
        self.categories = categories;
    }

    /// Flag the review: excluded from aggregation and marked as seen by a
    /// moderator.
    pub fn flag(&mut self, reason: impl Into<String>) {
        self.flagged = true;
        self.flag_reason = Some(reason.into());
        self.admin_reviewed = true;
    }

    /// Clear the flag; the record re-enters aggregation. The admin-reviewed
    /// marker is retained.
    pub fn unflag(&mut self) {
        self.flagged = false;
        self.flag_reason = None;
    }
}

fn validate_comment(comment: Option<&str>) -> Result<(), FeedbackValidationError> {
    if let Some(text) = comment
        && text.len() > COMMENT_MAX
    {
        return Err(FeedbackValidationError::CommentTooLong { max: COMMENT_MAX });
    }
    Ok(())
}
