//! Port for feedback persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::feedback::{Feedback, FeedbackId};
use crate::domain::swap::SwapId;
use crate::domain::user::UserId;

/// Persistence errors raised by feedback store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackPersistenceError {
    /// Store connection could not be established.
    #[error("feedback store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("feedback store query failed: {message}")]
    Query { message: String },
    /// The (swap, reviewer) unique index refused the insert.
    #[error("feedback for this swap and reviewer already exists")]
    DuplicateFeedback,
}

impl FeedbackPersistenceError {
    /// Construct a [`FeedbackPersistenceError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Construct a [`FeedbackPersistenceError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for feedback persistence.
///
/// Adapters enforce one uniqueness constraint: at most one record per
/// (swap, reviewer) pair, reported as
/// [`FeedbackPersistenceError::DuplicateFeedback`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Persist a new feedback record, enforcing the (swap, reviewer) unique
    /// index.
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackPersistenceError>;

    /// Fetch a feedback record by identifier.
    async fn find_by_id(
        &self,
        id: &FeedbackId,
    ) -> Result<Option<Feedback>, FeedbackPersistenceError>;

    /// Fetch the record a reviewer left for a swap, if any.
    async fn find_by_swap_and_reviewer(
        &self,
        swap_id: &SwapId,
        reviewer: &UserId,
    ) -> Result<Option<Feedback>, FeedbackPersistenceError>;

    /// All feedback naming the user as reviewee, newest first, flagged
    /// records included; engines filter as needed.
    async fn list_for_reviewee(
        &self,
        reviewee: &UserId,
    ) -> Result<Vec<Feedback>, FeedbackPersistenceError>;

    /// Overwrite an existing record.
    async fn update(&self, feedback: &Feedback) -> Result<(), FeedbackPersistenceError>;

    /// Permanently remove a feedback record.
    async fn delete(&self, id: &FeedbackId) -> Result<(), FeedbackPersistenceError>;
}

/// Fixture implementation for tests that do not exercise feedback
/// persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFeedbackRepository;

#[async_trait]
impl FeedbackRepository for FixtureFeedbackRepository {
    async fn insert(&self, _feedback: &Feedback) -> Result<(), FeedbackPersistenceError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &FeedbackId,
    ) -> Result<Option<Feedback>, FeedbackPersistenceError> {
        Ok(None)
    }

    async fn find_by_swap_and_reviewer(
        &self,
        _swap_id: &SwapId,
        _reviewer: &UserId,
    ) -> Result<Option<Feedback>, FeedbackPersistenceError> {
        Ok(None)
    }

    async fn list_for_reviewee(
        &self,
        _reviewee: &UserId,
    ) -> Result<Vec<Feedback>, FeedbackPersistenceError> {
        Ok(Vec::new())
    }

    async fn update(&self, _feedback: &Feedback) -> Result<(), FeedbackPersistenceError> {
        Ok(())
    }

    async fn delete(&self, _id: &FeedbackId) -> Result<(), FeedbackPersistenceError> {
        Ok(())
    }
}
