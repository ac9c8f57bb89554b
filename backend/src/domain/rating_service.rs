//! Rating aggregation engine.
//!
//! Implements the [`RatingEngine`] driving port. Every feedback mutation
//! recomputes the affected reviewee's aggregate synchronously, so ordering
//! and error propagation stay visible to callers; recomputation is a full
//! scan of the reviewee's feedback, serialised per user so concurrent
//! mutations cannot race to opposite, stale averages.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::feedback::{Feedback, FeedbackDraft, FeedbackId};
use crate::domain::ports::{
    EditFeedbackRequest, FeedbackPersistenceError, FeedbackRepository, RatingEngine,
    SubmitFeedbackRequest, SwapPersistenceError, SwapRepository, UserDirectory, UserDirectoryError,
};
use crate::domain::rating::{FeedbackSummary, RatingSummary};
use crate::domain::swap::SwapStatus;
use crate::domain::user::UserId;

fn map_feedback_store_error(error: FeedbackPersistenceError) -> DomainError {
    match error {
        FeedbackPersistenceError::Connection { message } => {
            DomainError::service_unavailable(format!("feedback store unavailable: {message}"))
        }
        FeedbackPersistenceError::Query { message } => {
            DomainError::internal(format!("feedback store error: {message}"))
        }
        FeedbackPersistenceError::DuplicateFeedback => {
            DomainError::duplicate_feedback("feedback for this swap was already submitted")
        }
    }
}

fn map_swap_store_error(error: SwapPersistenceError) -> DomainError {
    match error {
        SwapPersistenceError::Connection { message } => {
            DomainError::service_unavailable(format!("swap store unavailable: {message}"))
        }
        error => DomainError::internal(format!("swap store error: {error}")),
    }
}

fn map_directory_error(error: UserDirectoryError) -> DomainError {
    match error {
        UserDirectoryError::Connection { message } => {
            DomainError::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            DomainError::internal(format!("user directory error: {message}"))
        }
    }
}

/// Rating aggregation engine over the feedback store, swap store, and user
/// directory.
pub struct RatingService<F, S, U> {
    feedback: Arc<F>,
    swaps: Arc<S>,
    directory: Arc<U>,
    clock: Arc<dyn Clock>,
    recompute_locks: Mutex<HashMap<UserId, Arc<tokio::sync::Mutex<()>>>>,
}

impl<F, S, U> RatingService<F, S, U> {
    /// Create the engine with its stores, directory, and clock.
    pub fn new(feedback: Arc<F>, swaps: Arc<S>, directory: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            feedback,
            swaps,
            directory,
            clock,
            recompute_locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, user_id: &UserId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .recompute_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(user_id.clone()).or_default().clone()
    }
}

impl<F, S, U> RatingService<F, S, U>
where
    F: FeedbackRepository,
    S: SwapRepository,
    U: UserDirectory,
{
    async fn load(&self, feedback_id: &FeedbackId) -> Result<Feedback, DomainError> {
        self.feedback
            .find_by_id(feedback_id)
            .await
            .map_err(map_feedback_store_error)?
            .ok_or_else(|| DomainError::not_found(format!("feedback {feedback_id} not found")))
    }

    async fn recompute_for(&self, user_id: &UserId) -> Result<RatingSummary, DomainError> {
        let lock = self.lock_for(user_id);
        let _serialised = lock.lock().await;

        let feedback = self
            .feedback
            .list_for_reviewee(user_id)
            .await
            .map_err(map_feedback_store_error)?;
        let ratings: Vec<_> = feedback
            .iter()
            .filter(|record| !record.flagged())
            .map(Feedback::rating)
            .collect();
        let summary = RatingSummary::from_ratings(&ratings);

        self.directory
            .update_rating_summary(user_id, summary)
            .await
            .map_err(map_directory_error)?;
        debug!(
            user = %user_id,
            average = summary.average(),
            count = summary.count(),
            "rating recomputed"
        );
        Ok(summary)
    }
}

#[async_trait]
impl<F, S, U> RatingEngine for RatingService<F, S, U>
where
    F: FeedbackRepository,
    S: SwapRepository,
    U: UserDirectory,
{
    async fn submit_feedback(&self, request: SubmitFeedbackRequest) -> Result<Feedback, DomainError> {
        let SubmitFeedbackRequest {
            swap_id,
            reviewer,
            rating,
            comment,
            categories,
        } = request;

        let swap = self
            .swaps
            .find_by_id(&swap_id)
            .await
            .map_err(map_swap_store_error)?
            .ok_or_else(|| DomainError::not_found(format!("swap {swap_id} not found")))?;
        if swap.status() != SwapStatus::Completed {
            return Err(DomainError::illegal_state(
                "feedback is only accepted on completed swaps",
            ));
        }
        let reviewee = swap
            .counterpart(&reviewer)
            .ok_or_else(|| DomainError::forbidden("only participants can review a swap"))?
            .clone();

        let existing = self
            .feedback
            .find_by_swap_and_reviewer(&swap_id, &reviewer)
            .await
            .map_err(map_feedback_store_error)?;
        if existing.is_some() {
            return Err(DomainError::duplicate_feedback(
                "feedback for this swap was already submitted",
            ));
        }

        let record = Feedback::new(FeedbackDraft {
            id: FeedbackId::random(),
            swap_id,
            reviewer,
            reviewee: reviewee.clone(),
            rating,
            comment,
            categories,
            created_at: self.clock.utc(),
        })
        .map_err(|error| DomainError::invalid_request(error.to_string()))?;

        self.feedback
            .insert(&record)
            .await
            .map_err(map_feedback_store_error)?;
        self.recompute_for(&reviewee).await?;
        Ok(record)
    }

    async fn edit_feedback(&self, request: EditFeedbackRequest) -> Result<Feedback, DomainError> {
        let EditFeedbackRequest {
            feedback_id,
            reviewer,
            rating,
            comment,
            categories,
        } = request;

        let mut record = self.load(&feedback_id).await?;
        if record.reviewer() != &reviewer {
            return Err(DomainError::forbidden(
                "only the reviewer can edit their feedback",
            ));
        }

        if let Some(rating) = rating {
            record.set_rating(rating);
        }
        if comment.is_some() {
            record
                .set_comment(comment)
                .map_err(|error| DomainError::invalid_request(error.to_string()))?;
        }
        if let Some(categories) = categories {
            record.set_categories(categories);
        }

        self.feedback
            .update(&record)
            .await
            .map_err(map_feedback_store_error)?;
        let reviewee = record.reviewee().clone();
        self.recompute_for(&reviewee).await?;
        Ok(record)
    }

    async fn delete_feedback(
        &self,
        feedback_id: &FeedbackId,
        reviewer: &UserId,
    ) -> Result<(), DomainError> {
        let record = self.load(feedback_id).await?;
        if record.reviewer() != reviewer {
            return Err(DomainError::forbidden(
                "only the reviewer can delete their feedback",
            ));
        }

        self.feedback
            .delete(feedback_id)
            .await
            .map_err(map_feedback_store_error)?;
        self.recompute_for(record.reviewee()).await?;
        Ok(())
    }

    async fn flag_feedback(
        &self,
        feedback_id: &FeedbackId,
        reason: &str,
    ) -> Result<Feedback, DomainError> {
        let mut record = self.load(feedback_id).await?;
        record.flag(reason);

        self.feedback
            .update(&record)
            .await
            .map_err(map_feedback_store_error)?;
        self.recompute_for(record.reviewee()).await?;
        Ok(record)
    }

    async fn unflag_feedback(&self, feedback_id: &FeedbackId) -> Result<Feedback, DomainError> {
        let mut record = self.load(feedback_id).await?;
        record.unflag();

        self.feedback
            .update(&record)
            .await
            .map_err(map_feedback_store_error)?;
        self.recompute_for(record.reviewee()).await?;
        Ok(record)
    }

    async fn recompute(&self, user_id: &UserId) -> Result<RatingSummary, DomainError> {
        self.recompute_for(user_id).await
    }

    async fn feedback_summary(&self, user_id: &UserId) -> Result<FeedbackSummary, DomainError> {
        let feedback = self
            .feedback
            .list_for_reviewee(user_id)
            .await
            .map_err(map_feedback_store_error)?;
        let countable: Vec<Feedback> = feedback
            .into_iter()
            .filter(|record| !record.flagged())
            .collect();
        Ok(FeedbackSummary::from_feedback(&countable))
    }
}

#[cfg(test)]
#[path = "rating_service_tests.rs"]
mod tests;
