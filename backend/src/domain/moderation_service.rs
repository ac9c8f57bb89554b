//! Moderation layer.
//!
//! Implements the [`Moderation`] driving port by delegating to the swap
//! lifecycle and rating engines; the only state it touches directly is the
//! directory's ban status. Banning cancels pending requests only: exchanges
//! already accepted or underway keep running until a moderator force-cancels
//! them, mirroring the marketplace's long-standing behaviour.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::feedback::{Feedback, FeedbackId};
use crate::domain::ports::{
    BanOutcome, Moderation, RatingEngine, SwapLifecycle, UserDirectory, UserDirectoryError,
};
use crate::domain::swap::{Swap, SwapId};
use crate::domain::user::{UserId, UserProfile};

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

/// Moderation layer over the two engines and the user directory.
pub struct ModerationService<L, R, U> {
    lifecycle: Arc<L>,
    ratings: Arc<R>,
    directory: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<L, R, U> ModerationService<L, R, U> {
    /// Create the layer with the engines it drives.
    pub fn new(lifecycle: Arc<L>, ratings: Arc<R>, directory: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            lifecycle,
            ratings,
            directory,
            clock,
        }
    }
}

impl<L, R, U> ModerationService<L, R, U>
where
    U: UserDirectory,
{
    async fn profile(&self, user_id: &UserId) -> Result<UserProfile, DomainError> {
        self.directory
            .get(user_id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait]
impl<L, R, U> Moderation for ModerationService<L, R, U>
where
    L: SwapLifecycle,
    R: RatingEngine,
    U: UserDirectory,
{
    async fn ban_user(&self, user_id: &UserId, reason: &str) -> Result<BanOutcome, DomainError> {
        let profile = self.profile(user_id).await?;
        if profile.is_admin() {
            return Err(DomainError::forbidden("administrators cannot be banned"));
        }

        self.directory
            .ban(user_id, Some(reason.to_owned()), self.clock.utc())
            .await
            .map_err(map_directory_error)?;
        let cancelled_swaps = self.lifecycle.cascade_cancel_for_user(user_id).await?;

        info!(user = %user_id, cancelled_swaps, "user banned");
        Ok(BanOutcome { cancelled_swaps })
    }

    async fn unban_user(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.profile(user_id).await?;
        self.directory
            .reactivate(user_id)
            .await
            .map_err(map_directory_error)?;
        info!(user = %user_id, "user unbanned");
        Ok(())
    }

    async fn flag_feedback(
        &self,
        feedback_id: &FeedbackId,
        reason: &str,
    ) -> Result<Feedback, DomainError> {
        self.ratings.flag_feedback(feedback_id, reason).await
    }

    async fn flag_swap(&self, swap_id: &SwapId, reason: Option<String>) -> Result<Swap, DomainError> {
        self.lifecycle.flag(swap_id, reason).await
    }

    async fn force_cancel_swap(
        &self,
        swap_id: &SwapId,
        reason: Option<String>,
    ) -> Result<Swap, DomainError> {
        self.lifecycle.force_cancel(swap_id, reason).await
    }

    async fn close_account(&self, user_id: &UserId) -> Result<usize, DomainError> {
        self.profile(user_id).await?;

        let cancelled = self.lifecycle.cascade_cancel_for_user(user_id).await?;
        self.directory
            .delete(user_id)
            .await
            .map_err(map_directory_error)?;

        info!(user = %user_id, cancelled, "account closed");
        Ok(cancelled)
    }
}

#[cfg(test)]
#[path = "moderation_service_tests.rs"]
mod tests;
