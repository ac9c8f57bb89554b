//! Swap lifecycle engine.
//!
//! Implements the [`SwapLifecycle`] driving port on top of a swap store and
//! the user directory. Transition legality is enforced by the [`Swap`]
//! entity; this service adds actor identity, provider availability, and
//! skill-possession guards, and owns the side effects of terminal
//! transitions (completion counters, cancellation cascades).

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::error::DomainError;
use crate::domain::ports::{
    CreateSwapRequest, SwapLifecycle, SwapPersistenceError, SwapRepository, SwapStats,
    UserDirectory, UserDirectoryError,
};
use crate::domain::swap::{
    CompletionOutcome, Swap, SwapDraft, SwapId, SwapStatus, SwapValidationError, TransitionError,
};
use crate::domain::user::{UserId, UserProfile};

/// Reason recorded on swaps cancelled by an account cascade.
pub const CASCADE_CANCEL_REASON: &str = "participant account is no longer active";

/// Reason recorded when moderation cancels a swap without giving one.
pub const MODERATION_CANCEL_REASON: &str = "cancelled by moderators";

fn map_store_error(error: SwapPersistenceError) -> DomainError {
    match error {
        SwapPersistenceError::Connection { message } => {
            DomainError::service_unavailable(format!("swap store unavailable: {message}"))
        }
        SwapPersistenceError::Query { message } => {
            DomainError::internal(format!("swap store error: {message}"))
        }
        SwapPersistenceError::RevisionConflict { id, .. } => {
            DomainError::conflict(format!("swap {id} was updated concurrently"))
        }
        SwapPersistenceError::DuplicatePending => {
            DomainError::duplicate_request("an equivalent pending swap request already exists")
        }
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

fn map_validation_error(error: SwapValidationError) -> DomainError {
    match error {
        SwapValidationError::SelfSwap => {
            DomainError::invalid_actor("cannot create a swap request with yourself")
        }
        SwapValidationError::MessageTooLong { .. } => DomainError::invalid_request(error.to_string()),
    }
}

fn map_transition_error(error: TransitionError) -> DomainError {
    DomainError::illegal_transition(error.to_string())
}

/// Swap lifecycle engine over a swap store and the user directory.
#[derive(Clone)]
pub struct SwapLifecycleService<S, U> {
    swaps: Arc<S>,
    directory: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<S, U> SwapLifecycleService<S, U> {
    /// Create the engine with its store, directory, and clock.
    pub fn new(swaps: Arc<S>, directory: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            swaps,
            directory,
            clock,
        }
    }
}

impl<S, U> SwapLifecycleService<S, U>
where
    S: SwapRepository,
    U: UserDirectory,
{
    async fn load(&self, swap_id: &SwapId) -> Result<Swap, DomainError> {
        self.swaps
            .find_by_id(swap_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| DomainError::not_found(format!("swap {swap_id} not found")))
    }

    async fn profile(&self, user_id: &UserId) -> Result<UserProfile, DomainError> {
        self.directory
            .get(user_id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait]
impl<S, U> SwapLifecycle for SwapLifecycleService<S, U>
where
    S: SwapRepository,
    U: UserDirectory,
{
    async fn create_request(&self, request: CreateSwapRequest) -> Result<Swap, DomainError> {
        let CreateSwapRequest {
            requester,
            provider,
            offered,
            requested,
            message,
            scheduled_date,
        } = request;

        if requester == provider {
            return Err(DomainError::invalid_actor(
                "cannot create a swap request with yourself",
            ));
        }

        let provider_profile = self.profile(&provider).await?;
        if !provider_profile.is_available() {
            return Err(DomainError::provider_unavailable(format!(
                "user {provider} cannot receive swap requests"
            )));
        }

        let existing = self
            .swaps
            .find_matching_pending(&requester, &provider, offered.skill(), requested.skill())
            .await
            .map_err(map_store_error)?;
        if existing.is_some() {
            return Err(DomainError::duplicate_request(
                "an equivalent pending swap request already exists",
            ));
        }

        let swap = Swap::new(SwapDraft {
            id: SwapId::random(),
            requester,
            provider,
            offered,
            requested,
            message,
            scheduled_date,
            created_at: self.clock.utc(),
        })
        .map_err(map_validation_error)?;

        self.swaps.insert(&swap).await.map_err(map_store_error)?;
        Ok(swap)
    }

    async fn accept(&self, swap_id: &SwapId, actor: &UserId) -> Result<Swap, DomainError> {
        let mut swap = self.load(swap_id).await?;
        if swap.provider() != actor {
            return Err(DomainError::forbidden(
                "only the provider can accept a swap request",
            ));
        }
        swap.accept().map_err(map_transition_error)?;

        let provider_profile = self.profile(swap.provider()).await?;
        if !provider_profile.offers_skill(swap.requested().skill()) {
            return Err(DomainError::invalid_request(
                "provider no longer offers the requested skill",
            ));
        }
        let requester_profile = self.profile(swap.requester()).await?;
        if !requester_profile.offers_skill(swap.offered().skill()) {
            return Err(DomainError::invalid_request(
                "requester no longer offers the offered skill",
            ));
        }

        self.swaps.update(&swap).await.map_err(map_store_error)
    }

    async fn reject(
        &self,
        swap_id: &SwapId,
        actor: &UserId,
        reason: Option<String>,
    ) -> Result<Swap, DomainError> {
        let mut swap = self.load(swap_id).await?;
        if swap.provider() != actor {
            return Err(DomainError::forbidden(
                "only the provider can reject a swap request",
            ));
        }
        swap.reject(reason).map_err(map_transition_error)?;
        self.swaps.update(&swap).await.map_err(map_store_error)
    }

    async fn cancel(
        &self,
        swap_id: &SwapId,
        actor: &UserId,
        reason: Option<String>,
    ) -> Result<Swap, DomainError> {
        let mut swap = self.load(swap_id).await?;
        if swap.participant(actor).is_none() {
            return Err(DomainError::forbidden("only participants can cancel a swap"));
        }
        swap.cancel(reason).map_err(map_transition_error)?;
        self.swaps.update(&swap).await.map_err(map_store_error)
    }

    async fn start(&self, swap_id: &SwapId, actor: &UserId) -> Result<Swap, DomainError> {
        let mut swap = self.load(swap_id).await?;
        if swap.participant(actor).is_none() {
            return Err(DomainError::forbidden("only participants can start a swap"));
        }
        swap.start().map_err(map_transition_error)?;
        self.swaps.update(&swap).await.map_err(map_store_error)
    }

    async fn mark_completed(&self, swap_id: &SwapId, actor: &UserId) -> Result<Swap, DomainError> {
        let mut swap = self.load(swap_id).await?;
        let side = swap
            .participant(actor)
            .ok_or_else(|| DomainError::forbidden("only participants can mark a swap completed"))?;

        let outcome = swap
            .record_completion(side, self.clock.utc())
            .map_err(map_transition_error)?;
        if outcome == CompletionOutcome::AlreadyRecorded {
            return Ok(swap);
        }

        let stored = self.swaps.update(&swap).await.map_err(map_store_error)?;
        if outcome == CompletionOutcome::Completed {
            // The compare-and-set above admits exactly one writer into
            // completed, so the counters move exactly once per swap.
            self.directory
                .increment_completed_swaps(stored.requester())
                .await
                .map_err(map_directory_error)?;
            self.directory
                .increment_completed_swaps(stored.provider())
                .await
                .map_err(map_directory_error)?;
            info!(swap = %stored.id(), "swap completed");
        }
        Ok(stored)
    }

    async fn delete(&self, swap_id: &SwapId, actor: &UserId) -> Result<(), DomainError> {
        let swap = self.load(swap_id).await?;
        if swap.requester() != actor {
            return Err(DomainError::forbidden(
                "only the requester can delete a swap request",
            ));
        }
        if swap.status() != SwapStatus::Pending {
            return Err(DomainError::illegal_transition(format!(
                "cannot delete a swap that is {}",
                swap.status()
            )));
        }
        self.swaps.delete(swap.id()).await.map_err(map_store_error)
    }

    async fn cascade_cancel_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let pending = self
            .swaps
            .list_pending_for_user(user_id)
            .await
            .map_err(map_store_error)?;

        let mut cancelled = 0usize;
        for mut swap in pending {
            match swap.cancel(Some(CASCADE_CANCEL_REASON.to_owned())) {
                Ok(()) => {
                    self.swaps.update(&swap).await.map_err(map_store_error)?;
                    cancelled += 1;
                }
                Err(error) => {
                    // Raced into a terminal state since the query; skip it.
                    debug!(swap = %swap.id(), %error, "cascade skipped swap");
                }
            }
        }

        info!(user = %user_id, cancelled, "cascade cancelled pending swaps");
        Ok(cancelled)
    }

    async fn force_cancel(&self, swap_id: &SwapId, reason: Option<String>) -> Result<Swap, DomainError> {
        let mut swap = self.load(swap_id).await?;
        let reason = reason.unwrap_or_else(|| MODERATION_CANCEL_REASON.to_owned());
        swap.cancel(Some(reason)).map_err(map_transition_error)?;
        self.swaps.update(&swap).await.map_err(map_store_error)
    }

    async fn flag(&self, swap_id: &SwapId, reason: Option<String>) -> Result<Swap, DomainError> {
        let mut swap = self.load(swap_id).await?;
        swap.flag(reason);
        self.swaps.update(&swap).await.map_err(map_store_error)
    }

    async fn stats_for_user(&self, user_id: &UserId) -> Result<SwapStats, DomainError> {
        let swaps = self
            .swaps
            .list_for_user(user_id)
            .await
            .map_err(map_store_error)?;

        let mut stats = SwapStats::default();
        for swap in &swaps {
            stats.total += 1;
            match swap.status() {
                SwapStatus::Pending => stats.pending += 1,
                SwapStatus::Accepted => stats.accepted += 1,
                SwapStatus::Rejected => stats.rejected += 1,
                SwapStatus::InProgress => stats.in_progress += 1,
                SwapStatus::Completed => stats.completed += 1,
                SwapStatus::Cancelled => stats.cancelled += 1,
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "swap_service_tests.rs"]
mod tests;
