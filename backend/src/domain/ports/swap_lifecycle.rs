//! Driving port for the swap lifecycle engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::skill::SkillDescriptor;
use crate::domain::swap::{Swap, SwapId};
use crate::domain::user::UserId;

/// Request payload for [`SwapLifecycle::create_request`].
#[derive(Debug, Clone)]
pub struct CreateSwapRequest {
    pub requester: UserId,
    pub provider: UserId,
    pub offered: SkillDescriptor,
    pub requested: SkillDescriptor,
    pub message: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
}

/// Per-status swap counts for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapStats {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

/// State-transition operations over swaps.
///
/// Implementations validate before persisting: a rejected operation leaves
/// the stored record unchanged. Methods taking an `actor` enforce
/// participant identity; [`SwapLifecycle::force_cancel`] and
/// [`SwapLifecycle::flag`] are moderation entry points that bypass it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapLifecycle: Send + Sync {
    /// Create a pending swap request against an available provider.
    async fn create_request(&self, request: CreateSwapRequest) -> Result<Swap, DomainError>;

    /// Provider accepts a pending request; both sides must still advertise
    /// the skills named in it.
    async fn accept(&self, swap_id: &SwapId, actor: &UserId) -> Result<Swap, DomainError>;

    /// Provider declines a pending request.
    async fn reject(
        &self,
        swap_id: &SwapId,
        actor: &UserId,
        reason: Option<String>,
    ) -> Result<Swap, DomainError>;

    /// Either participant cancels a live swap.
    async fn cancel(
        &self,
        swap_id: &SwapId,
        actor: &UserId,
        reason: Option<String>,
    ) -> Result<Swap, DomainError>;

    /// Either participant starts an accepted swap.
    async fn start(&self, swap_id: &SwapId, actor: &UserId) -> Result<Swap, DomainError>;

    /// A participant confirms their side is done; the second confirmation
    /// completes the swap and credits both completion counters.
    async fn mark_completed(&self, swap_id: &SwapId, actor: &UserId) -> Result<Swap, DomainError>;

    /// Requester withdraws a pending request entirely.
    async fn delete(&self, swap_id: &SwapId, actor: &UserId) -> Result<(), DomainError>;

    /// Cancel every pending swap touching the user; returns how many were
    /// cancelled. Live exchanges are left untouched.
    async fn cascade_cancel_for_user(&self, user_id: &UserId) -> Result<usize, DomainError>;

    /// Moderation cancel: no participant check, but completed and already
    /// cancelled swaps are refused.
    async fn force_cancel(&self, swap_id: &SwapId, reason: Option<String>) -> Result<Swap, DomainError>;

    /// Moderation flag; does not touch the lifecycle.
    async fn flag(&self, swap_id: &SwapId, reason: Option<String>) -> Result<Swap, DomainError>;

    /// Per-status counts over the user's swaps.
    async fn stats_for_user(&self, user_id: &UserId) -> Result<SwapStats, DomainError>;
}
