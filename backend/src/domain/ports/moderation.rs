//! Driving port for the moderation layer.

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::feedback::{Feedback, FeedbackId};
use crate::domain::swap::{Swap, SwapId};
use crate::domain::user::UserId;

/// Result of banning a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BanOutcome {
    /// How many pending swaps the ban cascade cancelled.
    pub cancelled_swaps: usize,
}

/// Administrative overrides.
///
/// Moderation drives the lifecycle and rating engines rather than mutating
/// records directly, so cascades and recomputation follow the same ordering
/// rules as member-initiated operations.
#[async_trait]
pub trait Moderation: Send + Sync {
    /// Ban a member and cancel their pending swaps. Administrators cannot be
    /// banned.
    async fn ban_user(&self, user_id: &UserId, reason: &str) -> Result<BanOutcome, DomainError>;

    /// Lift a ban; previously cancelled swaps stay cancelled.
    async fn unban_user(&self, user_id: &UserId) -> Result<(), DomainError>;

    /// Flag a review out of rating aggregation.
    async fn flag_feedback(&self, feedback_id: &FeedbackId, reason: &str)
    -> Result<Feedback, DomainError>;

    /// Flag a swap for follow-up without touching its lifecycle.
    async fn flag_swap(&self, swap_id: &SwapId, reason: Option<String>) -> Result<Swap, DomainError>;

    /// Cancel a swap on a member's behalf; completed swaps are refused.
    async fn force_cancel_swap(
        &self,
        swap_id: &SwapId,
        reason: Option<String>,
    ) -> Result<Swap, DomainError>;

    /// Account-deletion cascade: cancel the member's pending swaps, then
    /// remove the directory record. Returns how many swaps were cancelled.
    async fn close_account(&self, user_id: &UserId) -> Result<usize, DomainError>;
}
